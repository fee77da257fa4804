use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};

const CONFIG_DIR_NAME: &str = "teamwork-checkout";
const CONFIG_FILE_NAME: &str = "config.toml";
const CONFIG_PATH_ENV: &str = "TEAMWORK_CHECKOUT_CONFIG";

/// Settings needed for a checkout run, validated from a `StoredConfig`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub company: String,
    pub api_key: String,
    pub base_url: String,
    pub trunk_branch: Option<String>,
    pub remote: Option<String>,
    pub workspace_root: PathBuf,
}

impl AppConfig {
    /// Root of the Teamwork REST API for the configured company.
    pub fn api_root(&self) -> String {
        format!("https://{}.teamwork.com", self.company)
    }
}

/// On-disk form; every field may be absent until setup has run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trunk_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
}

pub enum ConfigState {
    Ready(AppConfig),
    /// Company or API key missing; setup has to run first.
    NeedsSetup,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file yet");
                Ok(Self::default())
            }
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = toml::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Teamwork URL used when none was entered during setup.
    pub fn default_base_url(company: &str) -> String {
        format!("http://{company}.teamwork.com")
    }

    pub fn resolve(&self, workspace_root: &Path) -> ConfigState {
        let company = non_empty(&self.company);
        let api_key = non_empty(&self.api_key);
        match (company, api_key) {
            (Some(company), Some(api_key)) => {
                let base_url = non_empty(&self.base_url)
                    .unwrap_or_else(|| Self::default_base_url(&company));
                ConfigState::Ready(AppConfig {
                    company,
                    api_key,
                    base_url,
                    trunk_branch: non_empty(&self.trunk_branch),
                    remote: non_empty(&self.remote),
                    workspace_root: workspace_root.to_path_buf(),
                })
            }
            _ => ConfigState::NeedsSetup,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| AppError::Configuration("could not locate a config directory".to_string()))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn complete() -> StoredConfig {
        StoredConfig {
            company: Some("acme".to_string()),
            api_key: Some("twp_secret".to_string()),
            base_url: Some("https://projects.acme.com".to_string()),
            trunk_branch: None,
            remote: Some("upstream".to_string()),
        }
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let cfg = StoredConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, StoredConfig::default());
    }

    #[test]
    fn saves_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        complete().save_to(&path).unwrap();

        let loaded = StoredConfig::load_from(&path).unwrap();
        assert_eq!(loaded, complete());
    }

    #[test]
    fn invalid_file_is_configuration_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "company = [").unwrap();
        let err = StoredConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn complete_config_is_ready() {
        let root = Path::new("/work");
        match complete().resolve(root) {
            ConfigState::Ready(cfg) => {
                assert_eq!(cfg.company, "acme");
                assert_eq!(cfg.base_url, "https://projects.acme.com");
                assert_eq!(cfg.remote.as_deref(), Some("upstream"));
                assert_eq!(cfg.trunk_branch, None);
                assert_eq!(cfg.api_root(), "https://acme.teamwork.com");
                assert_eq!(cfg.workspace_root, root);
            }
            ConfigState::NeedsSetup => panic!("expected ready config"),
        }
    }

    #[test]
    fn base_url_defaults_from_company() {
        let mut cfg = complete();
        cfg.base_url = Some("  ".to_string());
        match cfg.resolve(Path::new(".")) {
            ConfigState::Ready(cfg) => assert_eq!(cfg.base_url, "http://acme.teamwork.com"),
            ConfigState::NeedsSetup => panic!("expected ready config"),
        }
    }

    #[test]
    fn missing_credentials_need_setup() {
        let mut cfg = complete();
        cfg.api_key = None;
        assert!(matches!(
            cfg.resolve(Path::new(".")),
            ConfigState::NeedsSetup
        ));
        assert!(matches!(
            StoredConfig::default().resolve(Path::new(".")),
            ConfigState::NeedsSetup
        ));
    }
}
