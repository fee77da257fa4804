use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::config::{AppConfig, ConfigState, StoredConfig, config_file_path};
use crate::error::{AppError, AppResult};

/// Interactive setup; runs on first launch and with `--reconfigure`.
pub fn run_setup(current: StoredConfig, workspace_root: &Path) -> AppResult<AppConfig> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();
    let cfg = prompt_all(current, &mut input, &mut stdout)?;

    let path = config_file_path()?;
    let config = save_if_usable(&cfg, &path, workspace_root)?;
    writeln!(stdout)?;
    writeln!(stdout, "Thanks, saved that as {}.", path.display())?;
    writeln!(
        stdout,
        "If you want to go through setup again, run this with --reconfigure"
    )?;
    Ok(config)
}

/// Writes `cfg` to `path` only when it has everything a checkout needs.
fn save_if_usable(
    cfg: &StoredConfig,
    path: &Path,
    workspace_root: &Path,
) -> AppResult<AppConfig> {
    match cfg.resolve(workspace_root) {
        ConfigState::Ready(config) => {
            cfg.save_to(path)?;
            Ok(config)
        }
        ConfigState::NeedsSetup => Err(AppError::Configuration(
            "company and API key are required; run with --reconfigure".to_string(),
        )),
    }
}

fn prompt_all<R: BufRead, W: Write>(
    mut cfg: StoredConfig,
    input: &mut R,
    out: &mut W,
) -> AppResult<StoredConfig> {
    writeln!(
        out,
        "Company: your Teamwork URL will be company.teamwork.com.\n\
         If you have a custom domain, company.teamwork.com will redirect to it,\n\
         but you'll have to find out what the value of company is."
    )?;
    apply_prompt(input, out, "Company name", &mut cfg.company, false)?;

    if cfg.base_url.is_none() {
        if let Some(company) = cfg.company.as_deref() {
            cfg.base_url = Some(StoredConfig::default_base_url(company));
        }
    }
    writeln!(out, "Teamwork URL: what URL do you access Teamwork on?")?;
    apply_prompt(input, out, "Teamwork URL", &mut cfg.base_url, false)?;

    writeln!(
        out,
        "Your personal API key. To find it:\n\
         > Click on your avatar on any Teamwork page\n\
         > Edit My Details\n\
         > API & Mobile\n\
         > Show your Token"
    )?;
    apply_prompt(input, out, "API key", &mut cfg.api_key, true)?;

    Ok(cfg)
}

fn apply_prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    field: &str,
    target: &mut Option<String>,
    secret: bool,
) -> AppResult<()> {
    match prompt(input, out, field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    field: &str,
    current: Option<&str>,
    secret: bool,
) -> AppResult<PromptAction> {
    match (current, secret) {
        (Some(value), true) => write!(
            out,
            "{field} [{}] (Enter to keep, '-' to clear): ",
            mask_secret(value)
        )?,
        (Some(value), false) => write!(out, "{field} [{value}] (Enter to keep, '-' to clear): ")?,
        (None, _) => write!(out, "{field}: ")?,
    }
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let trimmed = line.trim();

    if trimmed.is_empty() {
        Ok(PromptAction::Keep)
    } else if trimmed == "-" {
        Ok(PromptAction::Clear)
    } else {
        Ok(PromptAction::Set(trimmed.to_string()))
    }
}

fn mask_secret(token: &str) -> String {
    if token.len() > 6 && token.is_char_boundary(3) && token.is_char_boundary(token.len() - 3) {
        let prefix = &token[..3];
        let suffix = &token[token.len() - 3..];
        format!("{prefix}***{suffix}")
    } else {
        "***".to_string()
    }
}

enum PromptAction {
    Keep,
    Clear,
    Set(String),
}
