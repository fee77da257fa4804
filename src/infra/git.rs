use std::path::PathBuf;
use std::process::{Output, Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::branch::{BranchName, RemoteBranch};
use crate::error::{AppError, AppResult};
use crate::services::VersionControlService;

const DEFAULT_REMOTE: &str = "origin";
const TRUNK_CANDIDATES: [&str; 2] = ["main", "master"];

/// `VersionControlService` backed by the `git` executable.
pub struct GitCli {
    workspace_root: PathBuf,
    remote: Option<String>,
    trunk_branch: Option<String>,
}

impl GitCli {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self {
            workspace_root,
            remote: None,
            trunk_branch: None,
        }
    }

    pub fn with_remote(mut self, remote: Option<String>) -> Self {
        self.remote = remote;
        self
    }

    pub fn with_trunk_branch(mut self, trunk_branch: Option<String>) -> Self {
        self.trunk_branch = trunk_branch;
        self
    }

    async fn output(&self, args: &[&str]) -> AppResult<Output> {
        debug!(?args, "running git");
        Command::new("git")
            .args(args)
            .current_dir(&self.workspace_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|err| AppError::VersionControl(format!("failed to execute git: {err}")))
    }

    async fn git(&self, args: &[&str]) -> AppResult<String> {
        let output = self.output(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::VersionControl(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn ref_exists(&self, reference: &str) -> AppResult<bool> {
        let output = self
            .output(&["rev-parse", "--verify", "--quiet", reference])
            .await?;
        Ok(output.status.success())
    }

    async fn refs(&self, namespace: &str) -> AppResult<Vec<String>> {
        let listing = self
            .git(&["for-each-ref", "--format=%(refname)", namespace])
            .await?;
        Ok(listing
            .lines()
            .filter_map(|line| line.strip_prefix(namespace))
            .map(str::to_string)
            .collect())
    }

    async fn selected_remote(&self) -> AppResult<Option<String>> {
        if let Some(remote) = &self.remote {
            return Ok(Some(remote.clone()));
        }
        let listing = self.git(&["remote"]).await?;
        let remotes = listing
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        let remote = remotes
            .iter()
            .find(|name| **name == DEFAULT_REMOTE)
            .or_else(|| remotes.first())
            .map(|name| name.to_string());
        Ok(remote)
    }

    /// Target of `refs/remotes/{remote}/HEAD`, in short form.
    async fn remote_head(&self, remote: &str) -> AppResult<Option<String>> {
        let symbolic = format!("refs/remotes/{remote}/HEAD");
        let output = self
            .output(&["symbolic-ref", "--quiet", "--short", &symbolic])
            .await?;
        if !output.status.success() {
            return Ok(None);
        }
        let target = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(target).filter(|t| !t.is_empty()))
    }
}

#[async_trait]
impl VersionControlService for GitCli {
    async fn ensure_repository(&self) -> AppResult<()> {
        let output = self
            .output(&["rev-parse", "--is-inside-work-tree"])
            .await?;
        let inside = output.status.success()
            && String::from_utf8_lossy(&output.stdout).trim() == "true";
        if inside {
            Ok(())
        } else {
            Err(AppError::NotARepository(self.workspace_root.clone()))
        }
    }

    async fn local_branches(&self) -> AppResult<Vec<String>> {
        self.refs("refs/heads/").await
    }

    async fn fetch_remote_branches(&self) -> AppResult<Vec<RemoteBranch>> {
        let Some(remote) = self.selected_remote().await? else {
            debug!("no remote configured, skipping fetch");
            return Ok(Vec::new());
        };

        self.git(&["fetch", "--prune", &remote]).await?;

        let namespace = format!("refs/remotes/{remote}/");
        let branches = self
            .refs(&namespace)
            .await?
            .into_iter()
            .filter(|name| name != "HEAD")
            .map(|name| RemoteBranch::new(remote.clone(), format!("{remote}/{name}")))
            .collect();
        Ok(branches)
    }

    async fn trunk_branch(&self) -> AppResult<String> {
        if let Some(trunk) = &self.trunk_branch {
            return Ok(trunk.clone());
        }

        let remote_head = match self.selected_remote().await? {
            Some(remote) => self
                .remote_head(&remote)
                .await?
                .map(|head| RemoteBranch::new(remote, head)),
            None => None,
        };

        let mut candidates = Vec::new();
        if let Some(head) = &remote_head {
            candidates.push(head.local_name().0);
        }
        candidates.extend(TRUNK_CANDIDATES.iter().map(|name| name.to_string()));

        for candidate in candidates {
            if self.ref_exists(&format!("refs/heads/{candidate}")).await? {
                return Ok(candidate);
            }
        }

        remote_head.map(|head| head.reference).ok_or_else(|| {
            AppError::VersionControl(
                "could not determine the trunk branch; set trunk_branch in the config file"
                    .to_string(),
            )
        })
    }

    async fn create_branch(&self, name: &BranchName, from: &str) -> AppResult<()> {
        self.git(&["branch", "--no-track", name.as_str(), from])
            .await
            .map(|_| ())
    }

    async fn delete_branch(&self, name: &BranchName) -> AppResult<()> {
        self.git(&["branch", "-D", name.as_str()]).await.map(|_| ())
    }

    async fn checkout(&self, target: &str, new_local: Option<&BranchName>) -> AppResult<()> {
        match new_local {
            Some(local) => {
                self.git(&["checkout", "-b", local.as_str(), "--track", target])
                    .await?
            }
            None => self.git(&["checkout", target, "--"]).await?,
        };
        Ok(())
    }
}
