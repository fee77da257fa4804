use async_trait::async_trait;

use crate::domain::branch::{BranchName, RemoteBranch};
use crate::error::AppResult;

/// Repository primitives the branch resolver is built on.
#[async_trait]
pub trait VersionControlService: Send + Sync {
    /// Fails with `AppError::NotARepository` outside a working tree.
    async fn ensure_repository(&self) -> AppResult<()>;

    /// Local branch names in repository order.
    async fn local_branches(&self) -> AppResult<Vec<String>>;

    /// Fetches the remote and lists its branches. Empty when the repository
    /// has no remote configured.
    async fn fetch_remote_branches(&self) -> AppResult<Vec<RemoteBranch>>;

    /// Branch new ticket branches are cut from.
    async fn trunk_branch(&self) -> AppResult<String>;

    async fn create_branch(&self, name: &BranchName, from: &str) -> AppResult<()>;

    async fn delete_branch(&self, name: &BranchName) -> AppResult<()>;

    /// Checks out `target`. With `new_local`, creates that branch tracking
    /// `target` first.
    async fn checkout(&self, target: &str, new_local: Option<&BranchName>) -> AppResult<()>;
}
