use tracing::{debug, info, warn};

use crate::context::AppContext;
use crate::domain::branch::{BranchCategory, BranchMatch, BranchName};
use crate::domain::ticket::{TicketId, TicketSummary};
use crate::error::{AppError, AppResult};
use crate::services::VersionControlService;

/// Parses the raw argument and fetches the ticket it names.
pub async fn fetch_ticket(
    ctx: &AppContext,
    raw_ticket: &str,
) -> AppResult<(TicketId, TicketSummary)> {
    let id = TicketId::normalize(raw_ticket, &ctx.config.base_url)
        .ok_or_else(|| AppError::InvalidTicketId(raw_ticket.to_string()))?;
    debug!(%id, "normalized ticket id");

    let ticket = ctx.issue_tracker.fetch_ticket(id).await?;
    Ok((id, ticket))
}

/// Checks out the branch for `id`: the first local branch mentioning it,
/// else the first remote branch mentioning it, else a new branch cut from
/// trunk.
pub async fn resolve_branch(
    id: TicketId,
    title: &str,
    category: BranchCategory,
    vcs: &dyn VersionControlService,
) -> AppResult<BranchMatch> {
    vcs.ensure_repository().await?;

    let local = vcs.local_branches().await?;
    if let Some(name) = local.into_iter().find(|name| BranchName::mentions(name, id)) {
        info!(branch = %name, "found local branch");
        vcs.checkout(&name, None).await?;
        return Ok(BranchMatch::Local(BranchName(name)));
    }

    let remote = vcs.fetch_remote_branches().await?;
    if let Some(remote_ref) = remote
        .into_iter()
        .find(|branch| BranchName::mentions(&branch.reference, id))
    {
        let local = remote_ref.local_name();
        info!(remote = %remote_ref.reference, local = %local, "found remote branch");
        vcs.checkout(&remote_ref.reference, Some(&local)).await?;
        return Ok(BranchMatch::Remote { remote_ref, local });
    }

    let branch = BranchName::from_parts(category, id, title);
    let trunk = vcs.trunk_branch().await?;
    info!(%branch, %trunk, "creating branch");
    vcs.create_branch(&branch, &trunk).await?;

    if let Err(err) = vcs.checkout(branch.as_str(), None).await {
        if let Err(cleanup) = vcs.delete_branch(&branch).await {
            warn!(%branch, error = %cleanup, "could not remove branch after failed checkout");
        }
        return Err(err);
    }
    Ok(BranchMatch::Created(branch))
}
