use crate::context::AppContext;
use crate::domain::branch::{BranchCategory, BranchMatch};
use crate::error::AppResult;
use crate::workflow::checkout::{fetch_ticket, resolve_branch};

#[derive(Debug, Clone)]
pub struct CheckoutCommandArgs {
    pub ticket: String,
    pub hotfix: bool,
}

/// Prints the ticket summary, then checks out the ticket's branch.
pub async fn run(ctx: &AppContext, args: CheckoutCommandArgs) -> AppResult<BranchMatch> {
    let (id, ticket) = fetch_ticket(ctx, &args.ticket).await?;
    println!("{ticket}");

    let category = BranchCategory::from_hotfix_flag(args.hotfix);
    resolve_branch(id, &ticket.title, category, ctx.version_control.as_ref()).await
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::config::AppConfig;
    use crate::domain::branch::{BranchName, RemoteBranch};
    use crate::domain::ticket::{TicketId, TicketSummary};
    use crate::error::AppError;
    use crate::services::{IssueTrackerService, VersionControlService};

    struct FakeTracker {
        requested: Mutex<Vec<TicketId>>,
    }

    #[async_trait]
    impl IssueTrackerService for FakeTracker {
        async fn fetch_ticket(&self, id: TicketId) -> AppResult<TicketSummary> {
            self.requested.lock().unwrap().push(id);
            Ok(TicketSummary {
                title: "Fix login bug".to_string(),
                project_name: "Website".to_string(),
                list_name: "Backlog".to_string(),
                description: String::new(),
                creator_name: "Ada Lovelace".to_string(),
                assignee: None,
                estimated_minutes: None,
            })
        }
    }

    /// Empty repository that records the branch it was asked to create.
    #[derive(Default)]
    struct EmptyRepo {
        created: Mutex<Option<String>>,
    }

    #[async_trait]
    impl VersionControlService for EmptyRepo {
        async fn ensure_repository(&self) -> AppResult<()> {
            Ok(())
        }
        async fn local_branches(&self) -> AppResult<Vec<String>> {
            Ok(vec!["master".to_string()])
        }
        async fn fetch_remote_branches(&self) -> AppResult<Vec<RemoteBranch>> {
            Ok(Vec::new())
        }
        async fn trunk_branch(&self) -> AppResult<String> {
            Ok("master".to_string())
        }
        async fn create_branch(&self, name: &BranchName, _from: &str) -> AppResult<()> {
            *self.created.lock().unwrap() = Some(name.0.clone());
            Ok(())
        }
        async fn delete_branch(&self, _name: &BranchName) -> AppResult<()> {
            Ok(())
        }
        async fn checkout(&self, _target: &str, _new_local: Option<&BranchName>) -> AppResult<()> {
            Ok(())
        }
    }

    fn context() -> (AppContext, Arc<FakeTracker>, Arc<EmptyRepo>) {
        let tracker = Arc::new(FakeTracker {
            requested: Mutex::new(Vec::new()),
        });
        let repo = Arc::new(EmptyRepo::default());
        let config = AppConfig {
            company: "acme".to_string(),
            api_key: "key".to_string(),
            base_url: "http://acme.teamwork.com".to_string(),
            trunk_branch: None,
            remote: None,
            workspace_root: PathBuf::from("."),
        };
        let ctx = AppContext::new(config, repo.clone(), tracker.clone());
        (ctx, tracker, repo)
    }

    #[tokio::test]
    async fn url_argument_resolves_to_hotfix_branch() {
        let (ctx, tracker, repo) = context();
        let args = CheckoutCommandArgs {
            ticket: "http://acme.teamwork.com/tasks/123#comments".to_string(),
            hotfix: true,
        };

        let outcome = run(&ctx, args).await.unwrap();

        assert_eq!(
            outcome,
            BranchMatch::Created(BranchName("hotfix/123-fix-login-bug".to_string()))
        );
        assert_eq!(*tracker.requested.lock().unwrap(), vec![TicketId(123)]);
        assert_eq!(
            repo.created.lock().unwrap().as_deref(),
            Some("hotfix/123-fix-login-bug")
        );
    }

    #[tokio::test]
    async fn invalid_argument_never_reaches_tracker() {
        let (ctx, tracker, _repo) = context();
        let args = CheckoutCommandArgs {
            ticket: "not-a-ticket".to_string(),
            hotfix: false,
        };

        let err = run(&ctx, args).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidTicketId(_)));
        assert_eq!(err.exit_code(), 5);
        assert!(tracker.requested.lock().unwrap().is_empty());
    }
}
