mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use std::sync::Arc;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cmd::checkout::{self, CheckoutCommandArgs};
use crate::cmd::config as config_cmd;
use crate::config::{AppConfig, ConfigState, StoredConfig};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::infra::git::GitCli;
use crate::infra::teamwork::TeamworkClient;

#[derive(Parser)]
#[command(
    name = "teamwork",
    author,
    version,
    about = "Checkout a ticket branch",
    after_help = "Ticket URLs look like {base_url}/tasks/[TASKID], where base_url is the\n\
                  Teamwork URL entered during setup."
)]
struct Cli {
    /// Ticket ID, either as a number or a Teamwork task URL.
    #[arg(value_name = "TASK_ID_OR_URL")]
    ticket: Option<String>,

    /// If creating a branch, do it as a hotfix (default is feature).
    #[arg(long)]
    hotfix: bool,

    /// Run the Teamwork setup again (it runs automatically on first launch).
    #[arg(long)]
    reconfigure: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(error.exit_code());
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    let config = load_config(&cwd, cli.reconfigure)?;

    let Some(ticket) = cli.ticket else {
        if cli.reconfigure {
            return Ok(());
        }
        return Err(AppError::InvalidTicketId("no task id or url given".to_string()));
    };

    let git = GitCli::new(config.workspace_root.clone())
        .with_remote(config.remote.clone())
        .with_trunk_branch(config.trunk_branch.clone());
    let issue_tracker = TeamworkClient::new(config.api_root(), config.api_key.clone());
    let context = AppContext::new(config, Arc::new(git), Arc::new(issue_tracker));

    let outcome = checkout::run(
        &context,
        CheckoutCommandArgs {
            ticket,
            hotfix: cli.hotfix,
        },
    )
    .await?;

    debug!(branch = %outcome.branch(), "checked out");
    println!("{outcome}");
    println!("---");
    Ok(())
}

/// Loads stored settings, running setup when asked to or when they are incomplete.
fn load_config(cwd: &std::path::Path, reconfigure: bool) -> AppResult<AppConfig> {
    let stored = StoredConfig::load()?;
    if !reconfigure {
        if let ConfigState::Ready(config) = stored.resolve(cwd) {
            return Ok(config);
        }
        debug!("configuration incomplete, starting setup");
    }

    config_cmd::run_setup(stored, cwd)
}
