use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Exit status for a ticket argument or working directory the tool cannot use.
pub const EXIT_INVALID_INPUT: i32 = 5;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("Task ID not valid: {0}")]
    InvalidTicketId(String),
    #[error("This isn't a repository! ({})", .0.display())]
    NotARepository(PathBuf),
    #[error("version control error: {0}")]
    VersionControl(String),
    #[error("issue tracker error: {0}")]
    IssueTracker(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidTicketId(_) | AppError::NotARepository(_) => EXIT_INVALID_INPUT,
            _ => 1,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
