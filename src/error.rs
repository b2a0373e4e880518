//! Workflow error type.
//!
//! Errors are split by audience:
//! - **User-facing** ([`WorkflowError::User`], [`WorkflowError::ForkMissing`]):
//!   an operator mistake or an expected precondition failure. The message is
//!   actionable and is printed verbatim, without diagnostic detail.
//! - **Unexpected** ([`WorkflowError::Git`], [`WorkflowError::Io`]): an engine
//!   call failed for an unanticipated reason. Printed with full detail.

use thiserror::Error;

use crate::git::GitError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A precondition the operator can fix.
    #[error("{0}")]
    User(String),

    /// The operator asked for a fork remote but has no fork yet.
    ///
    /// Nothing can be retried until the fork is created, so the binary exits
    /// with status 1 after printing the creation URL.
    #[error(
        "You don't seem to have a fork of {owner}/{repo} named {user}/{repo}; \
         make one at {fork_url} then try this again"
    )]
    ForkMissing {
        owner: String,
        repo: String,
        user: String,
        fork_url: String,
    },

    /// A git command failed unexpectedly.
    #[error(transparent)]
    Git(#[from] GitError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkflowError {
    pub fn user(message: impl Into<String>) -> Self {
        WorkflowError::User(message.into())
    }

    /// True if the message is safe to show without diagnostic detail.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            WorkflowError::User(_) | WorkflowError::ForkMissing { .. }
        )
    }
}

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;
