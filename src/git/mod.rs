//! Local git operations driven through the `git` command line.
//!
//! This module is the only place that spawns `git`. It provides:
//! - Process helpers (`git_command`, `run_git`, `run_git_stdout`)
//! - Output classification for merges and pushes (`merge`, `push`)
//! - `git config --list --null` parsing (`config`)
//! - [`GitCli`], the [`Vcs`](crate::vcs::Vcs) adapter used by the binary
//!
//! Commands run with `LC_ALL=C` so the English status strings we match on
//! (`CONFLICT`, `nothing to commit`, `Repository not found`) are stable.

pub mod cli;
pub mod config;
pub mod merge;
pub mod push;

use std::path::Path;
use std::process::{Output, Stdio};

use thiserror::Error;
use tracing::debug;

use crate::types::InvalidSha;

pub use cli::GitCli;
pub use config::GitConfigMap;

/// Errors from git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Git command failed.
    #[error("git command failed: {command}\nstderr: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// Push was rejected by the remote.
    #[error("push rejected: {details}")]
    PushRejected { details: String },

    /// Output that should have been a SHA was not one.
    #[error(transparent)]
    InvalidSha(#[from] InvalidSha),

    /// IO error (e.g. `git` not on `PATH`).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GitError {
    /// The stderr text of a failed command, if this error carries one.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            GitError::CommandFailed { stderr, .. } => Some(stderr),
            GitError::PushRejected { details } => Some(details),
            _ => None,
        }
    }
}

/// Result type for git operations.
pub type GitResult<T> = Result<T, GitError>;

/// Create a git Command rooted at `workdir`.
///
/// Unlike a bot working in its own clone, this tool runs inside the
/// operator's repository, so user and system configuration (identity,
/// credentials, hooks) are left in effect.
pub(crate) fn git_command(workdir: &Path) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("git");
    cmd.current_dir(workdir);
    cmd.env("LC_ALL", "C");
    // Merges must never open an editor.
    cmd.env("GIT_MERGE_AUTOEDIT", "no");
    cmd.stdin(Stdio::null());
    cmd
}

/// Run a git command and capture its output regardless of exit status.
pub(crate) async fn run_git_unchecked(workdir: &Path, args: &[&str]) -> GitResult<Output> {
    debug!(args = ?args, "git");
    let output = git_command(workdir).args(args).output().await?;
    Ok(output)
}

/// Run a git command in the given working directory.
///
/// Returns the command output on success, or a `GitError` on failure.
pub async fn run_git(workdir: &Path, args: &[&str]) -> GitResult<Output> {
    let output = run_git_unchecked(workdir, args).await?;

    if output.status.success() {
        Ok(output)
    } else {
        Err(command_failed(args, &output))
    }
}

/// Run a git command and return stdout as a string, trimmed.
pub async fn run_git_stdout(workdir: &Path, args: &[&str]) -> GitResult<String> {
    let output = run_git(workdir, args).await?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run a git command and return stdout verbatim (used for patches).
pub async fn run_git_raw(workdir: &Path, args: &[&str]) -> GitResult<String> {
    let output = run_git(workdir, args).await?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Combined stdout and stderr of a finished command.
pub(crate) fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{}{}", stdout, stderr)
}

pub(crate) fn command_failed(args: &[&str], output: &Output) -> GitError {
    let mut stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        // Some porcelain (commit, merge) reports failures on stdout.
        stderr = String::from_utf8_lossy(&output.stdout).trim().to_string();
    }
    GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr,
    }
}
