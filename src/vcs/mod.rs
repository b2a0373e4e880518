//! The version-control engine interface.
//!
//! Every workflow component drives the repository through [`Vcs`]. The
//! production implementation is [`GitCli`](crate::git::GitCli); the trait
//! keeps the surface narrow and typed (merge results, push shapes, commit
//! outcomes) so output-text interpretation stays inside the adapter.

use std::future::Future;

use crate::git::{GitConfigMap, GitResult};
use crate::types::Sha;

pub use crate::git::merge::MergeResult;
pub use crate::git::push::PushSpec;

/// Where a ref lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchKind {
    /// `refs/heads/<name>`.
    Local,
    /// `refs/remotes/<remote>/<name>`.
    RemoteTracking { remote: String },
}

/// A branch with its tracking information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchInfo {
    /// Short name: `kittens` for local branches, `origin/kittens` for
    /// remote-tracking ones.
    pub name: String,
    pub kind: BranchKind,
    /// Short upstream name (`origin/kittens`), local branches only.
    pub upstream: Option<String>,
    pub head: Sha,
}

impl BranchInfo {
    pub fn is_local(&self) -> bool {
        matches!(self.kind, BranchKind::Local)
    }

    pub fn is_remote_tracking(&self) -> bool {
        matches!(self.kind, BranchKind::RemoteTracking { .. })
    }
}

/// Lookup helpers over a branch listing.
pub trait BranchListExt {
    fn has_local(&self, name: &str) -> bool;
    fn has_remote(&self, remote: &str, name: &str) -> bool;
}

impl BranchListExt for [BranchInfo] {
    fn has_local(&self, name: &str) -> bool {
        self.iter().any(|b| b.is_local() && b.name == name)
    }

    fn has_remote(&self, remote: &str, name: &str) -> bool {
        let full = format!("{}/{}", remote, name);
        self.iter()
            .any(|b| b.is_remote_tracking() && b.name == full)
    }
}

/// A configured remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInfo {
    pub name: String,
    pub fetch_url: String,
}

/// One commit from a log listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub sha: Sha,
    pub subject: String,
    pub body: String,
}

/// Outcome of `git commit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// The index had no changes; git refused to create an empty commit.
    NothingToCommit,
}

/// The operations the workflow needs from a version-control engine.
///
/// Implementations are bound to one working tree. Methods that take a
/// `range` accept any git revision range (`a..b`, `..b`).
pub trait Vcs {
    /// The checked-out branch, or `None` on a detached HEAD.
    fn current_branch(&self) -> impl Future<Output = GitResult<Option<String>>> + Send;

    /// Local and remote-tracking branches.
    fn branches(&self) -> impl Future<Output = GitResult<Vec<BranchInfo>>> + Send;

    /// The effective configuration.
    fn config(&self) -> impl Future<Output = GitResult<GitConfigMap>> + Send;

    /// Set a key in the repository's local configuration.
    fn set_config(&self, key: &str, value: &str) -> impl Future<Output = GitResult<()>> + Send;

    fn checkout(&self, target: &str) -> impl Future<Output = GitResult<()>> + Send;

    /// Create `name` at HEAD and check it out.
    fn checkout_new_branch(&self, name: &str) -> impl Future<Output = GitResult<()>> + Send;

    /// Create `name` at `start` without tracking and without checking it out.
    fn create_branch(&self, name: &str, start: &str)
    -> impl Future<Output = GitResult<()>> + Send;

    /// Force-delete a local branch.
    fn delete_branch(&self, name: &str) -> impl Future<Output = GitResult<()>> + Send;

    /// Set the current branch's upstream (`origin/x`).
    fn set_upstream(&self, upstream: &str) -> impl Future<Output = GitResult<()>> + Send;

    fn add_all(&self) -> impl Future<Output = GitResult<()>> + Send;

    fn commit(&self, message: &str) -> impl Future<Output = GitResult<CommitOutcome>> + Send;

    /// `git pull --no-rebase` on the current branch.
    fn pull(&self) -> impl Future<Output = GitResult<()>> + Send;

    fn push(&self, spec: &PushSpec) -> impl Future<Output = GitResult<()>> + Send;

    /// Merge `target` into HEAD without committing, forcing a merge commit.
    fn merge(&self, target: &str) -> impl Future<Output = GitResult<MergeResult>> + Send;

    fn merge_ff_only(&self, target: &str) -> impl Future<Output = GitResult<()>> + Send;

    /// Discard index and working tree changes (also clears a pending merge).
    fn reset_hard(&self) -> impl Future<Output = GitResult<()>> + Send;

    /// Stash tracked and untracked changes.
    ///
    /// Returns `false` if git had nothing to stash and the stash stack is
    /// unchanged.
    fn stash(&self) -> impl Future<Output = GitResult<bool>> + Send;

    fn stash_pop(&self) -> impl Future<Output = GitResult<()>> + Send;

    /// Paths with staged, unstaged or untracked changes.
    fn changed_files(&self) -> impl Future<Output = GitResult<Vec<String>>> + Send;

    fn remotes(&self) -> impl Future<Output = GitResult<Vec<RemoteInfo>>> + Send;

    fn add_remote(&self, name: &str, url: &str) -> impl Future<Output = GitResult<()>> + Send;

    fn remove_remote(&self, name: &str) -> impl Future<Output = GitResult<()>> + Send;

    fn fetch(&self, remote: &str) -> impl Future<Output = GitResult<()>> + Send;

    fn fetch_tags(&self) -> impl Future<Output = GitResult<()>> + Send;

    /// Drop remote-tracking refs whose remote branch is gone.
    fn prune_remote(&self, remote: &str) -> impl Future<Output = GitResult<()>> + Send;

    /// Patch text for a revision range.
    fn diff(&self, range: &str) -> impl Future<Output = GitResult<String>> + Send;

    /// `git show` of one commit: header, message, then patch.
    fn show(&self, rev: &str) -> impl Future<Output = GitResult<String>> + Send;

    /// Commits in a range, newest first.
    fn log(&self, range: &str) -> impl Future<Output = GitResult<Vec<LogEntry>>> + Send;

    fn count_commits(&self, range: &str) -> impl Future<Output = GitResult<usize>> + Send;

    /// Create a lightweight tag at HEAD.
    fn tag(&self, name: &str) -> impl Future<Output = GitResult<()>> + Send;

    fn rev_parse(&self, rev: &str) -> impl Future<Output = GitResult<Sha>> + Send;

    fn merge_base(&self, a: &str, b: &str) -> impl Future<Output = GitResult<Sha>> + Send;

    /// Parentless commits reachable from `rev`, in `rev-list` order.
    fn root_commits(&self, rev: &str) -> impl Future<Output = GitResult<Vec<Sha>>> + Send;
}
