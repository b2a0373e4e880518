//! Workflow commands.
//!
//! Each command is one async function taking a [`Context`] and its
//! arguments. The binary runs [`verify_setup`](crate::preflight::verify_setup)
//! before dispatching, so commands may assume `push.default=upstream` and,
//! for cascade commands, well-formed `hotfix`/`release`/main branches.
//!
//! # Supported Commands
//!
//! - `start <branch>` - create a feature branch off the current branch
//! - `done` - delete a merged (or squash-merged) feature branch
//! - `abort` - discard a feature branch, keeping its last SHA in the log
//! - `rename <new>` - rename the current feature branch locally and remotely
//! - `pr` - push and open a pull request against the parent
//! - `hotfix <tag>` - fast-forward `hotfix` to a build tag
//! - `qa [branch]` - tag a branch as a build
//! - `cut-release [branch]` - merge back, then open a PR onto `release`
//! - `merge-back` - cascade `hotfix` → `release` → main

mod abort;
mod cut_release;
mod done;
mod hotfix;
mod pr;
mod qa;
mod rename;
mod start;

pub use crate::context::Context;
pub use abort::abort;
pub use cut_release::cut_release;
pub use done::done;
pub use hotfix::hotfix;
pub use pr::{PrDraft, draft_pr, pr};
pub use qa::{QaArgs, build_tag, qa};
pub use rename::rename;
pub use start::{StartArgs, start};

use crate::error::{WorkflowError, WorkflowResult};
use crate::ui::Ui;
use crate::vcs::Vcs;

/// The checked-out branch; commands refuse to run on a detached HEAD.
pub(crate) async fn require_current_branch<G: Vcs>(git: &G) -> WorkflowResult<String> {
    git.current_branch()
        .await?
        .ok_or_else(|| WorkflowError::user("Not on a branch (detached HEAD)"))
}

/// Print a URL and open it if browsing is enabled.
pub(crate) fn announce_url<G: Vcs, U: Ui>(ctx: &Context<'_, G, U>, url: &str) -> WorkflowResult<()> {
    ctx.log(format!("Opening {}", url));
    if ctx.settings.open_urls {
        ctx.ui.open_url(url)?;
    }
    Ok(())
}
