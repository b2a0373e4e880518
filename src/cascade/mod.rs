//! The merge-back cascade: `hotfix` → `release` → main.
//!
//! Every fix that reaches a long-lived branch must also reach the branches
//! downstream of it. A cascade walks the chain one hop at a time:
//!
//! ```text
//! hotfix ──► release ──► main
//! ```
//!
//! Each hop pulls the target, merges the source if it has anything new, and
//! commits and pushes the merge. A conflicting hop is never resolved
//! automatically: the target is reset, a `merge-<from>` feature branch is
//! started off it holding the conflicted merge, and the cascade stops with
//! instructions. Hops after a conflict do not run.

mod hop;

pub use hop::{HopOutcome, merge_message, try_merge};

use tracing::info;

use crate::context::Context;
use crate::error::WorkflowResult;
use crate::remote::assert_no_fork;
use crate::types::{CommandKind, HOTFIX_BRANCH, RELEASE_BRANCH};
use crate::ui::Ui;
use crate::vcs::Vcs;

/// Run the full cascade, then return to the branch the operator was on.
///
/// Stays on `main` if that is where the operator started (or on a detached
/// HEAD, where there is nothing to return to).
pub async fn merge_back<G: Vcs, U: Ui>(ctx: &Context<'_, G, U>, main: &str) -> WorkflowResult<()> {
    assert_no_fork(ctx, CommandKind::MergeBack).await?;

    let original = ctx.git.current_branch().await?;

    ctx.git.checkout(HOTFIX_BRANCH).await?;
    ctx.git.pull().await?;

    let hops = [(HOTFIX_BRANCH, RELEASE_BRANCH), (RELEASE_BRANCH, main)];
    for (from, to) in hops {
        let outcome = try_merge(ctx, from, to).await?;
        info!(%from, %to, ?outcome, "hop finished");
    }

    ctx.log("merge-back is clean");

    if let Some(branch) = original
        && branch != main
    {
        ctx.git.checkout(&branch).await?;
    }
    Ok(())
}
