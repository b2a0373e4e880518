use tracing::{debug, warn};

use crate::commands::{StartArgs, start};
use crate::context::Context;
use crate::error::{WorkflowError, WorkflowResult};
use crate::git::GitError;
use crate::ui::Ui;
use crate::vcs::{CommitOutcome, MergeResult, PushSpec, Vcs};

/// How a clean hop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopOutcome {
    /// `to` already contained every commit of `from`.
    UpToDate,
    /// A merge commit was created and pushed.
    Merged,
}

/// Commit message for an automated merge.
pub fn merge_message(to: &str, from: &str, command_line: &str) -> String {
    format!(
        "Automated merge-back {} ← {}\n\nOriginal command was: {}\n",
        to, from, command_line
    )
}

/// Merge `from` into `to` and push the result.
///
/// On conflict, leaves the operator on a new `merge-<from>` feature branch
/// holding the conflicted merge and returns a user-facing error.
pub async fn try_merge<G: Vcs, U: Ui>(
    ctx: &Context<'_, G, U>,
    from: &str,
    to: &str,
) -> WorkflowResult<HopOutcome> {
    ctx.log(format!("{} ← {}", to, from));
    ctx.git.checkout(to).await?;
    ctx.git.pull().await?;

    let pending = ctx.git.count_commits(&format!("{}..{}", to, from)).await?;
    if pending == 0 {
        debug!(%from, %to, "nothing to merge");
        return Ok(HopOutcome::UpToDate);
    }

    ctx.log(format!("Merging {} onto {}", from, to));
    let conflict = match ctx.git.merge(from).await {
        Ok(MergeResult::Clean { .. }) => None,
        Ok(MergeResult::Conflicted { output }) => Some(output),
        Err(GitError::CommandFailed { stderr, .. }) => Some(stderr),
        Err(e) => return Err(e.into()),
    };
    if let Some(output) = conflict {
        debug!(%from, %to, %output, "merge did not apply cleanly");
        ctx.log("Automated merge failed; creating feature branch for resolution");
        return Err(escape_to_feature_branch(ctx, from).await);
    }

    ctx.log(format!(
        "Merged cleanly; committing & pushing results to {} branch",
        to
    ));
    let message = merge_message(to, from, &ctx.settings.command_line);
    if ctx.git.commit(&message).await? == CommitOutcome::NothingToCommit {
        warn!(%from, %to, "merge produced nothing to commit");
    }
    ctx.git.push(&PushSpec::Upstream).await?;
    Ok(HopOutcome::Merged)
}

/// Abandon the automated merge and hand it to a human on a feature branch.
///
/// Always returns the error that stops the cascade: the resolution
/// instructions, or whatever failed while setting the branch up.
async fn escape_to_feature_branch<G: Vcs, U: Ui>(
    ctx: &Context<'_, G, U>,
    from: &str,
) -> WorkflowError {
    match start_resolution_branch(ctx, from).await {
        Ok(()) => WorkflowError::user("When conflicts are resolved, commit and `git wf pr`"),
        Err(e) => e,
    }
}

async fn start_resolution_branch<G: Vcs, U: Ui>(
    ctx: &Context<'_, G, U>,
    from: &str,
) -> WorkflowResult<()> {
    ctx.git.reset_hard().await?;
    start(ctx, &StartArgs::new(format!("merge-{}", from))).await?;

    // Expected to conflict: the branch exists to hold the markers.
    match ctx.git.merge(from).await {
        Ok(result) => debug!(conflicted = result.is_conflict(), "re-ran merge on resolution branch"),
        Err(e) => debug!(error = %e, "re-ran merge on resolution branch"),
    }
    Ok(())
}
