use super::require_current_branch;
use crate::context::Context;
use crate::error::{WorkflowError, WorkflowResult};
use crate::remote::infer_remote;
use crate::squash::find_squashed_diff;
use crate::state::resolve_parent;
use crate::ui::{Ui, plural};
use crate::vcs::Vcs;

/// Delete the current feature branch once its work has landed on the parent.
///
/// Work counts as landed if every commit is reachable from the parent, or
/// if the parent has a commit with the same net diff (a squash merge).
/// Otherwise the operator must confirm the deletion.
pub async fn done<G: Vcs, U: Ui>(ctx: &Context<'_, G, U>) -> WorkflowResult<()> {
    let feature = require_current_branch(ctx.git).await?;
    let parent = resolve_parent(ctx.git, &feature).await?.parent;

    ctx.log(format!(
        "Switching to detected parent branch '{}' and pulling latest commits",
        parent
    ));
    ctx.git.checkout(&parent).await?;
    ctx.git.pull().await?;

    let unmerged = ctx
        .git
        .count_commits(&format!("{}..{}", parent, feature))
        .await?;
    if unmerged > 0 {
        match find_squashed_diff(ctx.git, &feature, &parent).await? {
            Some(commit) => ctx.log(format!("Found squashed commit in {}: {}", parent, commit)),
            None => {
                let question = format!(
                    "Feature branch '{}' contains {} not present in '{}'.  Delete anyway?",
                    feature,
                    plural(unmerged, "commit"),
                    parent
                );
                if !ctx.ui.confirm(&question, false)? {
                    return Err(WorkflowError::user(format!(
                        "Refusing to cleanup unmerged feature branch '{}'",
                        feature
                    )));
                }
            }
        }
    }

    ctx.log(format!(
        "Deleting local {} feature branch and cleaning up remotes",
        feature
    ));
    ctx.git.delete_branch(&feature).await?;
    let remote = infer_remote(ctx, false).await?;
    ctx.git.prune_remote(remote.as_str()).await?;
    Ok(())
}
