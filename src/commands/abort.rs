use tracing::debug;

use super::require_current_branch;
use crate::context::Context;
use crate::error::WorkflowResult;
use crate::state::resolve_parent;
use crate::ui::Ui;
use crate::vcs::{CommitOutcome, PushSpec, Vcs};

/// Throw away the current feature branch, locally and on its remote.
///
/// Uncommitted work is first committed as `WIP` so the logged SHA still
/// reaches it. Returns that SHA.
pub async fn abort<G: Vcs, U: Ui>(ctx: &Context<'_, G, U>) -> WorkflowResult<String> {
    let feature = require_current_branch(ctx.git).await?;
    let link = resolve_parent(ctx.git, &feature).await?;

    ctx.log("Committing in-progress work as WIP");
    ctx.git.add_all().await?;
    if ctx.git.commit("WIP").await? == CommitOutcome::NothingToCommit {
        debug!(%feature, "no in-progress work");
    }
    let final_sha = ctx.git.rev_parse("HEAD").await?;

    ctx.log(format!("Switching to detected parent branch '{}'", link.parent));
    ctx.git.checkout(&link.parent).await?;

    ctx.log(format!(
        "Deleting {} feature branch and cleaning up remotes",
        feature
    ));
    ctx.git.delete_branch(&feature).await?;
    ctx.git
        .push(&PushSpec::Delete {
            remote: link.remote.to_string(),
            branch: link.remote_branch(&feature, &ctx.settings.user),
        })
        .await?;
    ctx.git.prune_remote(link.remote.as_str()).await?;

    ctx.log(format!("{} aborted; last SHA was {}", feature, final_sha));
    Ok(final_sha.as_str().to_string())
}
