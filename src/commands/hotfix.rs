use crate::context::Context;
use crate::error::WorkflowResult;
use crate::remote::assert_no_fork;
use crate::types::{CommandKind, HOTFIX_BRANCH};
use crate::ui::Ui;
use crate::vcs::{PushSpec, Vcs};

/// Fast-forward `hotfix` to a build tag and push it.
///
/// Fails if the tag is not a descendant of `hotfix`.
pub async fn hotfix<G: Vcs, U: Ui>(ctx: &Context<'_, G, U>, build_tag: &str) -> WorkflowResult<()> {
    assert_no_fork(ctx, CommandKind::Hotfix).await?;

    ctx.log(format!(
        "Switching to branch '{}' and pulling latest commits and tags",
        HOTFIX_BRANCH
    ));
    ctx.git.checkout(HOTFIX_BRANCH).await?;
    ctx.git.pull().await?;
    ctx.git.fetch_tags().await?;

    ctx.log(format!(
        "Fast-forwarding '{}' to '{}' and pushing",
        HOTFIX_BRANCH, build_tag
    ));
    ctx.git.merge_ff_only(build_tag).await?;
    ctx.git.push(&PushSpec::Upstream).await?;
    Ok(())
}
