use super::announce_url;
use crate::cascade::merge_back;
use crate::context::Context;
use crate::error::WorkflowResult;
use crate::github::compare_url;
use crate::remote::{assert_no_fork, remote_repo};
use crate::types::{CommandKind, RELEASE_BRANCH, RemoteKind};
use crate::ui::Ui;
use crate::vcs::Vcs;

/// Merge back, then open a pull request moving `branch` (default: main)
/// onto `release`. Returns the compare URL.
pub async fn cut_release<G: Vcs, U: Ui>(
    ctx: &Context<'_, G, U>,
    branch: Option<&str>,
    main: &str,
) -> WorkflowResult<String> {
    assert_no_fork(ctx, CommandKind::CutRelease).await?;
    let branch = branch.unwrap_or(main);

    ctx.log("Ensuring all changes are merged back");
    merge_back(ctx, main).await?;

    ctx.log(format!(
        "Creating PR to fast-forward merge {} onto {}",
        branch, RELEASE_BRANCH
    ));
    let origin = remote_repo(ctx.git, RemoteKind::Origin).await?;
    let url = compare_url(
        &origin,
        RELEASE_BRANCH,
        None,
        branch,
        &format!("Cut release from {}", branch),
        "",
    );
    announce_url(ctx, &url)?;
    Ok(url)
}
