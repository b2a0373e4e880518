use chrono::{DateTime, Utc};

use super::require_current_branch;
use crate::cascade::merge_back;
use crate::context::Context;
use crate::error::WorkflowResult;
use crate::remote::assert_no_fork;
use crate::types::{CommandKind, RELEASE_BRANCH, RemoteKind};
use crate::ui::Ui;
use crate::vcs::{PushSpec, Vcs};

/// Arguments to [`qa`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaArgs {
    /// Branch to tag; the current branch if unset.
    pub branch: Option<String>,
    /// Require a clean merge-back before tagging `release`.
    pub merge_back: bool,
}

impl Default for QaArgs {
    fn default() -> Self {
        QaArgs {
            branch: None,
            merge_back: true,
        }
    }
}

/// `build-YYYY.MM.DD_HH.MM.SS` in UTC.
pub fn build_tag(at: DateTime<Utc>) -> String {
    at.format("build-%Y.%m.%d_%H.%M.%S").to_string()
}

/// Tag a branch as a build and push the tag. Returns the tag.
pub async fn qa<G: Vcs, U: Ui>(
    ctx: &Context<'_, G, U>,
    args: &QaArgs,
    main: &str,
) -> WorkflowResult<String> {
    assert_no_fork(ctx, CommandKind::Qa).await?;

    let branch = match &args.branch {
        Some(branch) => {
            ctx.git.checkout(branch).await?;
            branch.clone()
        }
        None => require_current_branch(ctx.git).await?,
    };

    if branch == RELEASE_BRANCH && args.merge_back {
        ctx.log("Requiring clean merge-back for release qa");
        merge_back(ctx, main).await?;
    } else {
        ctx.log(format!("Pulling latest commits for '{}'", branch));
        ctx.git.pull().await?;
    }

    let tag = build_tag(Utc::now());
    ctx.log(format!("Creating and pushing tag to github: {}", tag));
    ctx.git.tag(&tag).await?;
    ctx.git
        .push(&PushSpec::Tag {
            remote: RemoteKind::Origin.to_string(),
            tag: tag.clone(),
        })
        .await?;
    Ok(tag)
}
