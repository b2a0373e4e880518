use super::require_current_branch;
use super::start::is_valid_branch_name;
use crate::context::Context;
use crate::error::{WorkflowError, WorkflowResult};
use crate::state::resolve_parent;
use crate::ui::Ui;
use crate::vcs::{PushSpec, Vcs};

/// Rename the current feature branch, keeping its parent.
///
/// The remote branch is copied server-side from the last fetched state, so
/// unpushed local commits survive only locally until the next push.
pub async fn rename<G: Vcs, U: Ui>(ctx: &Context<'_, G, U>, new_branch: &str) -> WorkflowResult<()> {
    if !is_valid_branch_name(new_branch) {
        return Err(WorkflowError::user("branch must match /^[\\w-]+$/"));
    }
    let current = require_current_branch(ctx.git).await?;
    let link = resolve_parent(ctx.git, &current).await?;
    let remote = link.remote.as_str();
    let user = &ctx.settings.user;
    let old_remote_branch = link.remote_branch(&current, user);
    let new_remote_branch = link.remote_branch(new_branch, user);

    if !ctx.git.changed_files().await?.is_empty() {
        return Err(WorkflowError::user(
            "Commit current work before renaming branch",
        ));
    }

    ctx.log(format!("Fetching {}", remote));
    ctx.git.fetch(remote).await?;

    ctx.log(format!("Creating {} on {}", new_remote_branch, remote));
    ctx.git
        .push(&PushSpec::Refspec {
            remote: remote.to_string(),
            refspec: format!(
                "refs/remotes/{}/{}:refs/heads/{}",
                remote, old_remote_branch, new_remote_branch
            ),
        })
        .await?;

    ctx.log(format!("Creating local {} branch", new_branch));
    ctx.git.checkout_new_branch(new_branch).await?;
    ctx.git
        .set_upstream(&format!("{}/{}", remote, new_remote_branch))
        .await?;

    ctx.log("Deleting old local & remote branches");
    ctx.git.delete_branch(&current).await?;
    ctx.git
        .push(&PushSpec::Delete {
            remote: remote.to_string(),
            branch: old_remote_branch,
        })
        .await?;
    Ok(())
}
