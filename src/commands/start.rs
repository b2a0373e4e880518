use tracing::info;

use super::require_current_branch;
use crate::context::Context;
use crate::error::{WorkflowError, WorkflowResult};
use crate::remote::infer_remote;
use crate::state::remote_name_for;
use crate::ui::Ui;
use crate::vcs::{BranchListExt, PushSpec, Vcs};

/// Arguments to [`start`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartArgs {
    pub branch: String,
    /// Push the branch to the operator's fork, creating the remote if needed.
    pub fork: bool,
    /// Carry uncommitted changes over to the new branch.
    pub stash: bool,
    /// Record this as the parent instead of the current branch.
    pub pr_base: Option<String>,
}

impl StartArgs {
    pub fn new(branch: impl Into<String>) -> Self {
        StartArgs {
            branch: branch.into(),
            ..Default::default()
        }
    }
}

/// Create a feature branch off the current branch and push it with tracking.
///
/// The tracked remote ref encodes the parent, so later commands can find
/// it again without any state of their own.
pub async fn start<G: Vcs, U: Ui>(ctx: &Context<'_, G, U>, args: &StartArgs) -> WorkflowResult<()> {
    if !is_valid_branch_name(&args.branch) {
        return Err(WorkflowError::user("branch must match /^[\\w-]+$/"));
    }

    let branches = ctx.git.branches().await?;
    if branches.has_local(&args.branch) {
        return Err(WorkflowError::user(format!(
            "You already have a branch named {}",
            args.branch
        )));
    }
    let current = require_current_branch(ctx.git).await?;

    let remote = infer_remote(ctx, args.fork).await?;
    let parent = args.pr_base.as_deref().unwrap_or(&current);
    let remote_branch = remote_name_for(
        &args.branch,
        parent,
        remote.is_fork(),
        &ctx.settings.user,
    );

    let stashed = if args.stash {
        if ctx.git.changed_files().await?.is_empty() {
            return Err(WorkflowError::user("No changed files to stash"));
        }
        ctx.log("Stashing changes");
        if !ctx.git.stash().await? {
            return Err(WorkflowError::user("No changed files to stash"));
        }
        true
    } else {
        false
    };

    ctx.log(format!("Updating current branch '{}'", current));
    ctx.git.pull().await?;

    ctx.log(format!(
        "Creating and pushing branch {}:{}",
        args.branch, remote_branch
    ));
    ctx.git.checkout_new_branch(&args.branch).await?;
    ctx.git
        .push(&PushSpec::SetUpstream {
            remote: remote.to_string(),
            local: args.branch.clone(),
            remote_branch: remote_branch.clone(),
        })
        .await?;
    info!(branch = %args.branch, %remote, %remote_branch, parent, "started feature branch");

    if stashed {
        ctx.log("Popping stashed changes");
        ctx.git.stash_pop().await?;
    }
    Ok(())
}

/// Word characters and dashes only.
pub(super) fn is_valid_branch_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
