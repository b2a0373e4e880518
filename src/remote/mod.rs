//! Which remote feature branches are pushed to.
//!
//! A repository with a `fork` remote always uses it. Otherwise branches go
//! to `origin`, unless the operator asks for a fork, in which case the fork
//! remote is derived from origin's URL, added, and verified with a fetch.

use tracing::{debug, warn};

use crate::context::Context;
use crate::error::{WorkflowError, WorkflowResult};
use crate::git::GitError;
use crate::github::{GitHubRepo, fork_creation_url, fork_remote_url, parse_remote_url};
use crate::types::{CommandKind, RemoteKind};
use crate::ui::Ui;
use crate::vcs::Vcs;

/// Decide where feature branches go, adding the fork remote if asked to.
///
/// Fails with [`WorkflowError::ForkMissing`] if `force_fork` is set and the
/// operator has no fork on the host; the half-added remote is removed first.
pub async fn infer_remote<G: Vcs, U: Ui>(
    ctx: &Context<'_, G, U>,
    force_fork: bool,
) -> WorkflowResult<RemoteKind> {
    let remotes = ctx.git.remotes().await?;
    if remotes.iter().any(|r| r.name == RemoteKind::Fork.as_str()) {
        debug!("fork remote already configured");
        return Ok(RemoteKind::Fork);
    }
    let origin = remotes
        .iter()
        .find(|r| r.name == RemoteKind::Origin.as_str())
        .ok_or_else(|| WorkflowError::user("Couldn't find 'origin' in list of remotes"))?;
    if !force_fork {
        return Ok(RemoteKind::Origin);
    }

    let repo = parse_remote_url(&origin.fetch_url)?;
    let fork_url = fork_remote_url(&origin.fetch_url, &ctx.settings.user)?;
    ctx.git.add_remote(RemoteKind::Fork.as_str(), &fork_url).await?;

    match ctx.git.fetch(RemoteKind::Fork.as_str()).await {
        Ok(()) => {
            ctx.log(format!("Added remote 'fork' at {}", fork_url));
            Ok(RemoteKind::Fork)
        }
        Err(err) => {
            if let Err(rollback) = ctx.git.remove_remote(RemoteKind::Fork.as_str()).await {
                warn!(error = %rollback, "failed to remove fork remote after failed fetch");
            }
            if !is_missing_repository(&err) {
                return Err(err.into());
            }

            let create_url = fork_creation_url(&repo);
            if ctx.settings.open_urls {
                ctx.ui.open_url(&create_url)?;
            }
            Err(WorkflowError::ForkMissing {
                owner: repo.owner,
                repo: repo.repo,
                user: ctx.settings.user.clone(),
                fork_url: create_url,
            })
        }
    }
}

/// Fail if feature branches would go to a fork.
///
/// Cascade and release commands push to the shared long-lived branches,
/// which only exist on origin.
pub async fn assert_no_fork<G: Vcs, U: Ui>(
    ctx: &Context<'_, G, U>,
    command: CommandKind,
) -> WorkflowResult<()> {
    match infer_remote(ctx, false).await? {
        RemoteKind::Fork => Err(WorkflowError::user(format!(
            "You cannot run \"git wf {}\" with a fork remote",
            command
        ))),
        RemoteKind::Origin => Ok(()),
    }
}

/// The GitHub repository behind a configured remote.
pub async fn remote_repo<G: Vcs>(git: &G, remote: RemoteKind) -> WorkflowResult<GitHubRepo> {
    let remotes = git.remotes().await?;
    let info = remotes
        .iter()
        .find(|r| r.name == remote.as_str())
        .ok_or_else(|| {
            WorkflowError::user(format!("Couldn't find '{}' in list of remotes", remote))
        })?;
    parse_remote_url(&info.fetch_url)
}

/// Whether a fetch failed because the remote repository doesn't exist.
fn is_missing_repository(err: &GitError) -> bool {
    err.stderr().is_some_and(|stderr| {
        stderr.contains("Repository not found")
            || stderr.contains("does not appear to be a git repository")
    })
}
