use tracing::{debug, info};

use crate::context::Context;
use crate::error::{WorkflowError, WorkflowResult};
use crate::git::GitConfigMap;
use crate::types::{CommandKind, HOTFIX_BRANCH, MAIN_BRANCH_CANDIDATES, RELEASE_BRANCH, RemoteKind};
use crate::ui::Ui;
use crate::vcs::{BranchInfo, BranchListExt, PushSpec, Vcs};

/// Passes before giving up; every pass after the first starts with a fetch.
pub const MAX_SETUP_PASSES: usize = 2;

const ORIGIN: &str = RemoteKind::Origin.as_str();

/// Outcome of one pass over the checks.
#[derive(Debug, PartialEq, Eq)]
enum Pass {
    /// Everything is in place. Carries the main-line name when known.
    Converged(Option<String>),
    /// Something is missing that a fetch might explain.
    Stale(String),
}

/// Check (and repair) repository setup for `command`.
///
/// Returns the name of the main line (`main` or `master`) when the command
/// needs the cascade branches, and also when it merely exists locally.
pub async fn verify_setup<G: Vcs, U: Ui>(
    ctx: &Context<'_, G, U>,
    command: CommandKind,
) -> WorkflowResult<Option<String>> {
    let mut last_reason = String::new();
    for pass in 1..=MAX_SETUP_PASSES {
        let fetched = pass > 1;
        if fetched {
            debug!(pass, "fetching origin before re-checking setup");
            ctx.git.fetch(ORIGIN).await?;
        }
        match run_pass(ctx, command, fetched).await? {
            Pass::Converged(main) => {
                debug!(pass, ?main, %command, "setup verified");
                return Ok(main);
            }
            Pass::Stale(reason) => {
                info!(pass, %reason, "setup looks stale");
                last_reason = reason;
            }
        }
    }
    Err(WorkflowError::user(format!(
        "Repository setup did not converge: {}",
        last_reason
    )))
}

async fn run_pass<G: Vcs, U: Ui>(
    ctx: &Context<'_, G, U>,
    command: CommandKind,
    fetched: bool,
) -> WorkflowResult<Pass> {
    let branches = ctx.git.branches().await?;
    let config = ctx.git.config().await?;

    if config.get("push.default") != Some("upstream") {
        ctx.log("Setting push.default=upstream for this repo");
        ctx.git.set_config("push.default", "upstream").await?;
    }

    if !command.needs_cascade_branches() {
        return Ok(Pass::Converged(local_main(&branches)));
    }

    let main = match local_main(&branches) {
        Some(main) if config.branch_value(&main, "remote") == Some(ORIGIN) => main,
        _ => {
            let name = expected_main(&branches);
            if !fetched {
                return Ok(Pass::Stale(format!("no local '{}' tracking origin", name)));
            }
            return Err(WorkflowError::user(format!(
                "Missing required '{}' branch from remote '{}'",
                name, ORIGIN
            )));
        }
    };

    for name in [RELEASE_BRANCH, HOTFIX_BRANCH] {
        let stale =
            ensure_tracking_branch(ctx, &branches, &config, name, &main, fetched).await?;
        if let Some(reason) = stale {
            return Ok(Pass::Stale(reason));
        }
    }

    Ok(Pass::Converged(Some(main)))
}

/// Make `name` exist locally and track `origin/<name>`.
///
/// Returns `Some(reason)` instead of acting when `fetched` is false.
async fn ensure_tracking_branch<G: Vcs, U: Ui>(
    ctx: &Context<'_, G, U>,
    branches: &[BranchInfo],
    config: &GitConfigMap,
    name: &str,
    main: &str,
    fetched: bool,
) -> WorkflowResult<Option<String>> {
    if !branches.has_local(name) {
        if !fetched {
            return Ok(Some(format!("missing local branch '{}'", name)));
        }
        let start = if name == HOTFIX_BRANCH {
            root_commit(ctx, main).await?
        } else {
            format!("{}/{}", ORIGIN, main)
        };
        ctx.log(format!("Creating local branch '{}' from {}", name, start));
        ctx.git.create_branch(name, &start).await?;
    }

    if !branches.has_remote(ORIGIN, name) {
        if !fetched {
            return Ok(Some(format!("no '{}' on origin", name)));
        }
        ctx.log(format!("Pushing '{}' to {}", name, ORIGIN));
        ctx.git
            .push(&PushSpec::SetUpstream {
                remote: ORIGIN.to_string(),
                local: name.to_string(),
                remote_branch: name.to_string(),
            })
            .await?;
        return Ok(None);
    }

    let merge_ref = format!("refs/heads/{}", name);
    for (key, expected) in [("remote", ORIGIN), ("merge", merge_ref.as_str())] {
        match config.branch_value(name, key) {
            Some(value) if value == expected => {}
            Some(value) => {
                if !fetched {
                    return Ok(Some(format!("branch.{}.{} is '{}'", name, key, value)));
                }
                return Err(WorkflowError::user(format!(
                    "Invalid {} '{}' for local branch '{}'",
                    key, value, name
                )));
            }
            None => {
                if !fetched {
                    return Ok(Some(format!("branch.{}.{} is unset", name, key)));
                }
                let full_key = format!("branch.{}.{}", name, key);
                ctx.log(format!("Setting {}={}", full_key, expected));
                ctx.git.set_config(&full_key, expected).await?;
            }
        }
    }
    Ok(None)
}

/// The first local branch among the main-line candidates.
fn local_main(branches: &[BranchInfo]) -> Option<String> {
    MAIN_BRANCH_CANDIDATES
        .iter()
        .copied()
        .find(|name| branches.has_local(name))
        .map(str::to_string)
}

/// The main-line name to report when it is missing: whatever origin has,
/// else the preferred candidate.
fn expected_main(branches: &[BranchInfo]) -> &'static str {
    MAIN_BRANCH_CANDIDATES
        .iter()
        .copied()
        .find(|name| branches.has_local(name) || branches.has_remote(ORIGIN, name))
        .unwrap_or(MAIN_BRANCH_CANDIDATES[0])
}

/// The oldest parentless commit reachable from `rev`.
async fn root_commit<G: Vcs, U: Ui>(ctx: &Context<'_, G, U>, rev: &str) -> WorkflowResult<String> {
    let roots = ctx.git.root_commits(rev).await?;
    roots
        .last()
        .map(|sha| sha.as_str().to_string())
        .ok_or_else(|| WorkflowError::user(format!("'{}' has no root commit", rev)))
}
