use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{announce_url, require_current_branch};
use crate::context::Context;
use crate::error::{WorkflowError, WorkflowResult};
use crate::git::GitError;
use crate::github::compare_url;
use crate::remote::remote_repo;
use crate::state::resolve_parent;
use crate::types::RemoteKind;
use crate::ui::Ui;
use crate::vcs::{LogEntry, PushSpec, Vcs};

static CONVENTIONAL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(feat|fix|docs|style|refactor|perf|test|chore):\s+")
        .expect("conventional prefix pattern is valid")
});

static NON_TITLE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(docs|test):\s").expect("non-title pattern is valid"));

/// Title and body of a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrDraft {
    pub title: String,
    pub body: String,
}

fn strip_conventional_prefix(subject: &str) -> String {
    CONVENTIONAL_PREFIX.replace(subject, "").into_owned()
}

/// The one subject that isn't docs or tests, if there is exactly one.
fn find_title<'a>(subjects: impl Iterator<Item = &'a str>) -> Option<String> {
    let eligible: Vec<&str> = subjects.filter(|s| !NON_TITLE_PREFIX.is_match(s)).collect();
    match eligible.as_slice() {
        [only] => Some(strip_conventional_prefix(only)),
        _ => None,
    }
}

/// Draft a pull request from the commits it contains (newest first).
///
/// A single commit supplies title and body. Several commits are listed
/// oldest-first in the body, and the title comes from the one substantive
/// commit or, failing that, from the branch name.
pub fn draft_pr(branch: &str, commits: &[LogEntry], command_line: &str) -> PrDraft {
    let (title, mut body) = match commits {
        [only] => (strip_conventional_prefix(&only.subject), only.body.clone()),
        _ => {
            let title = find_title(commits.iter().map(|c| c.subject.as_str()))
                .unwrap_or_else(|| branch.replace('-', " "));
            let body = commits
                .iter()
                .rev()
                .map(|c| format!("* {}", c.subject))
                .collect::<Vec<_>>()
                .join("\n");
            (title, body)
        }
    };
    body.push_str(&format!(
        "\n\n\n---\n_This PR was started by: {}_",
        command_line
    ));
    PrDraft { title, body }
}

/// Push the current feature branch and open a pull request form against
/// its parent.
///
/// Returns the compare URL, or `None` when there is nothing to propose.
pub async fn pr<G: Vcs, U: Ui>(ctx: &Context<'_, G, U>) -> WorkflowResult<Option<String>> {
    ctx.log("Ensuring all work is pushed to remote");
    match ctx.git.push(&PushSpec::Upstream).await {
        Ok(()) => {}
        Err(GitError::PushRejected { details }) => {
            debug!(%details, "push rejected");
            return Err(WorkflowError::user(
                "Your local repo is out-of-date so changes can't be pushed",
            ));
        }
        Err(e) => return Err(e.into()),
    }

    let current = require_current_branch(ctx.git).await?;
    let link = resolve_parent(ctx.git, &current).await?;
    let head_owner = match link.remote {
        RemoteKind::Fork => Some(remote_repo(ctx.git, RemoteKind::Fork).await?.owner),
        RemoteKind::Origin => None,
    };
    let remote_branch = link.remote_branch(&current, &ctx.settings.user);

    let range = format!("{}..HEAD", link.parent);
    let commits = ctx.git.log(&range).await?;
    if commits.is_empty() {
        ctx.log(format!("No commits to PR {}", range));
        return Ok(None);
    }

    let draft = draft_pr(&current, &commits, &ctx.settings.command_line);
    let origin = remote_repo(ctx.git, RemoteKind::Origin).await?;
    let url = compare_url(
        &origin,
        &link.parent,
        head_owner.as_deref(),
        &remote_branch,
        &draft.title,
        &draft.body,
    );
    announce_url(ctx, &url)?;
    Ok(Some(url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{StartArgs, start};
    use crate::test_utils::{RecordingUi, TestRepo, arb_sha};
    use proptest::prelude::*;

    fn entry(subject: &str, body: &str) -> LogEntry {
        LogEntry {
            sha: crate::types::Sha::parse("c".repeat(40)).unwrap(),
            subject: subject.to_string(),
            body: body.to_string(),
        }
    }

    const FOOTER: &str = "\n\n\n---\n_This PR was started by: git wf pr_";

    #[test]
    fn single_commit_supplies_title_and_body() {
        let draft = draft_pr(
            "kittens",
            &[entry("feat: add kittens", "They purr.")],
            "git wf pr",
        );
        assert_eq!(draft.title, "add kittens");
        assert_eq!(draft.body, format!("They purr.{}", FOOTER));
    }

    #[test]
    fn several_commits_are_listed_oldest_first() {
        let commits = [
            entry("test: cover kittens", ""),
            entry("fix: feed kittens", ""),
            entry("docs: document kittens", ""),
        ];
        let draft = draft_pr("more-kittens", &commits, "git wf pr");
        assert_eq!(draft.title, "feed kittens");
        assert_eq!(
            draft.body,
            format!(
                "* docs: document kittens\n* fix: feed kittens\n* test: cover kittens{}",
                FOOTER
            )
        );
    }

    #[test]
    fn ambiguous_title_falls_back_to_branch_name() {
        let commits = [entry("feat: one", ""), entry("feat: two", "")];
        let draft = draft_pr("more-kittens", &commits, "git wf pr");
        assert_eq!(draft.title, "more kittens");
    }

    proptest! {
        #[test]
        fn footer_is_always_present(
            subjects in prop::collection::vec("[a-z ]{1,20}", 1..5),
            sha in arb_sha(),
        ) {
            let commits: Vec<LogEntry> = subjects
                .iter()
                .map(|s| LogEntry { sha: sha.clone(), subject: s.clone(), body: String::new() })
                .collect();
            let draft = draft_pr("b", &commits, "git wf pr");
            prop_assert!(draft.body.ends_with(FOOTER));
        }
    }

    #[tokio::test]
    async fn pr_pushes_and_builds_compare_url() {
        let repo = TestRepo::new();
        repo.run(&["config", "push.default", "upstream"]);
        let ui = RecordingUi::new();
        start(&repo.ctx(&ui), &StartArgs::new("kittens"))
            .await
            .unwrap();
        let tip = repo.commit_file("k.txt", "meow\n", "feat: add kittens");

        let url = pr(&repo.ctx(&ui)).await.unwrap().unwrap();

        assert_eq!(repo.origin_head_of("jdoe/feature/main/kittens"), tip);
        assert!(url.starts_with(
            "https://github.com/acme/widgets/compare/main...jdoe/feature/main/kittens?expand=1&title=add%20kittens&body="
        ));
        assert!(ui.logged(&format!("Opening {}", url)));
        assert!(ui.opened().is_empty());
    }

    #[tokio::test]
    async fn pr_from_fork_names_fork_owner() {
        let repo = TestRepo::new();
        repo.add_fork();
        repo.run(&["config", "push.default", "upstream"]);
        let ui = RecordingUi::new();
        let args = StartArgs {
            fork: true,
            ..StartArgs::new("kittens")
        };
        start(&repo.ctx(&ui), &args).await.unwrap();
        repo.commit_file("k.txt", "meow\n", "Add kittens");

        let url = pr(&repo.ctx(&ui)).await.unwrap().unwrap();

        assert!(url.contains("/compare/main...jdoe:feature/main/kittens?"));
    }

    #[tokio::test]
    async fn nothing_to_pr() {
        let repo = TestRepo::new();
        repo.run(&["config", "push.default", "upstream"]);
        let ui = RecordingUi::new();
        start(&repo.ctx(&ui), &StartArgs::new("kittens"))
            .await
            .unwrap();

        assert_eq!(pr(&repo.ctx(&ui)).await.unwrap(), None);
        assert!(ui.logged("No commits to PR main..HEAD"));
    }

    #[tokio::test]
    async fn stale_branch_is_reported() {
        let repo = TestRepo::new();
        repo.run(&["config", "push.default", "upstream"]);
        let ui = RecordingUi::new();
        start(&repo.ctx(&ui), &StartArgs::new("kittens"))
            .await
            .unwrap();
        // someone else pushes to the same remote branch
        let other = repo.clone_origin("colleague");
        crate::test_utils::run_git_sync(
            &other,
            &["checkout", "--quiet", "jdoe/feature/main/kittens"],
        );
        crate::test_utils::commit_file_in(&other, "other.txt", "x\n", "Their change");
        crate::test_utils::run_git_sync(&other, &["push", "--quiet"]);
        repo.commit_file("k.txt", "meow\n", "Add kittens");

        let err = pr(&repo.ctx(&ui)).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Your local repo is out-of-date so changes can't be pushed"
        );
    }
}
