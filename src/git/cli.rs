//! [`Vcs`] implementation backed by the `git` executable.

use std::path::PathBuf;

use tracing::debug;

use super::merge::{MergeResult, classify_merge};
use super::push::{PushSpec, classify_push_failure};
use super::{
    GitConfigMap, GitError, GitResult, command_failed, run_git, run_git_raw, run_git_stdout,
    run_git_unchecked,
};
use crate::types::Sha;
use crate::vcs::{BranchInfo, BranchKind, CommitOutcome, LogEntry, RemoteInfo, Vcs};

// Field and record separators for `git log --format`.
const FIELD_SEP: char = '\u{1f}';
const RECORD_SEP: char = '\u{1e}';

/// A working tree driven through the `git` command line.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        GitCli {
            workdir: workdir.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> GitResult<()> {
        run_git(&self.workdir, args).await?;
        Ok(())
    }

    /// The commit at the top of the stash stack, if any.
    async fn stash_top(&self) -> GitResult<Option<String>> {
        let output =
            run_git_unchecked(&self.workdir, &["rev-parse", "--quiet", "--verify", "refs/stash"])
                .await?;
        let top = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((output.status.success() && !top.is_empty()).then_some(top))
    }

    async fn stdout(&self, args: &[&str]) -> GitResult<String> {
        run_git_stdout(&self.workdir, args).await
    }
}

/// Parse `for-each-ref` output produced with [`BRANCH_FORMAT`].
fn parse_branches(raw: &str) -> GitResult<Vec<BranchInfo>> {
    let mut branches = Vec::new();
    for line in raw.lines().filter(|l| !l.is_empty()) {
        let mut fields = line.split('\0');
        let (Some(refname), Some(object), upstream) = (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };
        let head = Sha::parse(object)?;
        let upstream = upstream.filter(|u| !u.is_empty()).map(str::to_string);

        if let Some(name) = refname.strip_prefix("refs/heads/") {
            branches.push(BranchInfo {
                name: name.to_string(),
                kind: BranchKind::Local,
                upstream,
                head,
            });
        } else if let Some(short) = refname.strip_prefix("refs/remotes/") {
            let Some((remote, branch)) = short.split_once('/') else {
                continue;
            };
            // Symbolic `origin/HEAD` is not a branch.
            if branch == "HEAD" {
                continue;
            }
            branches.push(BranchInfo {
                name: short.to_string(),
                kind: BranchKind::RemoteTracking {
                    remote: remote.to_string(),
                },
                upstream: None,
                head,
            });
        }
    }
    Ok(branches)
}

const BRANCH_FORMAT: &str = "--format=%(refname)%00%(objectname)%00%(upstream:short)";

/// Parse `git remote -v` into one entry per remote (fetch URLs only).
fn parse_remotes(raw: &str) -> Vec<RemoteInfo> {
    raw.lines()
        .filter_map(|line| {
            let (name, rest) = line.split_once('\t')?;
            let url = rest.strip_suffix(" (fetch)")?;
            Some(RemoteInfo {
                name: name.to_string(),
                fetch_url: url.to_string(),
            })
        })
        .collect()
}

fn parse_log(raw: &str) -> GitResult<Vec<LogEntry>> {
    raw.split(RECORD_SEP)
        .map(|record| record.trim_start_matches('\n'))
        .filter(|record| !record.trim().is_empty())
        .map(|record| -> GitResult<LogEntry> {
            let mut fields = record.splitn(3, FIELD_SEP);
            let sha = Sha::parse(fields.next().unwrap_or_default())?;
            let subject = fields.next().unwrap_or_default().to_string();
            let body = fields.next().unwrap_or_default().trim().to_string();
            Ok(LogEntry { sha, subject, body })
        })
        .collect()
}

/// Paths from `git status --porcelain` (v1: two status columns, a space, the path).
fn parse_status(raw: &str) -> Vec<String> {
    raw.lines()
        .filter_map(|line| line.get(3..))
        .map(str::to_string)
        .collect()
}

impl Vcs for GitCli {
    async fn current_branch(&self) -> GitResult<Option<String>> {
        let args = ["symbolic-ref", "--quiet", "--short", "HEAD"];
        let output = run_git_unchecked(&self.workdir, &args).await?;
        // Exit 0 = on a branch, exit 1 = detached, other = error
        match output.status.code() {
            Some(0) => Ok(Some(
                String::from_utf8_lossy(&output.stdout).trim().to_string(),
            )),
            Some(1) => Ok(None),
            _ => Err(command_failed(&args, &output)),
        }
    }

    async fn branches(&self) -> GitResult<Vec<BranchInfo>> {
        let raw = run_git_raw(
            &self.workdir,
            &["for-each-ref", BRANCH_FORMAT, "refs/heads", "refs/remotes"],
        )
        .await?;
        parse_branches(&raw)
    }

    async fn config(&self) -> GitResult<GitConfigMap> {
        let raw = run_git_raw(&self.workdir, &["config", "--list", "--null"]).await?;
        Ok(GitConfigMap::parse(&raw))
    }

    async fn set_config(&self, key: &str, value: &str) -> GitResult<()> {
        self.run(&["config", "--local", key, value]).await
    }

    async fn checkout(&self, target: &str) -> GitResult<()> {
        self.run(&["checkout", "--quiet", target]).await
    }

    async fn checkout_new_branch(&self, name: &str) -> GitResult<()> {
        self.run(&["checkout", "--quiet", "-b", name]).await
    }

    async fn create_branch(&self, name: &str, start: &str) -> GitResult<()> {
        self.run(&["branch", "--no-track", name, start]).await
    }

    async fn delete_branch(&self, name: &str) -> GitResult<()> {
        self.run(&["branch", "-D", name]).await
    }

    async fn set_upstream(&self, upstream: &str) -> GitResult<()> {
        let arg = format!("--set-upstream-to={}", upstream);
        self.run(&["branch", &arg]).await
    }

    async fn add_all(&self) -> GitResult<()> {
        self.run(&["add", "--all"]).await
    }

    async fn commit(&self, message: &str) -> GitResult<CommitOutcome> {
        let args = ["commit", "-m", message];
        let output = run_git_unchecked(&self.workdir, &args).await?;
        if output.status.success() {
            return Ok(CommitOutcome::Committed);
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.contains("nothing to commit") || stdout.contains("no changes added to commit") {
            return Ok(CommitOutcome::NothingToCommit);
        }
        Err(command_failed(&args, &output))
    }

    async fn pull(&self) -> GitResult<()> {
        self.run(&["pull", "--quiet", "--no-rebase"]).await
    }

    async fn push(&self, spec: &PushSpec) -> GitResult<()> {
        let owned = spec.args();
        let args: Vec<&str> = owned.iter().map(String::as_str).collect();
        let output = run_git_unchecked(&self.workdir, &args).await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(classify_push_failure(&args, &output))
        }
    }

    async fn merge(&self, target: &str) -> GitResult<MergeResult> {
        let args = ["merge", "--no-ff", "--no-commit", target];
        let output = run_git_unchecked(&self.workdir, &args).await?;
        match classify_merge(&output) {
            Some(result) => {
                debug!(target, conflict = result.is_conflict(), "merge finished");
                Ok(result)
            }
            None => Err(command_failed(&args, &output)),
        }
    }

    async fn merge_ff_only(&self, target: &str) -> GitResult<()> {
        self.run(&["merge", "--ff-only", target]).await
    }

    async fn reset_hard(&self) -> GitResult<()> {
        self.run(&["reset", "--quiet", "--hard"]).await
    }

    async fn stash(&self) -> GitResult<bool> {
        let before = self.stash_top().await?;
        self.run(&["stash", "push", "--quiet", "--include-untracked"])
            .await?;
        Ok(self.stash_top().await? != before)
    }

    async fn stash_pop(&self) -> GitResult<()> {
        self.run(&["stash", "pop", "--quiet"]).await
    }

    async fn changed_files(&self) -> GitResult<Vec<String>> {
        let raw = run_git_raw(&self.workdir, &["status", "--porcelain"]).await?;
        Ok(parse_status(&raw))
    }

    async fn remotes(&self) -> GitResult<Vec<RemoteInfo>> {
        let raw = self.stdout(&["remote", "-v"]).await?;
        Ok(parse_remotes(&raw))
    }

    async fn add_remote(&self, name: &str, url: &str) -> GitResult<()> {
        self.run(&["remote", "add", name, url]).await
    }

    async fn remove_remote(&self, name: &str) -> GitResult<()> {
        self.run(&["remote", "remove", name]).await
    }

    async fn fetch(&self, remote: &str) -> GitResult<()> {
        self.run(&["fetch", "--quiet", remote]).await
    }

    async fn fetch_tags(&self) -> GitResult<()> {
        self.run(&["fetch", "--quiet", "--tags"]).await
    }

    async fn prune_remote(&self, remote: &str) -> GitResult<()> {
        self.run(&["remote", "prune", remote]).await
    }

    async fn diff(&self, range: &str) -> GitResult<String> {
        run_git_raw(
            &self.workdir,
            &["diff", "--no-color", "--no-ext-diff", range],
        )
        .await
    }

    async fn show(&self, rev: &str) -> GitResult<String> {
        run_git_raw(
            &self.workdir,
            &["show", "--no-color", "--no-ext-diff", rev],
        )
        .await
    }

    async fn log(&self, range: &str) -> GitResult<Vec<LogEntry>> {
        let format = format!("--format=%H{0}%s{0}%b{1}", FIELD_SEP, RECORD_SEP);
        let raw = run_git_raw(&self.workdir, &["log", &format, range, "--"]).await?;
        parse_log(&raw)
    }

    async fn count_commits(&self, range: &str) -> GitResult<usize> {
        let raw = self.stdout(&["rev-list", "--count", range, "--"]).await?;
        raw.parse().map_err(|_| GitError::CommandFailed {
            command: format!("git rev-list --count {}", range),
            stderr: format!("unexpected output: {:?}", raw),
        })
    }

    async fn tag(&self, name: &str) -> GitResult<()> {
        self.run(&["tag", name]).await
    }

    async fn rev_parse(&self, rev: &str) -> GitResult<Sha> {
        let out = self.stdout(&["rev-parse", "--verify", rev]).await?;
        Ok(Sha::parse(&out)?)
    }

    async fn merge_base(&self, a: &str, b: &str) -> GitResult<Sha> {
        let out = self.stdout(&["merge-base", a, b]).await?;
        Ok(Sha::parse(&out)?)
    }

    async fn root_commits(&self, rev: &str) -> GitResult<Vec<Sha>> {
        let out = self.stdout(&["rev-list", "--max-parents=0", rev, "--"]).await?;
        out.lines()
            .map(|l| Sha::parse(l).map_err(GitError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_branches_local_and_remote() {
        let a = "a".repeat(40);
        let b = "b".repeat(40);
        let raw = format!(
            "refs/heads/main\0{a}\0origin/main\n\
             refs/heads/kittens\0{b}\0\n\
             refs/remotes/origin/HEAD\0{a}\0\n\
             refs/remotes/origin/main\0{a}\0\n"
        );
        let branches = parse_branches(&raw).unwrap();
        assert_eq!(branches.len(), 3);
        assert_eq!(branches[0].name, "main");
        assert_eq!(branches[0].upstream.as_deref(), Some("origin/main"));
        assert!(branches[1].is_local());
        assert_eq!(branches[1].upstream, None);
        assert_eq!(branches[2].name, "origin/main");
        assert_eq!(
            branches[2].kind,
            BranchKind::RemoteTracking {
                remote: "origin".to_string()
            }
        );
    }

    #[test]
    fn parse_remotes_keeps_fetch_urls() {
        let raw = "fork\tgit@github.com:jdoe/widgets.git (fetch)\n\
                   fork\tgit@github.com:jdoe/widgets.git (push)\n\
                   origin\t/tmp/acme/widgets.git (fetch)\n\
                   origin\t/tmp/acme/widgets.git (push)";
        let remotes = parse_remotes(raw);
        assert_eq!(
            remotes,
            vec![
                RemoteInfo {
                    name: "fork".into(),
                    fetch_url: "git@github.com:jdoe/widgets.git".into()
                },
                RemoteInfo {
                    name: "origin".into(),
                    fetch_url: "/tmp/acme/widgets.git".into()
                },
            ]
        );
    }

    #[test]
    fn parse_log_records() {
        let a = "a".repeat(40);
        let b = "b".repeat(40);
        let raw = format!(
            "{a}\u{1f}feat: add thing\u{1f}Longer\nbody\n\u{1e}\n{b}\u{1f}fix: oops\u{1f}\u{1e}\n"
        );
        let entries = parse_log(&raw).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].subject, "feat: add thing");
        assert_eq!(entries[0].body, "Longer\nbody");
        assert_eq!(entries[1].sha.as_str(), b);
        assert_eq!(entries[1].body, "");
    }

    #[test]
    fn parse_status_paths() {
        let raw = " M README\n?? new file.txt\n";
        assert_eq!(parse_status(raw), vec!["README", "new file.txt"]);
    }

    #[tokio::test]
    async fn stash_reports_whether_an_entry_was_pushed() {
        let repo = crate::test_utils::TestRepo::new();
        assert!(!repo.git.stash().await.unwrap());

        std::fs::write(repo.work.join("untracked.txt"), "x\n").unwrap();
        assert!(repo.git.stash().await.unwrap());
        assert!(!repo.work.join("untracked.txt").exists());

        repo.git.stash_pop().await.unwrap();
        assert!(repo.work.join("untracked.txt").exists());
    }
}
