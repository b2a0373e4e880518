//! Recognising a feature branch that was squash-merged into its parent.
//!
//! A squash merge leaves no ancestry link, so the feature's net diff is
//! compared against each commit that landed on the parent since the fork
//! point. Diffs are normalised before comparison: blob `index` lines always
//! differ, and hunk headers shift when the parent gained unrelated lines
//! above the change.

use tracing::debug;

use crate::error::WorkflowResult;
use crate::vcs::{LogEntry, Vcs};

/// Drop `index <blob>..<blob>` lines.
pub fn strip_index_lines(diff: &str) -> String {
    drop_lines(diff, "index ")
}

/// Drop `@@ -a,b +c,d @@` hunk headers.
pub fn strip_hunk_headers(diff: &str) -> String {
    drop_lines(diff, "@@ ")
}

/// The patch part of `git show` output, without the commit header and
/// message. Output without a patch is returned unchanged.
pub fn strip_commit_header(show: &str) -> &str {
    match show.find("\ndiff") {
        Some(at) => &show[at + 1..],
        None => show,
    }
}

fn drop_lines(text: &str, prefix: &str) -> String {
    text.split_inclusive('\n')
        .filter(|line| !line.starts_with(prefix))
        .collect()
}

/// `[abc1234] subject`.
fn describe(entry: &LogEntry) -> String {
    format!("[{}] {}", entry.sha.short(), entry.subject)
}

/// Find the commit on `parent` that carries exactly `feature`'s changes.
///
/// Returns a short description of the commit, or `None`.
pub async fn find_squashed_diff<G: Vcs>(
    git: &G,
    feature: &str,
    parent: &str,
) -> WorkflowResult<Option<String>> {
    let base = git.merge_base(parent, feature).await?;
    let target = strip_index_lines(&git.diff(&format!("{}..{}", base, feature)).await?);
    let candidates = git.log(&format!("{}..{}", base, parent)).await?;

    let mut patches = Vec::with_capacity(candidates.len());
    for entry in &candidates {
        let show = git.show(entry.sha.as_str()).await?;
        let patch = strip_index_lines(strip_commit_header(&show));
        if patch == target {
            debug!(sha = %entry.sha, "exact squash match");
            return Ok(Some(describe(entry)));
        }
        patches.push(patch);
    }

    debug!(
        candidates = candidates.len(),
        "no exact squash match; comparing without hunk headers"
    );
    let loose_target = strip_hunk_headers(&target);
    for (entry, patch) in candidates.iter().zip(&patches) {
        if strip_hunk_headers(patch) == loose_target {
            debug!(sha = %entry.sha, "squash match after ignoring line numbers");
            return Ok(Some(describe(entry)));
        }
    }

    debug!(%feature, %parent, "no squash match");
    Ok(None)
}
