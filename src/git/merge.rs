//! Merge output classification.
//!
//! `git merge` reports conflicts in two ways: a non-zero exit with
//! `Automatic merge failed`, or (for some strategies and older versions) a
//! zero exit whose output still contains `CONFLICT (...)` lines. Both are
//! conflicts. Keeping this detection here means nothing else in the crate
//! looks at merge output text.

use std::process::Output;

use super::combined_output;

/// Result of a merge operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeResult {
    /// The merge applied without conflicts.
    Clean {
        /// Combined stdout/stderr of the merge command.
        output: String,
    },

    /// The merge left conflicts in the working tree.
    Conflicted {
        /// Combined stdout/stderr of the merge command.
        output: String,
    },
}

impl MergeResult {
    /// Returns true if the merge completed without conflict.
    pub fn is_clean(&self) -> bool {
        matches!(self, MergeResult::Clean { .. })
    }

    /// Returns true if the merge resulted in a conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, MergeResult::Conflicted { .. })
    }

    pub fn output(&self) -> &str {
        match self {
            MergeResult::Clean { output } | MergeResult::Conflicted { output } => output,
        }
    }
}

/// True if any output line is a git `CONFLICT` report.
pub fn has_conflict_marker(output: &str) -> bool {
    output.lines().any(|line| line.starts_with("CONFLICT "))
}

/// Classify a finished merge command.
///
/// Returns `None` when the merge failed for a reason other than a conflict
/// (unknown revision, dirty tree, ...); the caller turns that into an error.
pub fn classify_merge(output: &Output) -> Option<MergeResult> {
    let text = combined_output(output);

    if has_conflict_marker(&text) || text.contains("Automatic merge failed") {
        return Some(MergeResult::Conflicted { output: text });
    }

    if output.status.success() {
        Some(MergeResult::Clean { output: text })
    } else {
        None
    }
}
