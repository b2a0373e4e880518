//! Push operations.
//!
//! The workflow pushes in five shapes: the current branch to its upstream,
//! a new branch with upstream tracking, a ref-to-ref copy (rename), a tag,
//! and a remote branch deletion. [`PushSpec`] names them so callers never
//! assemble refspecs by hand.

use std::process::Output;

use super::{GitError, combined_output, command_failed};

/// What to push, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushSpec {
    /// `git push`: the current branch to its configured upstream.
    Upstream,

    /// `git push --set-upstream <remote> <local>:<remote_branch>`.
    SetUpstream {
        remote: String,
        local: String,
        remote_branch: String,
    },

    /// `git push <remote> <refspec>` for an arbitrary `src:dst` refspec.
    Refspec { remote: String, refspec: String },

    /// `git push <remote> tag <tag>`.
    Tag { remote: String, tag: String },

    /// `git push <remote> :<branch>`: delete the remote branch.
    Delete { remote: String, branch: String },
}

impl PushSpec {
    /// The argument vector passed to `git`.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["push".to_string()];
        match self {
            PushSpec::Upstream => {}
            PushSpec::SetUpstream {
                remote,
                local,
                remote_branch,
            } => {
                args.push("--set-upstream".to_string());
                args.push(remote.clone());
                args.push(format!("{}:{}", local, remote_branch));
            }
            PushSpec::Refspec { remote, refspec } => {
                args.push(remote.clone());
                args.push(refspec.clone());
            }
            PushSpec::Tag { remote, tag } => {
                args.push(remote.clone());
                args.push("tag".to_string());
                args.push(tag.clone());
            }
            PushSpec::Delete { remote, branch } => {
                args.push(remote.clone());
                args.push(format!(":{}", branch));
            }
        }
        args
    }
}

/// Turn a failed push into the most specific error.
///
/// Rejections (non-fast-forward, "remote contains work") are reported as
/// [`GitError::PushRejected`] so commands can give actionable advice.
pub fn classify_push_failure(args: &[&str], output: &Output) -> GitError {
    let text = combined_output(output);
    if text.contains("[rejected]")
        || text.contains("non-fast-forward")
        || text.contains("Updates were rejected")
    {
        return GitError::PushRejected { details: text };
    }
    command_failed(args, output)
}
