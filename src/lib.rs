//! git-wf - a feature-branch and hotfix/release/main cascade workflow on top of git.
//!
//! This library provides the branch topology, setup checks, merge-back
//! cascade and workflow commands behind the `git-wf` binary.

pub mod cascade;
pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod git;
pub mod github;
pub mod preflight;
pub mod remote;
pub mod settings;
pub mod squash;
pub mod state;
pub mod types;
pub mod ui;
pub mod vcs;

#[cfg(test)]
pub mod test_utils;
