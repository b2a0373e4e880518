//! Core domain types for the workflow.
//!
//! The branch-role constants live here so the preflight, cascade and command
//! layers agree on the fixed names of the long-lived branches.

pub mod command;
pub mod ids;

pub use command::CommandKind;
pub use ids::{InvalidSha, RemoteKind, Sha};

/// Long-lived branch that receives build tags for production fixes.
pub const HOTFIX_BRANCH: &str = "hotfix";

/// Long-lived branch that release candidates are cut onto.
pub const RELEASE_BRANCH: &str = "release";

/// Accepted names for the main line, in order of preference.
pub const MAIN_BRANCH_CANDIDATES: [&str; 2] = ["main", "master"];
