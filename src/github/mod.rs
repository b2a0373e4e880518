//! GitHub addressing.
//!
//! The workflow never calls the GitHub API. It only needs to know which
//! repository a remote points at so it can derive fork remotes and build
//! browser URLs for pull requests and fork creation.

mod remote;
mod web;

pub use remote::{GitHubRepo, fork_remote_url, parse_remote_url};
pub use web::{compare_url, fork_creation_url};
