//! Repository setup checks run before every command.
//!
//! The workflow relies on a few pieces of repository state:
//!
//! 1. `push.default=upstream`, so a bare `git push` goes to the tracked ref
//!    (feature branches track a differently-named remote branch).
//! 2. A main line (`main`, else `master`) tracking `origin`.
//! 3. Local `release` and `hotfix` branches tracking the same-named branches
//!    on `origin`, created (and pushed) if missing.
//!
//! Feature-branch commands only need (1). Anything missing is first taken
//! as a sign of stale remote-tracking refs: origin is fetched once and the
//! checks re-run, this time repairing what they can.

mod setup;

pub use setup::{MAX_SETUP_PASSES, verify_setup};
