//! Runtime settings.
//!
//! Everything here comes from the environment or the command line; the
//! workflow keeps no configuration files of its own.

use crate::error::{WorkflowError, WorkflowResult};

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// GitHub user name; prefixes origin feature branches and names forks.
    pub user: String,

    /// The invoking command line, recorded in automated commit messages.
    pub command_line: String,

    /// Whether URLs are opened in a browser (otherwise only printed).
    pub open_urls: bool,
}

impl Settings {
    pub fn new(user: impl Into<String>, command_line: impl Into<String>, open_urls: bool) -> Self {
        Settings {
            user: user.into(),
            command_line: command_line.into(),
            open_urls,
        }
    }

    /// Build settings from `GH_USER` (falling back to `USER`) and the
    /// process arguments.
    pub fn from_env(open_urls: bool) -> WorkflowResult<Self> {
        let user = user_from(std::env::var("GH_USER").ok(), std::env::var("USER").ok())
            .ok_or_else(|| {
                WorkflowError::user("Set GH_USER (or USER) to your GitHub user name")
            })?;
        Ok(Settings::new(
            user,
            command_line_from(std::env::args()),
            open_urls,
        ))
    }
}

fn user_from(gh_user: Option<String>, user: Option<String>) -> Option<String> {
    gh_user
        .filter(|u| !u.is_empty())
        .or(user.filter(|u| !u.is_empty()))
}

/// Render process arguments as the command the operator typed.
///
/// The binary is installed as `git-wf` and usually invoked as `git wf`, so a
/// leading `git-` is shown as `git `.
pub fn command_line_from(args: impl IntoIterator<Item = String>) -> String {
    let mut args = args.into_iter();
    let program = args.next().unwrap_or_else(|| "git-wf".to_string());
    let program = program
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("git-wf")
        .to_string();
    let line = std::iter::once(program)
        .chain(args)
        .collect::<Vec<_>>()
        .join(" ");
    match line.strip_prefix("git-") {
        Some(rest) => format!("git {}", rest),
        None => line,
    }
}
