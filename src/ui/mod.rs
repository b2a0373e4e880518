//! Operator interaction: progress lines, confirmations, opening URLs.
//!
//! Progress lines are the workflow's user-facing output and are distinct
//! from `tracing` diagnostics, which stay quiet unless `RUST_LOG` asks.

use std::io::{BufRead, IsTerminal, Write};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::error::WorkflowResult;

/// Prefix on every progress line.
pub const LOG_PREFIX: &str = "🚢  ";

/// Prefix on the final error line.
pub const ERROR_PREFIX: &str = "🚢💥 ";

pub trait Ui: Sync {
    /// Print one progress line.
    fn log(&self, message: &str);

    /// Ask a yes/no question.
    ///
    /// Returns `default` when no answer can be obtained (no terminal).
    fn confirm(&self, question: &str, default: bool) -> WorkflowResult<bool>;

    /// Open `url` in a browser.
    fn open_url(&self, url: &str) -> WorkflowResult<()>;
}

/// Terminal implementation.
#[derive(Debug, Default, Clone)]
pub struct ConsoleUi {
    /// Answer every confirmation with this (`--yes` / `--no`).
    forced_answer: Option<bool>,
}

impl ConsoleUi {
    pub fn new(forced_answer: Option<bool>) -> Self {
        ConsoleUi { forced_answer }
    }
}

impl Ui for ConsoleUi {
    fn log(&self, message: &str) {
        println!("{}{}", LOG_PREFIX, message);
    }

    fn confirm(&self, question: &str, default: bool) -> WorkflowResult<bool> {
        if let Some(answer) = self.forced_answer {
            debug!(question, answer, "confirmation answered from flags");
            return Ok(answer);
        }
        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            debug!(question, default, "no terminal; using default answer");
            return Ok(default);
        }

        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let mut stdout = std::io::stdout();
        write!(stdout, "{}{} {} ", LOG_PREFIX, question, hint)?;
        stdout.flush()?;

        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        Ok(parse_answer(&line, default))
    }

    fn open_url(&self, url: &str) -> WorkflowResult<()> {
        let opener = if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(target_os = "windows") {
            "explorer"
        } else {
            "xdg-open"
        };
        debug!(opener, url, "opening url");
        let spawned = Command::new(opener)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        if let Err(e) = spawned {
            warn!(opener, error = %e, "could not launch browser");
            self.log(url);
        }
        Ok(())
    }
}

/// Interpret a typed answer; anything not starting with y/n keeps `default`.
pub fn parse_answer(line: &str, default: bool) -> bool {
    match line.trim().chars().next() {
        Some('y' | 'Y') => true,
        Some('n' | 'N') => false,
        _ => default,
    }
}

/// `"1 commit"`, `"3 commits"`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
