//! The workflow's command vocabulary.

use std::fmt;

/// A top-level workflow command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Start,
    Done,
    Rename,
    Pr,
    Abort,
    Hotfix,
    Qa,
    CutRelease,
    MergeBack,
    Setup,
}

impl CommandKind {
    /// The name used on the command line (`git wf <name>`).
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Start => "start",
            CommandKind::Done => "done",
            CommandKind::Rename => "rename",
            CommandKind::Pr => "pr",
            CommandKind::Abort => "abort",
            CommandKind::Hotfix => "hotfix",
            CommandKind::Qa => "qa",
            CommandKind::CutRelease => "cut-release",
            CommandKind::MergeBack => "merge-back",
            CommandKind::Setup => "setup",
        }
    }

    /// Whether the command needs `hotfix`, `release` and main to be set up.
    ///
    /// Feature-branch commands only need `push.default`.
    pub fn needs_cascade_branches(&self) -> bool {
        !matches!(
            self,
            CommandKind::Done
                | CommandKind::Start
                | CommandKind::Rename
                | CommandKind::Pr
                | CommandKind::Abort
        )
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
