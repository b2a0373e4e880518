//! Per-invocation context handed to every workflow operation.

use crate::settings::Settings;
use crate::ui::Ui;
use crate::vcs::Vcs;

/// The repository, the operator and the settings for one invocation.
pub struct Context<'a, G, U> {
    pub git: &'a G,
    pub ui: &'a U,
    pub settings: &'a Settings,
}

impl<'a, G: Vcs, U: Ui> Context<'a, G, U> {
    pub fn new(git: &'a G, ui: &'a U, settings: &'a Settings) -> Self {
        Context { git, ui, settings }
    }

    /// Shorthand for a progress line.
    pub fn log(&self, message: impl AsRef<str>) {
        self.ui.log(message.as_ref());
    }
}
