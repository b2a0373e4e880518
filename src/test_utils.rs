//! Shared test fixtures and arbitrary generators for property-based testing.
//!
//! [`TestRepo`] builds a real repository layout in a temp dir:
//!
//! ```text
//! tmp/acme/widgets.git   bare "origin"
//! tmp/jdoe/widgets.git   bare fork (only after `add_fork`)
//! tmp/work               working clone, tracking origin/<main>
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use proptest::prelude::*;
use tempfile::TempDir;

use crate::context::Context;
use crate::error::WorkflowResult;
use crate::git::GitCli;
use crate::settings::Settings;
use crate::types::Sha;
use crate::ui::Ui;

pub fn arb_sha() -> impl Strategy<Value = Sha> {
    "[0-9a-f]{40}".prop_map(|s| Sha::parse(s).unwrap())
}

/// Run git synchronously, panicking with its stderr on failure.
pub fn run_git_sync(dir: &Path, args: &[&str]) -> String {
    match try_git_sync(dir, args) {
        Ok(out) => out,
        Err(err) => panic!("git {:?} failed in {}: {}", args, dir.display(), err),
    }
}

/// Run git synchronously, returning trimmed stdout or stderr.
pub fn try_git_sync(dir: &Path, args: &[&str]) -> Result<String, String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("LC_ALL", "C")
        .env("GIT_MERGE_AUTOEDIT", "no")
        .output()
        .expect("git is installed");
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(String::from_utf8_lossy(&output.stderr).trim().to_string())
    }
}

/// A working clone with a bare origin, see the module docs.
pub struct TestRepo {
    pub dir: TempDir,
    pub work: PathBuf,
    pub origin: PathBuf,
    pub main: String,
    pub git: GitCli,
    pub settings: Settings,
}

impl TestRepo {
    /// Repository whose main line is `main`.
    pub fn new() -> Self {
        Self::with_main("main")
    }

    pub fn with_main(main: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let origin = dir.path().join("acme").join("widgets.git");
        std::fs::create_dir_all(&origin).unwrap();
        run_git_sync(&origin, &["init", "--bare", "--quiet"]);
        run_git_sync(
            &origin,
            &["symbolic-ref", "HEAD", &format!("refs/heads/{}", main)],
        );

        let work = dir.path().join("work");
        std::fs::create_dir_all(&work).unwrap();
        run_git_sync(&work, &["init", "--quiet"]);
        configure_identity(&work);
        std::fs::write(work.join("README.md"), "# Widgets\n").unwrap();
        run_git_sync(&work, &["add", "."]);
        run_git_sync(&work, &["commit", "--quiet", "-m", "Initial commit"]);
        run_git_sync(&work, &["branch", "-M", main]);
        run_git_sync(
            &work,
            &["remote", "add", "origin", origin.to_str().unwrap()],
        );
        run_git_sync(&work, &["push", "--quiet", "-u", "origin", main]);

        let git = GitCli::new(&work);
        TestRepo {
            dir,
            work,
            origin,
            main: main.to_string(),
            git,
            settings: Settings::new("jdoe", "git wf test", false),
        }
    }

    /// Create the operator's fork as a bare copy of origin. Does not add a
    /// `fork` remote.
    pub fn add_fork(&self) -> PathBuf {
        let fork = self.dir.path().join("jdoe").join("widgets.git");
        std::fs::create_dir_all(fork.parent().unwrap()).unwrap();
        run_git_sync(
            self.dir.path(),
            &[
                "clone",
                "--quiet",
                "--bare",
                self.origin.to_str().unwrap(),
                fork.to_str().unwrap(),
            ],
        );
        fork
    }

    /// A second working clone of origin, for simulating other operators.
    pub fn clone_origin(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        run_git_sync(
            self.dir.path(),
            &[
                "clone",
                "--quiet",
                self.origin.to_str().unwrap(),
                path.to_str().unwrap(),
            ],
        );
        configure_identity(&path);
        path
    }

    pub fn ctx<'a>(&'a self, ui: &'a RecordingUi) -> Context<'a, GitCli, RecordingUi> {
        Context::new(&self.git, ui, &self.settings)
    }

    /// Run git in the working clone.
    pub fn run(&self, args: &[&str]) -> String {
        run_git_sync(&self.work, args)
    }

    /// Run git in the bare origin.
    pub fn run_origin(&self, args: &[&str]) -> String {
        run_git_sync(&self.origin, args)
    }

    /// Write `path` and commit it on the current branch; returns the new HEAD.
    pub fn commit_file(&self, path: &str, content: &str, message: &str) -> String {
        commit_file_in(&self.work, path, content, message)
    }

    pub fn current_branch(&self) -> String {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    pub fn head_of(&self, rev: &str) -> String {
        self.run(&["rev-parse", rev])
    }

    /// Value of a config key in the working clone.
    pub fn config(&self, key: &str) -> Option<String> {
        try_git_sync(&self.work, &["config", "--get", key]).ok()
    }

    pub fn has_local_branch(&self, name: &str) -> bool {
        try_git_sync(
            &self.work,
            &["rev-parse", "--verify", "--quiet", &format!("refs/heads/{}", name)],
        )
        .is_ok()
    }

    /// Whether origin has `refs/heads/<name>`.
    pub fn origin_has_branch(&self, name: &str) -> bool {
        try_git_sync(
            &self.origin,
            &["rev-parse", "--verify", "--quiet", &format!("refs/heads/{}", name)],
        )
        .is_ok()
    }

    pub fn origin_head_of(&self, name: &str) -> String {
        self.run_origin(&["rev-parse", &format!("refs/heads/{}", name)])
    }

    /// Create `release` and `hotfix` at main on both sides, tracking origin.
    pub fn add_cascade_branches(&self) {
        for branch in ["release", "hotfix"] {
            self.run(&["branch", "--no-track", branch, &self.main]);
            self.run(&["push", "--quiet", "-u", "origin", branch]);
        }
        self.run(&["config", "push.default", "upstream"]);
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

pub fn configure_identity(dir: &Path) {
    run_git_sync(dir, &["config", "user.email", "test@test.com"]);
    run_git_sync(dir, &["config", "user.name", "Test"]);
    run_git_sync(dir, &["config", "commit.gpgsign", "false"]);
}

pub fn commit_file_in(dir: &Path, path: &str, content: &str, message: &str) -> String {
    let full = dir.join(path);
    if let Some(parent) = full.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&full, content).unwrap();
    run_git_sync(dir, &["add", path]);
    run_git_sync(dir, &["commit", "--quiet", "-m", message]);
    run_git_sync(dir, &["rev-parse", "HEAD"])
}

/// A [`Ui`] that records everything and answers confirmations from a preset.
#[derive(Debug, Default)]
pub struct RecordingUi {
    answer: Option<bool>,
    lines: Mutex<Vec<String>>,
    questions: Mutex<Vec<String>>,
    opened: Mutex<Vec<String>>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every confirmation with `answer`.
    pub fn answering(answer: bool) -> Self {
        RecordingUi {
            answer: Some(answer),
            ..Self::default()
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    /// Whether any progress line contains `needle`.
    pub fn logged(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap().clear();
        self.questions.lock().unwrap().clear();
    }
}

impl Ui for RecordingUi {
    fn log(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }

    fn confirm(&self, question: &str, default: bool) -> WorkflowResult<bool> {
        self.questions.lock().unwrap().push(question.to_string());
        Ok(self.answer.unwrap_or(default))
    }

    fn open_url(&self, url: &str) -> WorkflowResult<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}
