//! Command-line interface: argument parsing and dispatch.

use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::cascade::merge_back;
use crate::commands::{self, QaArgs, StartArgs};
use crate::context::Context;
use crate::error::{WorkflowError, WorkflowResult};
use crate::preflight::verify_setup;
use crate::types::CommandKind;
use crate::ui::Ui;
use crate::vcs::Vcs;

#[derive(Parser, Debug)]
#[command(
    name = "git-wf",
    about = "Feature branches and hotfix → release → main merge-backs",
    version
)]
pub struct Cli {
    /// Print URLs instead of opening them in a browser
    #[arg(long = "no-open", global = true)]
    pub no_open: bool,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long, global = true, conflicts_with = "no")]
    pub yes: bool,

    /// Answer no to every confirmation
    #[arg(short = 'n', long, global = true)]
    pub no: bool,

    #[command(subcommand)]
    pub command: WfCommand,
}

impl Cli {
    /// The answer forced by `--yes`/`--no`, if any.
    pub fn forced_answer(&self) -> Option<bool> {
        match (self.yes, self.no) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum WfCommand {
    #[command(about = "Create new feature branch from current branch")]
    Start(StartCliArgs),
    #[command(about = "Cleanup current merged, PRed feature branch")]
    Done,
    #[command(about = "Close a feature branch without it being merged [CAREFUL]")]
    Abort,
    #[command(about = "Rename local and remote current feature branch")]
    Rename { new_branch: String },
    #[command(about = "Open a PR to merge current feature branch")]
    Pr,
    #[command(about = "Move branch hotfix to given build tag")]
    Hotfix { build_tag: String },
    #[command(about = "Tag given (or current) branch as a build")]
    Qa {
        branch: Option<String>,
        /// Don't require a merge-back for qa of 'release' branch
        #[arg(short = 'M', long = "no-merge-back")]
        no_merge_back: bool,
    },
    #[command(about = "Move branch (default: main) commits onto release branch")]
    CutRelease { branch: Option<String> },
    #[command(about = "Merge all changes back from main ← release ← hotfix")]
    MergeBack,
    #[command(about = "Check and repair repository setup")]
    Setup,
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct StartCliArgs {
    pub branch: String,
    /// Create the branch on a fork
    #[arg(short, long)]
    pub fork: bool,
    /// Stash working tree changes & move to new feature
    #[arg(short, long)]
    pub stash: bool,
    /// While still using current branch as starting point, make the parent
    /// (for PRs) something else
    #[arg(short, long = "pr-base", value_name = "P")]
    pub pr_base: Option<String>,
}

impl WfCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            WfCommand::Start(_) => CommandKind::Start,
            WfCommand::Done => CommandKind::Done,
            WfCommand::Abort => CommandKind::Abort,
            WfCommand::Rename { .. } => CommandKind::Rename,
            WfCommand::Pr => CommandKind::Pr,
            WfCommand::Hotfix { .. } => CommandKind::Hotfix,
            WfCommand::Qa { .. } => CommandKind::Qa,
            WfCommand::CutRelease { .. } => CommandKind::CutRelease,
            WfCommand::MergeBack => CommandKind::MergeBack,
            WfCommand::Setup => CommandKind::Setup,
        }
    }
}

/// Verify setup, then run `command`.
pub async fn run<G: Vcs, U: Ui>(ctx: &Context<'_, G, U>, command: WfCommand) -> WorkflowResult<()> {
    let kind = command.kind();
    let main = verify_setup(ctx, kind).await?;
    debug!(%kind, ?main, "dispatching");
    let require_main = || {
        main.clone().ok_or_else(|| {
            WorkflowError::user(format!("'git wf {}' needs a main branch", kind))
        })
    };

    match command {
        WfCommand::Start(args) => {
            let args = StartArgs {
                branch: args.branch,
                fork: args.fork,
                stash: args.stash,
                pr_base: args.pr_base,
            };
            commands::start(ctx, &args).await
        }
        WfCommand::Done => commands::done(ctx).await,
        WfCommand::Abort => commands::abort(ctx).await.map(|_| ()),
        WfCommand::Rename { new_branch } => commands::rename(ctx, &new_branch).await,
        WfCommand::Pr => commands::pr(ctx).await.map(|_| ()),
        WfCommand::Hotfix { build_tag } => commands::hotfix(ctx, &build_tag).await,
        WfCommand::Qa {
            branch,
            no_merge_back,
        } => {
            let args = QaArgs {
                branch,
                merge_back: !no_merge_back,
            };
            commands::qa(ctx, &args, &require_main()?).await.map(|_| ())
        }
        WfCommand::CutRelease { branch } => {
            commands::cut_release(ctx, branch.as_deref(), &require_main()?)
                .await
                .map(|_| ())
        }
        WfCommand::MergeBack => merge_back(ctx, &require_main()?).await,
        WfCommand::Setup => {
            ctx.log("Repository setup is complete");
            Ok(())
        }
    }
}
