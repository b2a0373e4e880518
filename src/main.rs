use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use git_wf::cli::{Cli, run};
use git_wf::context::Context;
use git_wf::error::{WorkflowError, WorkflowResult};
use git_wf::git::GitCli;
use git_wf::settings::Settings;
use git_wf::ui::{ConsoleUi, ERROR_PREFIX};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "git_wf=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> WorkflowResult<()> {
    let settings = Settings::from_env(!cli.no_open)?;
    let ui = ConsoleUi::new(cli.forced_answer());
    let git = GitCli::new(std::env::current_dir()?);
    let ctx = Context::new(&git, &ui, &settings);
    run(&ctx, cli.command).await
}

fn report(err: &WorkflowError) {
    if err.is_user_facing() {
        eprintln!("{}{}", ERROR_PREFIX, err);
    } else {
        eprintln!("{}{:?}", ERROR_PREFIX, err);
    }
}
