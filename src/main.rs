use branch_select::Result;
use branch_select::commands::completions::{self, Shell};
use branch_select::commands::pick::{self, ActionFlags, InvocationMode};
use branch_select::config::Config;
use branch_select::logging;
use clap::{ArgAction, CommandFactory, Parser, ValueHint};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "git-branch-select")]
#[command(about = "Pick a local git branch, then checkout, edit, delete or show it")]
#[command(version)]
pub struct Cli {
    /// Use the current branch instead of showing the branch menu
    #[arg(long)]
    current: bool,

    #[command(flatten)]
    actions: ActionFlags,

    /// Configuration file to use instead of the default location
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        completions::generate_completions(shell, &mut cmd);
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load(cli.config.as_deref())?;
    let mode = InvocationMode::from_flags(cli.current, &cli.actions);
    tracing::debug!(?mode, ?config, "starting");

    let outcome = pick::pick_branch(&mode, &config).await?;
    Ok(outcome.exit_code(config.fail_on_action_error))
}
