//! CLI entry point - the composition root.
//!
//! Parses arguments, wires the HTTP client into the core ports via
//! bootstrap and dispatches to the command handlers.

use std::process::ExitCode;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use dlwatch_cli::handlers::actions::DownloadCommand;
use dlwatch_cli::handlers::watch::WatchArgs;
use dlwatch_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};
use dlwatch_core::ClearSelection;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::from_cli(&cli);
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    // Bootstrap the CLI context (composition root)
    let ctx = bootstrap(&config)?;

    match command {
        Commands::Watch {
            uids,
            interval_ms,
            keep_stale,
        } => {
            let args = WatchArgs {
                uids,
                interval: Duration::from_millis(interval_ms),
                keep_stale,
            };
            handlers::watch::execute(&ctx, args).await?;
        }
        Commands::List { uids } => {
            handlers::list::execute(&ctx, uids).await?;
        }
        Commands::Error { uid } => {
            handlers::error_detail::execute(&ctx, &uid).await?;
        }
        Commands::Pause { uid } => {
            handlers::actions::execute(&ctx, DownloadCommand::Pause(uid)).await?;
        }
        Commands::Resume { uid } => {
            handlers::actions::execute(&ctx, DownloadCommand::Resume(uid)).await?;
        }
        Commands::Restart { uid } => {
            handlers::actions::execute(&ctx, DownloadCommand::Restart(uid)).await?;
        }
        Commands::Cancel { uid } => {
            handlers::actions::execute(&ctx, DownloadCommand::Cancel(uid)).await?;
        }
        Commands::Clear { uid } => {
            handlers::actions::execute(&ctx, DownloadCommand::Clear(uid)).await?;
        }
        Commands::PauseAll => {
            handlers::actions::execute(&ctx, DownloadCommand::PauseAll).await?;
        }
        Commands::ResumeAll => {
            handlers::actions::execute(&ctx, DownloadCommand::ResumeAll).await?;
        }
        Commands::ClearAll {
            finished,
            paused,
            errors,
        } => {
            let selection = ClearSelection::new(finished, paused, errors);
            handlers::actions::execute(&ctx, DownloadCommand::ClearAll(selection)).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
