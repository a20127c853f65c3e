//! duesoon CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use duesoon_core::init_tracing;

use duesoon_client::cli::{Cli, Command, ConfigAction};
use duesoon_client::commands;
use duesoon_client::config::{AppConfig, ClientConfig};
use duesoon_client::error::ClientResult;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    // Configuration comes first so the file's `debug` key reaches logging
    let (file, source) = match cli.config {
        Some(ref path) => (ClientConfig::load_from(path)?, path.clone()),
        None => (ClientConfig::load()?, ClientConfig::default_path()),
    };
    let config = AppConfig::resolve(&cli, file)?;
    init_tracing(config.tracing_config(cli.json_logs))?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let report = commands::run::run(&config).await?;
            println!(
                "Sent notification: {} event(s), {} block(s)",
                report.event_count, report.block_count
            );
            Ok(())
        }
        Command::Watch { interval_minutes } => {
            commands::watch::watch(&config, interval_minutes).await?;
            Ok(())
        }
        Command::Preview => commands::preview::preview(&config).await,
        Command::Events { json } => commands::events::events(&config, json).await,
        Command::TestWebhook => commands::webhook::test_webhook(&config).await,
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config, &source),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&source),
        },
    }
}
