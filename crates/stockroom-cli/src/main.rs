//! Stockroom - a terminal console for the inventory API.
//!
//! Wraps the `stockroom-core` client: every command shares the stored
//! session, and a session that could not be renewed is reported once
//! with a hint to log in again.

mod commands;
mod logging;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use stockroom_core::config::CredentialBackend;
use stockroom_core::{Config, SessionEvent, TerminationReason};
use tokio::sync::broadcast::Receiver;
use tracing::{debug, error, info, warn};

use commands::{CommandContext, Commands};

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(about = "Terminal console for the stockroom inventory API")]
#[command(version)]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "STOCKROOM_API_URL")]
    api_url: Option<String>,

    /// Where session tokens are kept between commands
    #[arg(long, global = true)]
    credentials: Option<Backend>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Also write logs to a daily file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    Keyring,
    File,
}

impl From<Backend> for CredentialBackend {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Keyring => CredentialBackend::Keyring,
            Backend::File => CredentialBackend::File,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = logging::init_tracing(cli.log_dir.as_deref())?;

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(backend) = cli.credentials {
        config.credential_backend = backend.into();
    }
    if config.credential_backend == CredentialBackend::Memory {
        warn!("Memory credential backend does not persist; every command starts logged out");
    }
    info!(api_url = %config.api_url, backend = ?config.credential_backend, "Stockroom starting");

    let client = config.build_client()?;
    let mut events = client.subscribe();
    let mut ctx = CommandContext {
        client,
        config,
        json: cli.json,
    };

    let result = cli.command.execute(&mut ctx).await;
    report_session_events(&mut events);

    if let Err(e) = result {
        error!("Command failed: {e:#}");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

/// Tell the user when the session ended underneath them.
fn report_session_events(events: &mut Receiver<SessionEvent>) {
    while let Ok(event) = events.try_recv() {
        debug!(?event, "Session event");
        if let SessionEvent::Terminated(reason) = event {
            if reason != TerminationReason::LoggedOut {
                eprintln!(
                    "Your session has ended ({}). Run `stockroom login` to sign in again.",
                    reason
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_quotation_create() {
        let cli = Cli::try_parse_from([
            "stockroom",
            "quotations",
            "create",
            "--customer",
            "9",
            "--store",
            "1",
            "--item",
            "p1:2:45000",
            "--item",
            "p2:1:10000",
        ])
        .unwrap();
        match cli.command {
            Commands::Quotations { .. } => {}
            _ => panic!("expected quotations command"),
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        let result = Cli::try_parse_from(["stockroom", "quotations", "status", "3", "shipped"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_credentials_choices_persist_between_commands() {
        let cli =
            Cli::try_parse_from(["stockroom", "--credentials", "file", "categories", "list"]).unwrap();
        assert!(matches!(cli.credentials, Some(Backend::File)));

        let result =
            Cli::try_parse_from(["stockroom", "--credentials", "memory", "categories", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_report_range_needs_both_ends() {
        let result = Cli::try_parse_from([
            "stockroom",
            "report",
            "inventory",
            "--from",
            "2024-01-01",
        ]);
        assert!(result.is_err());
    }
}
