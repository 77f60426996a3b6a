//! `podgate` application entry point.
//!
//! This binary runs the container-operations gateway. It uses `eyre` for
//! opaque error handling at the application boundary, converting
//! domain-specific errors into human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/podgate/config.toml` or path from `PODGATE_CONFIG_PATH`)
//! 3. Environment variables (`PODGATE_*`)
//! 4. Command-line arguments

use clap::Parser;
use eyre::{Report, Result as EyreResult};
use mockable::DefaultEnv;
use podgate::config::{AppConfig, Cli, Commands, load_config};
use podgate::engine::{EngineConnector, EngineSettings};
use podgate::error::Result as PodgateResult;
use podgate::server;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// Initialises logging, loads configuration, then dispatches to the selected
/// subcommand on a multi-threaded Tokio runtime.
fn main() -> EyreResult<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli).map_err(Report::from)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(run(cli.command(), &config))
        .map_err(Report::from)
}

/// Install the `fmt` subscriber, honouring `RUST_LOG` and defaulting to `info`.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
}

/// Execute the CLI command, returning domain-specific errors.
///
/// Keeps semantic errors inside the run loop so the CLI boundary owns
/// conversion to `eyre::Report`.
async fn run(command: Commands, config: &AppConfig) -> PodgateResult<()> {
    let settings = EngineSettings::resolve(config, &DefaultEnv::new())?;

    match command {
        Commands::Serve => server::serve(&config.server, settings).await,
        Commands::Check => check_engine(settings).await,
    }
}

/// Connect to the engine and confirm it answers a ping.
async fn check_engine(settings: EngineSettings) -> PodgateResult<()> {
    let connector = EngineConnector::new(settings);
    connector.connect_and_verify_async().await?;
    info!(endpoint = %connector.settings().endpoint(), "container engine is reachable");
    Ok(())
}
