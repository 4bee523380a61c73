use anyhow::{Context, Result};
use clap::Parser;
use immuload_client::{Connector, GrpcConnector};
use immuload_config::{ConfigLoader, LoadConfig, LoggingConfig};
use immuload_harness::{InMemoryService, WorkerPool};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;

/// Environment overrides on top of defaults, then flags on top of both.
/// Validation runs once, on the merged result.
fn load_config(cli: &Cli) -> Result<LoadConfig> {
    let mut config = ConfigLoader::new()
        .from_env_unvalidated()
        .context("Failed to read configuration from the environment")?;
    cli.apply(&mut config);
    config.validate_all().context("Invalid configuration")?;
    Ok(config)
}

/// `--log-level` wins, then `RUST_LOG`, then the configured level
fn init_simple_tracing(log_level: Option<&String>, logging: &LoggingConfig) -> Result<()> {
    let configured = logging.level.as_str();
    let env_filter = match log_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| {
            eprintln!("Invalid log level '{}', falling back to 'info'", level);
            EnvFilter::new("info")
        }),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_file(logging.include_location)
        .with_line_number(logging.include_location)
        .init();
    debug!("Simple tracing initialized");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    init_simple_tracing(cli.log_level.as_ref(), &config.logging)?;
    debug!(config = %config.summary(), "Effective configuration");

    let connector: Arc<dyn Connector> = if cli.offline {
        info!("Offline mode: using the in-process service");
        Arc::new(InMemoryService::new())
    } else {
        Arc::new(GrpcConnector::new(config.connection.connect_timeout))
    };

    let pool = WorkerPool::new(connector, Arc::new(config));
    let summaries = pool.run().await.context("Load run aborted")?;

    let sessions: u64 = summaries.iter().map(|s| s.sessions).sum();
    let probe_pairs: u64 = summaries.iter().map(|s| s.probe_pairs).sum();
    info!(
        workers = summaries.len(),
        sessions, probe_pairs, "All workers completed"
    );
    Ok(())
}
