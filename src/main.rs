use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use gemini_qa::{server, AppConfig, GeminiFactory, QueryService, CREDENTIAL_VAR};

#[derive(Parser)]
#[command(name = "gemini-qa")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long)]
    verbose: bool,

    /// Address to serve the page on (overrides QA_BIND_ADDR)
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Model identifier (overrides GEMINI_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Request timeout in seconds (overrides GEMINI_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("failed to load .env");
        }
    }

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut config = AppConfig::from_env()?;
    if let Some(model) = cli.model {
        config = config.with_model(model)?;
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs))?;
    }
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }

    if config.credential.is_none() {
        warn!("{CREDENTIAL_VAR} is not set; every question will fail until it is configured");
    }
    info!(model = %config.model, timeout = ?config.timeout, "configuration loaded");

    let factory = GeminiFactory::from_config(&config)?;
    let addr = config.bind_addr;
    let service = QueryService::new(Arc::new(config), Arc::new(factory));

    server::serve(service, addr, shutdown_signal())
        .await
        .with_context(|| format!("server on {addr} failed"))?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl-C: {}", e);
    }
}
