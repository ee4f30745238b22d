//! Session gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ request id ──▶ route guard ──┬─▶ /api/*          ──▶ proxy relay ──▶ Upstream API
//!                              (cookie       ├─▶ /auth/callback  ──▶ Session Cookie (SameSite=None)
//!                               presence)    ├─▶ /auth/oauth/:p  ──▶ redirect to upstream OAuth
//!                                            ├─▶ /auth/logout    ──▶ Session Cookie cleared
//!                                            └─▶ UI pages / 404
//!
//!   Upstream response ──▶ Set-Cookie: token=… parsed ──▶ Session Cookie written or cleared
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use session_gateway::config::{self, Environment};
use session_gateway::lifecycle::{signals, Shutdown};
use session_gateway::observability::{logging, metrics};
use session_gateway::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "session-gateway", version, about = "Cookie-to-bearer session gateway")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listener bind address.
    #[arg(long, env = config::loader::ENV_BIND)]
    bind: Option<String>,

    /// Upstream API base URL.
    #[arg(long, env = config::loader::ENV_BACKEND_URL)]
    backend_url: Option<String>,

    /// Deployment environment (development | production).
    #[arg(long, env = config::loader::ENV_ENVIRONMENT)]
    environment: Option<Environment>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = config::load_config(cli.config.as_deref()).context("loading configuration")?;
    if let Some(environment) = cli.environment {
        config.environment = environment;
    }
    if let Some(url) = cli.backend_url {
        config.upstream.base_url = Some(url);
    }
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Err(errors) = config::validate_config(&config) {
        anyhow::bail!(config::ConfigError::Validation(errors));
    }

    logging::init_logging(&config.observability, config.environment)
        .context("initializing logging")?;

    tracing::info!(
        environment = %config.environment,
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream_base_url(),
        timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr).context("starting metrics exporter")?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .with_context(|| format!("binding {}", config.listener.bind_address))?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
