//! API gateway (v1)
//!
//! A single ingress point built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────────┐
//!                    │                     API GATEWAY                      │
//!                    │                                                      │
//!   Client Request   │  ┌──────────┐   ┌──────────────┐   ┌─────────────┐   │
//!   ─────────────────┼─▶│ sanitize │──▶│   pipeline   │──▶│   routing   │   │
//!                    │  │  (path)  │   │ 100-continue │   │ match and   │   │
//!                    │  └──────────┘   │ capture      │   │ rewrite     │   │
//!                    │                 │ fallback     │   └──────┬──────┘   │
//!                    │                 │ validate     │          │          │
//!                    │                 └──────────────┘          ▼          │
//!   Client Response  │                                   ┌─────────────┐    │
//!   ◀────────────────┼───────────────────────────────────│ dispatcher  │◀───┼── users-service
//!                    │                                   │ (forward,   │◀───┼── products-service
//!                    │                                   │  relay)     │    │
//!                    │                                   └─────────────┘    │
//!                    └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use api_gateway::config::{load_config, GatewayConfig};
use api_gateway::lifecycle::{shutdown_signal, Shutdown};
use api_gateway::observability::{logging, metrics};
use api_gateway::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "api-gateway", version, about = "Single-ingress API gateway")]
struct Args {
    /// TOML configuration file; built-in defaults when omitted
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listener port, overriding the configured bind address port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(port) = args.port {
        config.listener.set_port(port);
    }

    logging::init("api-gateway", &config.observability.log_level);
    tracing::info!("api-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        max_body_bytes = config.pipeline.max_body_bytes,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config)?;
    let shutdown = Shutdown::new();
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    shutdown_signal().await;
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
