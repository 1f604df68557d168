//! Products CRUD service.

use clap::Parser;
use tokio::net::TcpListener;

use api_gateway::lifecycle::{shutdown_signal, Shutdown};
use api_gateway::observability::logging;
use api_gateway::services::{self, products};

#[derive(Parser, Debug)]
#[command(name = "products-service", version, about = "In-memory products service")]
struct Args {
    #[arg(short, long, env = "PORT", default_value_t = products::DEFAULT_PORT)]
    port: u16,

    /// Path the CRUD routes are mounted under
    #[arg(short, long, env = "BASE_PATH", default_value = products::DEFAULT_BASE_PATH)]
    base_path: String,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init("products-service", &args.log_level);

    let listener = TcpListener::bind(("0.0.0.0", args.port)).await?;
    let router = products::router(&args.base_path);

    let shutdown = Shutdown::new();
    let task = tokio::spawn(services::serve(
        listener,
        router,
        "products-service",
        shutdown.subscribe(),
    ));

    shutdown_signal().await;
    shutdown.trigger();
    task.await??;
    Ok(())
}
