//! In-memory CRUD backends the gateway fronts.
//!
//! # Data Flow
//! ```text
//! Request (already rewritten by the gateway, e.g. /users/42)
//!     → handlers.rs (axum router: list/create/get/update/delete)
//!     → error.rs    (parse body, map failures to { "error": ... })
//!     → store.rs    (RecordStore<R>, insertion ordered)
//!     → users.rs / products.rs (field rules per record type)
//! ```
//!
//! # Design Decisions
//! - Each service owns its store through router state; nothing is global
//! - Records live for the life of the process only

pub mod error;
pub mod handlers;
pub mod products;
pub mod store;
pub mod users;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

pub use error::{parse_body, ServiceError};
pub use handlers::crud_router;
pub use store::{RecordStore, Resource};

/// Serve a backend router until the shutdown signal fires.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    name: &str,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(service = name, address = %addr, "Service listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!(service = name, "Service stopped");
    Ok(())
}
