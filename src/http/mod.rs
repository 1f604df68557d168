//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, path sanitizer)
//!     → endpoints.rs (gateway-local routes: /, /health, debug echoes)
//!     → [pipeline prepares the request]
//!     → dispatcher.rs (match route, rewrite path, forward)
//!     → request.rs (upstream request: forwarded headers, body framing)
//!     → response.rs (relay backend status, headers and body)
//!     → Send to client
//! ```

pub mod dispatcher;
pub mod endpoints;
pub mod request;
pub mod response;
pub mod server;

pub use dispatcher::Dispatcher;
pub use request::X_REQUEST_ID;
pub use server::{AppState, GatewayService, HttpServer};
