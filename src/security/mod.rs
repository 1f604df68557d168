//! Header hygiene for forwarded traffic.
//!
//! # Data Flow
//! ```text
//! Upstream request:
//!     → headers.rs (drop hop-by-hop, set X-Forwarded-*)
//!     → Pass to backend
//! Backend response:
//!     → headers.rs (drop hop-by-hop)
//!     → Relay to client
//! ```
//!
//! # Design Decisions
//! - Client-supplied X-Forwarded-* values are replaced, not appended to

pub mod headers;
