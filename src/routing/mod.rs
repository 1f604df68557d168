//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Sanitized path
//!     → router.rs (route lookup, longest prefix first)
//!     → matcher.rs (segment-boundary prefix match + rewrite)
//!     → Return: RouteMatch { route, upstream_path } or NoMatch
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Sort by prefix length
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - Strip and replace are one rule type, never special-cased per service

pub mod matcher;
pub mod router;

pub use router::{Route, RouteMatch, Router};
