//! Backend response relay.
//!
//! # Responsibilities
//! - Hand the backend's status and body back to the client unaltered
//! - Strip hop-by-hop headers from the backend response
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Once headers are sent, a mid-body backend failure ends the client
//!   connection; there is nothing left to translate into a 502

use axum::body::Body;
use axum::http::Response;
use hyper::body::Incoming;

use crate::security::headers::strip_hop_by_hop;

/// Convert a backend response into the client response.
pub fn relay(response: Response<Incoming>) -> Response<Body> {
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Response::from_parts(parts, Body::new(body))
}
