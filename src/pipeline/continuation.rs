//! `Expect: 100-continue` handling.
//!
//! hyper's server writes the interim `100 Continue` the first time the
//! request body is polled, so acknowledging a client means reading its body
//! promptly. The capture stage runs right after this one and does exactly
//! that; streamed bodies are polled as soon as the upstream request starts.
//! A failed interim write surfaces as a body read error later, never here.

use axum::http::{header, HeaderMap};

use crate::pipeline::RequestContext;

/// Whether the headers carry `Expect: 100-continue` (case-insensitive).
pub fn expects_continue(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::EXPECT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.trim().eq_ignore_ascii_case("100-continue"))
}

/// Pipeline stage: note the expectation and drop the header so neither later
/// stages nor the backend see it.
pub fn apply(mut ctx: RequestContext) -> RequestContext {
    if expects_continue(&ctx.headers) {
        tracing::debug!(path = %ctx.path(), "Client expects 100-continue; body read acknowledges it");
        ctx.headers.remove(header::EXPECT);
    }
    ctx
}
