//! Body presence validation.
//!
//! A body-bearing request that declares a JSON content type must arrive with
//! a body or have one synthesized for it. Otherwise the caller gets a 400
//! explaining what was expected, instead of an opaque backend failure.

use axum::http::{header, HeaderMap};

use crate::error::{GatewayError, GatewayResult};
use crate::pipeline::fallback::is_synthesizable_method;
use crate::pipeline::RequestContext;

pub const MISSING_BODY_MESSAGE: &str =
    "Request body is required. Send a raw JSON body with the header Content-Type: application/json";

fn declares_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.to_ascii_lowercase().contains("application/json"))
}

/// Pipeline stage: reject declared-JSON requests that carry no body.
pub fn apply(ctx: RequestContext) -> GatewayResult<RequestContext> {
    if is_synthesizable_method(&ctx.method) && declares_json(&ctx.headers) && ctx.body.is_empty() {
        tracing::warn!(
            method = %ctx.method,
            path = %ctx.path(),
            "Rejecting JSON request without a body"
        );
        return Err(GatewayError::BadRequest(MISSING_BODY_MESSAGE.to_string()));
    }
    Ok(ctx)
}
