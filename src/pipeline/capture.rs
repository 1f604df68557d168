//! Raw body capture.
//!
//! # Responsibilities
//! - Decide which requests are captured (API prefix + JSON content type)
//! - Buffer the exact body bytes up to the configured ceiling
//! - Reject oversized bodies before they reach the dispatcher
//!
//! # Design Decisions
//! - Bytes are stored unparsed; the dispatcher relays them verbatim
//! - Declared content-length over the ceiling is rejected without reading
//! - Anything not captured stays a stream and is relayed as-is

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap};
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::config::PipelineConfig;
use crate::error::{error_chain, GatewayError, GatewayResult};
use crate::pipeline::{RequestBody, RequestContext};
use crate::routing::matcher::PathPrefixMatcher;

/// `application/json` or any `application/*+json`, parameters ignored.
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    match mime.strip_prefix("application/") {
        Some("json") => true,
        Some(subtype) => subtype.ends_with("+json") && subtype.len() > "+json".len(),
        None => false,
    }
}

/// Whether `path` lies under `prefix` on a segment boundary.
pub fn is_under_prefix(path: &str, prefix: &str) -> bool {
    PathPrefixMatcher::new(prefix).matches(path)
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Read a whole body into memory, failing with 413 past `limit` bytes.
pub async fn read_limited(headers: &HeaderMap, body: Body, limit: usize) -> GatewayResult<Bytes> {
    if declared_length(headers).is_some_and(|len| len > limit as u64) {
        return Err(GatewayError::PayloadTooLarge { limit });
    }

    let collected = Limited::new(body, limit).collect().await.map_err(|e| {
        if e.downcast_ref::<LengthLimitError>().is_some() {
            tracing::warn!(limit, "Request body exceeded capture limit");
            GatewayError::PayloadTooLarge { limit }
        } else {
            tracing::warn!(error = %error_chain(&*e), "Failed to read request body");
            GatewayError::BadRequest(format!("Failed to read request body: {}", e))
        }
    })?;

    Ok(collected.to_bytes())
}

/// Pipeline stage: buffer JSON bodies under the API prefix.
pub async fn apply(mut ctx: RequestContext, config: &PipelineConfig) -> GatewayResult<RequestContext> {
    if !is_under_prefix(ctx.path(), &config.api_prefix) || !is_json_content_type(&ctx.headers) {
        return Ok(ctx);
    }

    let body = match std::mem::replace(&mut ctx.body, RequestBody::Captured(Bytes::new())) {
        RequestBody::Streaming(body) => body,
        other => {
            ctx.body = other;
            return Ok(ctx);
        }
    };

    let bytes = read_limited(&ctx.headers, body, config.max_body_bytes).await?;
    tracing::debug!(path = %ctx.path(), bytes = bytes.len(), "Captured raw request body");
    ctx.body = RequestBody::Captured(bytes);
    Ok(ctx)
}
