//! Upstream request construction.
//!
//! # Responsibilities
//! - Point the request at the route's backend with the rewritten path
//! - Copy forwardable headers; drop `Expect` and hop-by-hop headers
//! - Recompute content-length from the body actually forwarded
//!
//! # Design Decisions
//! - Captured and synthesized bodies are sent as the exact buffered bytes
//! - Streamed bodies keep the client's content-length, which hyper has
//!   already enforced on the inbound side
//! - Requests always go upstream as HTTP/1.1; the client pool is HTTP/1 only

use axum::body::Body;
use axum::http::{header, HeaderValue, Request, Uri};

use crate::error::{GatewayError, GatewayResult};
use crate::pipeline::fallback::is_synthesizable_method;
use crate::pipeline::RequestContext;
use crate::routing::Route;
use crate::security::headers::{set_forwarded_headers, strip_hop_by_hop};

/// Header carrying the correlation id, set at ingress and forwarded upstream.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Build `http://authority/path?query` for the backend.
pub fn upstream_uri(authority: &str, path: &str, query: Option<&str>) -> GatewayResult<Uri> {
    let path_and_query = match query {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };
    Uri::builder()
        .scheme("http")
        .authority(authority)
        .path_and_query(path_and_query)
        .build()
        .map_err(|e| GatewayError::Internal(format!("invalid upstream uri: {}", e)))
}

/// Turn a prepared request into the request sent to `route`.
pub fn build_upstream_request(
    ctx: RequestContext,
    route: &Route,
    upstream_path: &str,
) -> GatewayResult<Request<Body>> {
    let uri = upstream_uri(route.authority(), upstream_path, ctx.uri.query())?;

    let RequestContext {
        method,
        mut headers,
        client_addr,
        body,
        ..
    } = ctx;

    let original_host = headers.remove(header::HOST);
    strip_hop_by_hop(&mut headers);
    headers.remove(header::EXPECT);
    set_forwarded_headers(&mut headers, client_addr, original_host);

    let host = HeaderValue::from_str(route.authority())
        .map_err(|e| GatewayError::Internal(format!("invalid backend authority: {}", e)))?;
    headers.insert(header::HOST, host);

    if let Some(bytes) = body.buffered() {
        headers.remove(header::CONTENT_LENGTH);
        if !bytes.is_empty() || is_synthesizable_method(&method) {
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(bytes.len()));
        }
    }

    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body.into_body())
        .map_err(|e| GatewayError::Internal(format!("failed to build upstream request: {}", e)))?;
    *request.headers_mut() = headers;
    Ok(request)
}
