//! Request preparation pipeline.
//!
//! # Data Flow
//! ```text
//! Request<Body>
//!     → sanitize.rs      (strip invisible characters from the path)
//!     → continuation.rs  (Expect: 100-continue, header removed)
//!     → capture.rs       (buffer JSON bodies under the API prefix, ≤ ceiling)
//!     → fallback.rs      (empty create/update + name/email query → JSON body)
//!     → validate.rs      (declared JSON without any body → 400)
//!     → RequestContext handed to the dispatcher
//! ```
//!
//! # Design Decisions
//! - Every stage takes and returns an explicit `RequestContext`
//! - Fallible stages return `GatewayResult`, short-circuiting with `?`
//! - The sanitizer also runs as the outermost request mapper so the axum
//!   router's own matching sees the cleaned path; running it again here is a
//!   no-op because its output is a fixed point

pub mod capture;
pub mod continuation;
pub mod fallback;
pub mod sanitize;
pub mod validate;

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::body::{Body, Bytes, HttpBody};
use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Method, Request, Uri, Version};

use crate::config::PipelineConfig;
use crate::error::GatewayResult;

/// Body of a request as it moves through the pipeline.
#[derive(Debug)]
pub enum RequestBody {
    /// Exact bytes read from the client.
    Captured(Bytes),
    /// JSON built from query parameters.
    Synthesized(Bytes),
    /// Not captured; relayed to the backend as a stream.
    Streaming(Body),
}

impl RequestBody {
    /// Whether the request carries no payload at all.
    pub fn is_empty(&self) -> bool {
        match self {
            RequestBody::Captured(bytes) | RequestBody::Synthesized(bytes) => bytes.is_empty(),
            RequestBody::Streaming(body) => {
                body.is_end_stream() || body.size_hint().exact() == Some(0)
            }
        }
    }

    /// Bytes held in memory, if the body was captured or synthesized.
    pub fn buffered(&self) -> Option<&Bytes> {
        match self {
            RequestBody::Captured(bytes) | RequestBody::Synthesized(bytes) => Some(bytes),
            RequestBody::Streaming(_) => None,
        }
    }

    pub fn into_body(self) -> Body {
        match self {
            RequestBody::Captured(bytes) | RequestBody::Synthesized(bytes) => Body::from(bytes),
            RequestBody::Streaming(body) => body,
        }
    }
}

/// A request owned by the pipeline for the duration of one exchange.
#[derive(Debug)]
pub struct RequestContext {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub headers: HeaderMap,
    pub client_addr: Option<SocketAddr>,
    pub body: RequestBody,
}

impl RequestContext {
    pub fn from_request(request: Request<Body>) -> Self {
        let (parts, body) = request.into_parts();
        let client_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0);
        Self {
            method: parts.method,
            uri: parts.uri,
            version: parts.version,
            headers: parts.headers,
            client_addr,
            body: RequestBody::Streaming(body),
        }
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn query_params(&self) -> HashMap<String, String> {
        parse_query(self.uri.query())
    }
}

/// Decoded query parameters; a repeated key keeps its last value.
pub fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    query
        .map(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}

/// Run every preparation stage in order.
pub async fn prepare(request: Request<Body>, config: &PipelineConfig) -> GatewayResult<RequestContext> {
    let ctx = RequestContext::from_request(request);
    let ctx = sanitize::apply(ctx);
    let ctx = continuation::apply(ctx);
    let ctx = capture::apply(ctx, config).await?;
    let ctx = fallback::apply(ctx);
    validate::apply(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;

    #[test]
    fn query_params_last_value_wins() {
        let request = Request::builder()
            .uri("/api/users?name=a&name=b&email=x%40y.z")
            .body(Body::empty())
            .unwrap();
        let params = RequestContext::from_request(request).query_params();
        assert_eq!(params["name"], "b");
        assert_eq!(params["email"], "x@y.z");
    }

    #[tokio::test]
    async fn prepare_runs_stages_in_order() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/us%E2%80%8Bers?name=Ana&email=ana@x.com")
            .header("content-type", "application/json")
            .header("expect", "100-continue")
            .body(Body::empty())
            .unwrap();

        let ctx = prepare(request, &PipelineConfig::default()).await.unwrap();
        assert_eq!(ctx.path(), "/api/users");
        assert!(ctx.headers.get("expect").is_none());
        assert!(matches!(ctx.body, RequestBody::Synthesized(_)));
    }

    #[tokio::test]
    async fn prepare_short_circuits_on_missing_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/users")
            .header("content-type", "application/json")
            .body(Body::empty())
            .unwrap();

        let err = prepare(request, &PipelineConfig::default()).await.unwrap_err();
        assert!(matches!(err, GatewayError::BadRequest(_)));
    }
}
