//! Gateway-local endpoints outside the proxy path.

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::header,
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use serde_json::{json, Map, Value};

use crate::error::GatewayResult;
use crate::http::server::AppState;
use crate::pipeline::{capture, continuation, parse_query, RequestContext};

/// `GET /`: gateway status and the known route map.
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let mut routes = Map::new();
    for route in state.dispatcher.routes().routes() {
        routes.insert(route.name().to_string(), Value::String(route.prefix().to_string()));
    }
    routes.insert("health".to_string(), Value::String("/health".to_string()));

    Json(json!({
        "status": "Gateway Online",
        "routes": routes,
    }))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "Gateway OK",
        "timestamp": Utc::now(),
    }))
}

/// `ANY /debug/req-info`: echo what the gateway parsed from the request.
pub async fn req_info(State(state): State<AppState>, request: Request) -> GatewayResult<Json<Value>> {
    let RequestContext {
        method,
        uri,
        version,
        headers,
        body,
        ..
    } = continuation::apply(RequestContext::from_request(request));
    let query = parse_query(uri.query());

    let bytes = capture::read_limited(&headers, body.into_body(), state.pipeline.max_body_bytes).await?;

    let headers: Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
            )
        })
        .collect();

    Ok(Json(json!({
        "method": method.as_str(),
        "version": format!("{:?}", version),
        "path": uri.path(),
        "query": query,
        "headers": headers,
        "body": describe_text_body(&bytes),
    })))
}

/// `POST /api/debug/raw`: echo the captured raw body.
pub async fn debug_raw(State(state): State<AppState>, request: Request) -> GatewayResult<Json<Value>> {
    let RequestContext { headers, body, .. } =
        continuation::apply(RequestContext::from_request(request));
    let bytes = capture::read_limited(&headers, body.into_body(), state.pipeline.max_body_bytes).await?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| Value::String(v.to_string()))
        .unwrap_or(Value::Null);
    let body = serde_json::from_slice::<Value>(&bytes)
        .unwrap_or_else(|_| json!({ "base64": STANDARD.encode(&bytes) }));

    tracing::debug!(length = bytes.len(), "Echoing raw body");
    Ok(Json(json!({
        "length": bytes.len(),
        "contentType": content_type,
        "body": body,
    })))
}

/// JSON if it parses, text if it is UTF-8, base64 otherwise; null when empty.
fn describe_text_body(bytes: &Bytes) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    if let Ok(value) = serde_json::from_slice::<Value>(bytes) {
        return value;
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => Value::String(text.to_string()),
        Err(_) => json!({ "base64": STANDARD.encode(bytes) }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_bodies() {
        assert_eq!(describe_text_body(&Bytes::new()), Value::Null);
        assert_eq!(describe_text_body(&Bytes::from_static(b"{\"a\":1}")), json!({"a": 1}));
        assert_eq!(describe_text_body(&Bytes::from_static(b"plain")), json!("plain"));
        assert_eq!(
            describe_text_body(&Bytes::from_static(&[0xff, 0xfe])),
            json!({ "base64": "//4=" })
        );
    }
}
