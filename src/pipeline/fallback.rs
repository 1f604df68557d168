//! Fallback body synthesis from query parameters.
//!
//! Some clients send `POST /api/users?name=Ana&email=ana@x.com` with no body.
//! When a create/update request arrives empty and carries both `name` and
//! `email`, a JSON body with exactly those two fields is built for it. No
//! other field is ever inferred.

use axum::body::Bytes;
use axum::http::{header, HeaderValue, Method};
use serde_json::json;

use crate::pipeline::{RequestBody, RequestContext};

/// Methods that may receive a synthesized body.
pub fn is_synthesizable_method(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Build the fallback body, if the request qualifies.
pub fn synthesize(ctx: &RequestContext) -> Option<Bytes> {
    if !is_synthesizable_method(&ctx.method) || !ctx.body.is_empty() {
        return None;
    }

    let params = ctx.query_params();
    let name = params.get("name").filter(|v| !v.is_empty())?;
    let email = params.get("email").filter(|v| !v.is_empty())?;

    let body = json!({ "name": name, "email": email });
    serde_json::to_vec(&body).ok().map(Bytes::from)
}

/// Pipeline stage: replace an empty body with the synthesized one.
pub fn apply(mut ctx: RequestContext) -> RequestContext {
    if let Some(bytes) = synthesize(&ctx) {
        tracing::info!(
            method = %ctx.method,
            path = %ctx.path(),
            "Empty body; synthesized JSON from name/email query parameters"
        );
        ctx.headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        ctx.body = RequestBody::Synthesized(bytes);
    }
    ctx
}
