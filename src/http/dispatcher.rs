//! Route dispatcher.
//!
//! # State Machine
//! ```text
//! MATCH ──no route──▶ NotFound (404)
//!   │
//!   ▼
//! REWRITE (strip / replace prefix)
//!   │
//!   ▼
//! FORWARD ──connect/transport failure──▶ ERROR (502, "Bad Gateway")
//!   │     ──no response before deadline──▶ ERROR (504, "Gateway Timeout")
//!   │
//!   ▼
//! RELAY (status + body verbatim)
//! ```
//!
//! # Design Decisions
//! - One shared pooled client; the route table is the only other shared state
//! - Dropping the dispatch future (client went away) drops the in-flight
//!   backend request with it, closing that backend connection
//! - No retries: every failure is reported once
//! - The deadline covers connect and response headers; a body already
//!   streaming to the client is not cut off

use std::time::Duration;

use axum::body::Body;
use axum::http::Response;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioTimer},
};

use crate::config::TimeoutConfig;
use crate::error::{error_chain, GatewayError, GatewayResult};
use crate::http::request::build_upstream_request;
use crate::http::response::relay;
use crate::pipeline::RequestContext;
use crate::routing::Router;

/// Forwards prepared requests to their backends.
#[derive(Debug)]
pub struct Dispatcher {
    routes: Router,
    client: Client<HttpConnector, Body>,
    request_timeout: Duration,
}

impl Dispatcher {
    pub fn new(routes: Router, timeouts: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(timeouts.idle_secs))
            .pool_timer(TokioTimer::new())
            .build(connector);

        Self {
            routes,
            client,
            request_timeout: Duration::from_secs(timeouts.request_secs),
        }
    }

    pub fn routes(&self) -> &Router {
        &self.routes
    }

    /// Match, rewrite, forward and relay one request.
    pub async fn dispatch(&self, ctx: RequestContext) -> GatewayResult<Response<Body>> {
        let path = ctx.path().to_string();
        let matched = self
            .routes
            .match_path(&path)
            .ok_or_else(|| GatewayError::NotFound(path.clone()))?;
        let route = matched.route;

        tracing::debug!(
            route = %route.name(),
            backend = %route.authority(),
            path = %path,
            upstream_path = %matched.upstream_path,
            "Dispatching request"
        );

        let request = build_upstream_request(ctx, route, &matched.upstream_path)?;

        let sent = tokio::time::timeout(self.request_timeout, self.client.request(request)).await;
        let Ok(result) = sent else {
            tracing::error!(
                route = %route.name(),
                backend = %route.authority(),
                timeout_secs = self.request_timeout.as_secs(),
                "Upstream timed out"
            );
            return Err(GatewayError::GatewayTimeout {
                secs: self.request_timeout.as_secs(),
            });
        };

        match result {
            Ok(response) => {
                tracing::debug!(route = %route.name(), status = %response.status(), "Relaying backend response");
                Ok(relay(response))
            }
            Err(e) => {
                let message = error_chain(&e);
                tracing::error!(
                    route = %route.name(),
                    backend = %route.authority(),
                    error = %message,
                    "Upstream error"
                );
                Err(GatewayError::UpstreamUnavailable(message))
            }
        }
    }
}
