//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the local endpoints and the proxy fallback
//! - Wire up middleware (panic catching, tracing, request ID)
//! - Sanitize request paths before the router matches them
//! - Run the request pipeline and hand the result to the dispatcher
//! - Serve until the shutdown signal fires

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{Method, Uri},
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::util::{MapRequest, MapRequestLayer};
use tower::Layer;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{validate_config, ConfigError, GatewayConfig, PipelineConfig};
use crate::error::GatewayError;
use crate::http::dispatcher::Dispatcher;
use crate::http::endpoints;
use crate::http::request::X_REQUEST_ID;
use crate::observability::metrics;
use crate::pipeline::{self, sanitize::sanitize_request};
use crate::routing::Router as RouteTable;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub pipeline: Arc<PipelineConfig>,
}

/// The router wrapped in the path sanitizer, so routing sees clean paths.
pub type GatewayService = MapRequest<Router, fn(Request) -> Request>;

/// Wrap a router so every request path is sanitized before matching.
pub fn sanitized(router: Router) -> GatewayService {
    MapRequestLayer::new(sanitize_request::<Body> as fn(Request) -> Request).layer(router)
}

/// HTTP server for the API gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let routes = RouteTable::from_config(&config.routes);
        let dispatcher = Arc::new(Dispatcher::new(routes, &config.timeouts));

        let state = AppState {
            dispatcher,
            pipeline: Arc::new(config.pipeline.clone()),
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(endpoints::root))
            .route("/health", get(endpoints::health))
            .route("/debug/req-info", any(endpoints::req_info))
            .route("/api/debug/raw", post(endpoints::debug_raw))
            .method_not_allowed_fallback(method_not_allowed)
            .fallback(proxy_handler)
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::custom(panic_response))
    }

    /// The application, sanitizer included, for in-process use.
    pub fn service(&self) -> GatewayService {
        sanitized(self.router.clone())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.config.routes.len(),
            "HTTP server starting"
        );

        let app = sanitized(self.router);

        axum::serve(
            listener,
            axum::ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
        )
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Proxy handler: prepare the request, then dispatch it.
async fn proxy_handler(State(state): State<AppState>, request: Request) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Proxying request"
    );

    let result = async {
        let ctx = pipeline::prepare(request, &state.pipeline).await?;
        state.dispatcher.dispatch(ctx).await
    }
    .await;

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(
                request_id = %request_id,
                path = %path,
                status = %err.status(),
                error = %err,
                "Request failed"
            );
            err.into_response()
        }
    };

    let route = state
        .dispatcher
        .routes()
        .match_path(&path)
        .map(|m| m.route.name().to_string())
        .unwrap_or_else(|| "none".to_string());
    metrics::record_request(method.as_str(), response.status().as_u16(), &route, start_time);

    response
}

/// A local endpoint was hit with a method it does not serve.
async fn method_not_allowed(method: Method, uri: Uri) -> GatewayError {
    GatewayError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

/// Turn a handler panic into the generic 500 body.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    GatewayError::Internal(detail).into_response()
}
