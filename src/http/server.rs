//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Build the Axum router with a single dispatching handler
//! - Wire up middleware (request ID, tracing, timeout, CORS origin header)
//! - Classify each request and hand it to the preflight, proxy, health,
//!   debug, or static responder
//! - Log and record metrics at the handler edge
//! - Serve until the shutdown signal fires, then drain
//!
//! # Design Decisions
//! - One fallback handler instead of per-path routes; the routing table is
//!   the only place that decides where a request goes
//! - Handlers share immutable state only

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request},
    response::{IntoResponse, Response},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::validation::{check_timeout_order, ValidationError};
use crate::config::ProxyConfig;
use crate::health::{get_debug, get_health};
use crate::http::cors::{CorsError, CorsHeaders};
use crate::http::request::{request_id, UuidRequestId};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::proxy::{ApiProxy, ProxyError};
use crate::routing::{RouteDecision, RoutingTable};
use crate::static_files::{StaticFileError, StaticFileServer};

/// Errors building the server from configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Cors(#[from] CorsError),

    #[error(transparent)]
    Timeouts(#[from] ValidationError),
}

/// Application state injected into the dispatcher.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub routes: Arc<RoutingTable>,
    pub proxy: ApiProxy,
    pub assets: Arc<StaticFileServer>,
    pub cors: Arc<CorsHeaders>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<ProxyConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        check_timeout_order(config.upstream.timeout_secs, config.timeouts.request_secs)?;

        let config = Arc::new(config);
        let cors = Arc::new(CorsHeaders::from_config(&config.cors)?);

        let state = AppState {
            routes: Arc::new(RoutingTable::from_config(&config)),
            proxy: ApiProxy::new(&config.upstream),
            assets: Arc::new(StaticFileServer::new(&config.static_files)),
            cors,
            config: Arc::clone(&config),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let allow_origin = state.cors.allow_origin();

        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetResponseHeaderLayer::if_not_present(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                allow_origin,
            ))
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(middleware)
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then finish in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            asset_root = %self.config.static_files.root.display(),
            debug_endpoint = self.config.debug.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Classify the request and hand it to its responder.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers()).to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let route = state.routes.classify(&method, &path);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = route.as_str(),
        "Dispatching request"
    );

    let response = match route {
        RouteDecision::Preflight => state.cors.preflight_response(),
        RouteDecision::Health => get_health().into_response(),
        RouteDecision::Debug => get_debug(&state.config).into_response(),
        RouteDecision::ApiProxy => proxy_api(&state, &request_id, request).await,
        RouteDecision::Static => serve_static(&state, &request_id, &method, &path).await,
    };

    metrics::record_request(
        method.as_str(),
        response.status().as_u16(),
        route.as_str(),
        start_time,
    );
    response
}

async fn proxy_api(state: &AppState, request_id: &str, request: Request<Body>) -> Response {
    let method = request.method().clone();
    let target = state
        .proxy
        .target_url(request.uri().path(), request.uri().query());

    tracing::info!(
        request_id = %request_id,
        method = %method,
        target = %target,
        "Proxying API request"
    );

    match state.proxy.forward(request).await {
        Ok(response) => {
            tracing::debug!(
                request_id = %request_id,
                status = response.status().as_u16(),
                "Upstream responded"
            );
            response
        }
        Err(err) => {
            metrics::record_upstream_error(err.kind());
            match &err {
                ProxyError::UnexpectedHtml { content_type, .. } => tracing::warn!(
                    request_id = %request_id,
                    upstream = %state.proxy.base_url(),
                    content_type = %content_type,
                    "Upstream returned HTML instead of an API response"
                ),
                _ => tracing::error!(
                    request_id = %request_id,
                    upstream = %state.proxy.base_url(),
                    target = %target,
                    error = %err.error_message(),
                    "API upstream request failed"
                ),
            }
            err.into_response()
        }
    }
}

async fn serve_static(state: &AppState, request_id: &str, method: &Method, path: &str) -> Response {
    match state.assets.serve(method, path).await {
        Ok(asset) => {
            if asset.fallback {
                tracing::debug!(
                    request_id = %request_id,
                    path = %path,
                    "No asset matched, serving default document"
                );
            }
            asset.into_response()
        }
        Err(err) => {
            match &err {
                StaticFileError::Io { .. } => tracing::error!(
                    request_id = %request_id,
                    path = %path,
                    error = %err,
                    "Failed to read static asset"
                ),
                StaticFileError::NotFound(_) => tracing::warn!(
                    request_id = %request_id,
                    path = %path,
                    root = %state.assets.root().display(),
                    "Asset and default document missing"
                ),
                StaticFileError::MethodNotAllowed => tracing::debug!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    "Rejected non-GET/HEAD static request"
                ),
            }
            err.into_response()
        }
    }
}
