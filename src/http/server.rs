//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the `/launches` handler
//! - Wire up middleware (request ID, tracing, panic catching, metrics)
//! - Apply the per-client rate limiter ahead of the handler
//! - Bind server to listener and shut down gracefully

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::panic_response;
use crate::launches::handler::list_launches;
use crate::observability::metrics;
use crate::security::rate_limit::{rate_limit_middleware, RateLimiter};
use crate::upstream::SpacexClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: SpacexClient,
    pub default_limit: u64,
}

/// HTTP server for the launch gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    rate_limiter: Option<Arc<RateLimiter>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let upstream = SpacexClient::new(&config.upstream)?;
        let rate_limiter = config
            .rate_limit
            .enabled
            .then(|| Arc::new(RateLimiter::from_config(&config.rate_limit)));

        let state = AppState {
            upstream,
            default_limit: config.pagination.default_limit,
        };

        let router = Self::build_router(state, rate_limiter.clone());
        Ok(Self {
            router,
            config,
            rate_limiter,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState, rate_limiter: Option<Arc<RateLimiter>>) -> Router {
        let mut launches = get(list_launches);
        if let Some(limiter) = rate_limiter {
            launches = launches.route_layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
        }

        Router::new()
            .route("/launches", launches)
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id(request)
                        )
                    }))
                    .layer(propagate_request_id_layer())
                    .layer(CatchPanicLayer::custom(panic_response)),
            )
    }

    /// The fully layered router. Requests need a `ConnectInfo<SocketAddr>`
    /// extension when rate limiting is enabled.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            rate_limit_enabled = self.rate_limiter.is_some(),
            "HTTP server starting"
        );

        if let Some(limiter) = &self.rate_limiter {
            let every = Duration::from_secs(self.config.rate_limit.sweep_interval_secs);
            tokio::spawn(limiter.clone().run_sweeper(every, shutdown.resubscribe()));
        }

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;
    metrics::record_request(&method, &path, response.status().as_u16(), start);
    response
}
