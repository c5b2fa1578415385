//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all proxy handler
//! - Classify each request and dispatch: release-asset paths go to the
//!   resolver, everything else is authenticated and forwarded
//! - Log every outcome; a failing request never terminates the process

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::auth::authenticate;
use crate::config::ProxyConfig;
use crate::error::HubbardError;
use crate::http::forward::Forwarder;
use crate::routing::{classify, RequestCategory};
use crate::upstream::{releases, UpstreamClient};

/// Application state injected into the handler. Everything here is
/// read-only after construction; the API client memoizes itself behind a
/// once-cell on first use.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub upstream: Arc<UpstreamClient>,
    pub forwarder: Arc<Forwarder>,
}

/// HTTP server for the authenticating proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new server from the loaded configuration. Fails when the
    /// configured upstream URL cannot be parsed.
    pub fn new(config: ProxyConfig) -> Result<Self, HubbardError> {
        let forwarder = Forwarder::new(config.upstream.github_url())?;
        let upstream = UpstreamClient::new(config.upstream.clone());

        let state = AppState {
            config: Arc::new(config),
            upstream: Arc::new(upstream),
            forwarder: Arc::new(forwarder),
        };

        Ok(Self {
            router: Self::build_router(state),
        })
    }

    /// Build the Axum router with the catch-all handler and middleware.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(handle))
            .route("/", any(handle))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Top-level handler: classify, then dispatch.
async fn handle(State(state): State<AppState>, request: Request<Body>) -> Response {
    let path = request.uri().path().to_string();
    tracing::info!(path = %path, "handling request");

    match classify(&path) {
        RequestCategory::ReleaseAsset(asset) => {
            match releases::resolve(&state.upstream, &asset).await {
                Ok(response) => response,
                Err(err) => {
                    tracing::error!(path = %path, error = %err, "release asset resolution failed");
                    err.into_response()
                }
            }
        }
        category => match proxy_request(&state, category, request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(path = %path, error = %err, "proxying failed");
                err.into_response()
            }
        },
    }
}

/// Authenticate (by category) and forward a non-release request.
async fn proxy_request(
    state: &AppState,
    category: RequestCategory,
    request: Request<Body>,
) -> Result<Response, HubbardError> {
    tracing::debug!(
        upstream = %state.config.upstream.github_url(),
        category = ?category,
        "proxying request"
    );

    let (mut parts, body) = request.into_parts();
    authenticate(&mut parts.headers, &category, &state.config.upstream)?;

    state
        .forwarder
        .forward(Request::from_parts(parts, body))
        .await
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
