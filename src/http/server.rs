//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router: `/healthz` plus every backend under `/proxy`
//! - Wire up middleware (request ID, CORS, access logging in debug mode)
//! - Own the shared application state handed to every handler
//! - Serve until the shutdown signal fires

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::client::build_client;
use crate::http::request::UuidRequestId;
use crate::routing;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-only configuration snapshot.
    pub config: Arc<GatewayConfig>,
    /// Shared outbound client for pass-through relays.
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let client = build_client(&config.outbound)?;
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl GatewayServer {
    /// Create a new HTTP server with the given configuration snapshot.
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let state = AppState::new(config)?;
        let config = state.config.clone();
        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(state: AppState) -> Router {
        let debug = state.config.server.debug;

        let router = Router::new()
            .route("/healthz", get(healthz))
            .nest("/proxy", routing::proxy_router())
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id());

        let router = if debug {
            router.layer(TraceLayer::new_for_http())
        } else {
            router
        };

        router
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(CorsLayer::permissive())
    }

    /// A clone of the router, for driving the gateway without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
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
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Liveness probe; independent of configuration state.
async fn healthz() -> &'static str {
    "OK"
}
