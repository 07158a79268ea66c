// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use krishi_agent::{LexicalTranslator, Orchestrator};
use krishi_core::{KrishiError, TransactionStore};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The query pipeline.
    pub orchestrator: Arc<Orchestrator>,
    /// Store used for record lookups.
    pub store: Arc<dyn TransactionStore>,
    /// Translator behind `/api/translate`.
    pub translator: Arc<LexicalTranslator>,
    /// Service name reported by the health endpoint.
    pub service_name: String,
}

impl GatewayState {
    /// State sharing the orchestrator's own store and translator.
    pub fn new(orchestrator: Arc<Orchestrator>, service_name: impl Into<String>) -> Self {
        Self {
            store: orchestrator.store().clone(),
            translator: orchestrator.translator().clone(),
            orchestrator,
            service_name: service_name.into(),
        }
    }
}

/// Listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the application router with CORS and request tracing.
pub fn build_router(state: GatewayState) -> Router {
    let api_routes = Router::new()
        .route("/api/health", get(handlers::get_health))
        .route("/api/farmer-query", post(handlers::post_farmer_query))
        .route("/api/translate", post(handlers::post_translate))
        .route("/api/queries/{id}", get(handlers::get_query))
        .with_state(state);

    Router::new()
        .route("/", get(handlers::get_root))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve until `shutdown` is cancelled.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), KrishiError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| KrishiError::Internal(format!("failed to bind HTTP server to {addr}: {e}")))?;

    let local = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or(addr);
    tracing::info!("Krishi Officer API listening on {local}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| KrishiError::Internal(format!("HTTP server error: {e}")))?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
