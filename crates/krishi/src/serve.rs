// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `krishi serve` command implementation.
//!
//! Wires storage, the model provider, the agent pipeline and the HTTP
//! gateway together, then serves until SIGINT or SIGTERM.

use std::sync::Arc;

use krishi_agent::Orchestrator;
use krishi_config::KrishiConfig;
use krishi_core::{KrishiError, ModelProvider, PluginAdapter, TransactionStore};
use krishi_gateway::{GatewayState, ServerConfig};
use krishi_openai::OpenAiProvider;
use krishi_storage::SqliteStore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runs the `krishi serve` command.
pub async fn run_serve(config: KrishiConfig) -> Result<(), KrishiError> {
    init_tracing(&config.service.log_level);

    info!(
        name = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        "starting krishi"
    );

    let store = Arc::new(SqliteStore::new(config.storage.clone()));
    store.initialize().await?;
    info!(path = %config.storage.database_path, "storage initialized");

    let provider = OpenAiProvider::new(&config.model)?;
    info!(
        model = %config.model.model,
        base_url = %config.model.base_url,
        "model provider ready"
    );
    let provider: Arc<dyn ModelProvider> = Arc::new(provider);

    let transactions: Arc<dyn TransactionStore> = store.clone();
    let orchestrator = Arc::new(Orchestrator::from_config(
        provider,
        transactions,
        &config.model,
    ));
    let state = GatewayState::new(orchestrator, config.service.name.clone());

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let shutdown = install_signal_handler();
    let served = krishi_gateway::start_server(&server_config, state, shutdown).await;

    // Checkpoint even when the server failed to start.
    if let Err(e) = store.shutdown().await {
        warn!(error = %e, "storage shutdown failed");
    }
    served?;

    info!("krishi stopped");
    Ok(())
}

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal arrives.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => {
                            info!("received SIGINT (Ctrl+C), initiating shutdown");
                        }
                        _ = sigterm.recv() => {
                            info!("received SIGTERM, initiating shutdown");
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to install SIGTERM handler, waiting for Ctrl+C only");
                    let _ = ctrl_c.await;
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

/// Initialize the tracing subscriber with the configured log level.
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("krishi={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
