//! `textstat serve` -- HTTP JSON API for submitting and reading texts.
//!
//! Built on `axum` + `tokio`. Submitted texts are stored immediately and
//! analyzed in the background by a [`textstat_analyze::AnalysisWorker`].
//!
//! Endpoints:
//! - GET  /health      - Server status
//! - POST /texts       - Submit a text (201, analysis runs asynchronously)
//! - GET  /texts/{id}  - A processed text (404 while still pending)
//! - GET  /texts       - Paginated listing, filterable by `done`
//!
//! The text routes are also served under `/api`.
//!
//! All responses use Content-Type: application/json and share the
//! `{success, data, message, errors, meta}` envelope.

mod error;
mod handlers;
mod state;
mod validation;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::routing::get;
use axum::Router;
use textstat_analyze::AnalysisWorker;
use textstat_storage::{MemoryStore, TextStore};
use tower_http::cors::{Any, CorsLayer};

use self::handlers::{
    handle_create_text, handle_get_text, handle_health, handle_list_texts, handle_not_found,
};
pub(crate) use self::state::AppState;

/// Maximum request body size: 10 MB.
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Environment name reported by `/health` when `TEXTSTAT_ENV` is unset.
const DEFAULT_ENVIRONMENT: &str = "development";

/// Settings for one server run.
#[derive(Debug, Clone)]
pub(crate) struct ServeConfig {
    pub(crate) port: u16,
    /// Number of analysis consumer tasks.
    pub(crate) workers: usize,
    pub(crate) environment: String,
}

impl ServeConfig {
    /// Combine CLI flags with settings read from the environment.
    pub(crate) fn from_env(port: u16, workers: usize) -> Self {
        let environment = std::env::var("TEXTSTAT_ENV")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
        Self {
            port,
            workers: workers.max(1),
            environment,
        }
    }
}

/// Build the application router over shared state.
pub(crate) fn router(state: Arc<AppState>) -> Router {
    // CORS: permissive; the API carries no credentials.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let texts = Router::new()
        .route("/texts", get(handle_list_texts).post(handle_create_text))
        .route("/texts/{id}", get(handle_get_text));

    Router::new()
        .route("/health", get(handle_health))
        .merge(texts.clone())
        .nest("/api", texts)
        .fallback(handle_not_found)
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}

/// Start the HTTP server and the analysis worker, and run until SIGINT or
/// SIGTERM.
///
/// Shutdown order: the worker stops accepting and writing first, then the
/// server drains open connections, then the worker's consumers are joined.
pub(crate) async fn start_server(config: ServeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn TextStore> = Arc::new(MemoryStore::new());
    let worker = Arc::new(AnalysisWorker::start(Arc::clone(&store), config.workers));
    let state = Arc::new(AppState::new(
        store,
        Arc::clone(&worker),
        config.environment.clone(),
    ));

    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        %addr,
        environment = %config.environment,
        workers = config.workers,
        "textstat listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(Arc::clone(&worker)))
        .await?;

    worker.join().await;
    tracing::info!("server shut down");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM, then stop the analysis worker.
async fn shutdown_signal(worker: Arc<AnalysisWorker>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("received shutdown signal");
    worker.shutdown();
}
