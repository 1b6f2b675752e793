//! Application state shared across request handlers.

use std::sync::Arc;

use textstat_analyze::AnalysisWorker;
use textstat_core::pagination::{PaginationOptions, SortDirection};
use textstat_storage::{SortField, TextStore};

/// Application state shared across request handlers.
pub(crate) struct AppState {
    pub(crate) store: Arc<dyn TextStore>,
    /// Receives a notification for every created text.
    pub(crate) worker: Arc<AnalysisWorker>,
    /// Resolver settings for `GET /texts`.
    pub(crate) pagination: PaginationOptions,
    /// Deployment name reported by `/health`.
    pub(crate) environment: String,
}

impl AppState {
    pub(crate) fn new(
        store: Arc<dyn TextStore>,
        worker: Arc<AnalysisWorker>,
        environment: String,
    ) -> Self {
        Self {
            store,
            worker,
            pagination: listing_options(),
            environment,
        }
    }
}

/// Newest first by default; sortable by either timestamp.
fn listing_options() -> PaginationOptions {
    PaginationOptions::new(SortField::NAMES, SortField::CreatedAt.as_str())
        .with_default_direction(SortDirection::Desc)
}
