//! Route handlers: health, create, lookup, listing.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use textstat_core::{resolve, PaginationMeta, RawPageQuery};
use textstat_storage::{SortField, SortSpec, TextFilter, TextRecord};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use super::error::{ApiError, ApiResponse, FieldError};
use super::state::AppState;
use super::validation::validate_create_text;

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// GET /health
pub(crate) async fn handle_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    let data = serde_json::json!({
        "timestamp": timestamp,
        "environment": state.environment,
    });
    (
        StatusCode::OK,
        Json(ApiResponse::ok(data).with_message("API is running successfully")),
    )
}

/// POST /texts
///
/// Stores a pending record, schedules its analysis and answers 201 without
/// waiting for it.
pub(crate) async fn handle_create_text(
    State(state): State<Arc<AppState>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected request body");
        ApiError::Validation(vec![FieldError::new("text", "Text is required")])
    })?;
    let text = validate_create_text(&body).map_err(ApiError::Validation)?;

    let record = state.store.insert(text).await?;
    tracing::info!(id = %record.id, "text created");
    state.worker.notify_created(record.id, record.text.clone());

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(record).with_message("Text created successfully")),
    ))
}

/// GET /texts/{id}
///
/// Only processed texts are visible; a pending one answers 404 exactly like
/// an unknown id.
pub(crate) async fn handle_get_text(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TextRecord>>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::InvalidId(id))?;
    match state.store.find_by_id(id).await? {
        Some(record) if record.done => Ok(Json(ApiResponse::ok(record))),
        _ => Err(ApiError::NotFound),
    }
}

/// GET /texts?done=&page=&limit=&orderBy=&order=
pub(crate) async fn handle_list_texts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<ApiResponse<Vec<TextRecord>>>, ApiError> {
    let filter = done_filter(&params);
    let spec = resolve(&RawPageQuery::from_pairs(params), &state.pagination);
    let sort = SortSpec::new(
        spec.sort_field().parse::<SortField>().unwrap_or_default(),
        spec.direction,
    );

    let total = state.store.count(&filter).await?;
    let records = state
        .store
        .find(&filter, &sort, spec.offset, spec.limit)
        .await?;

    let meta = PaginationMeta::new(spec.page, spec.limit, total);
    Ok(Json(ApiResponse::ok(records).with_meta(meta)))
}

/// `done=true` and `done=false` filter; any other value (or none) lists
/// every record. The last occurrence wins.
fn done_filter(params: &[(String, String)]) -> TextFilter {
    let value = params
        .iter()
        .rev()
        .find(|(key, _)| key == "done")
        .map(|(_, value)| value.as_str());
    match value {
        Some("true") => TextFilter::done(true),
        Some("false") => TextFilter::done(false),
        _ => TextFilter::all(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textstat_analyze::AnalysisWorker;
    use textstat_core::TextMetrics;
    use textstat_storage::{MemoryStore, TextStore};

    /// State whose worker is already stopped, so records stay pending until
    /// a test completes them.
    fn idle_state() -> (Arc<MemoryStore>, Arc<AppState>) {
        let store = Arc::new(MemoryStore::new());
        let worker = Arc::new(AnalysisWorker::start(store.clone(), 1));
        worker.shutdown();
        let state = AppState::new(store.clone(), worker, "test".to_string());
        (store, Arc::new(state))
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn done_filter_values() {
        assert_eq!(done_filter(&pairs(&[("done", "true")])), TextFilter::done(true));
        assert_eq!(
            done_filter(&pairs(&[("done", "false")])),
            TextFilter::done(false)
        );
        assert_eq!(done_filter(&pairs(&[("done", "yes")])), TextFilter::all());
        assert_eq!(done_filter(&pairs(&[("page", "2")])), TextFilter::all());
    }

    #[test]
    fn done_filter_last_value_wins() {
        let params = pairs(&[("done", "false"), ("done", "true")]);
        assert_eq!(done_filter(&params), TextFilter::done(true));
    }

    #[tokio::test]
    async fn pending_text_is_not_found_until_processed() {
        let (store, state) = idle_state();
        let record = store.insert("Still pending.".to_string()).await.unwrap();

        let pending = handle_get_text(State(state.clone()), Path(record.id.to_string())).await;
        match pending {
            Err(err) => {
                assert!(matches!(err, ApiError::NotFound));
                assert_eq!(err.status(), StatusCode::NOT_FOUND);
            }
            Ok(_) => panic!("pending record must not be visible"),
        }

        store
            .update_by_id(record.id, TextMetrics::compute(&record.text))
            .await
            .unwrap();
        let Json(body) = handle_get_text(State(state), Path(record.id.to_string()))
            .await
            .unwrap_or_else(|e| panic!("processed record not visible: {e}"));
        let found = body.data.expect("record in data");
        assert!(found.done);
        assert_eq!(found.metrics.number_of_sentences, 1);
    }

    #[tokio::test]
    async fn malformed_id_is_rejected_before_lookup() {
        let (_, state) = idle_state();
        let result = handle_get_text(State(state), Path("12345".to_string())).await;
        assert!(matches!(result, Err(ApiError::InvalidId(id)) if id == "12345"));
    }
}
