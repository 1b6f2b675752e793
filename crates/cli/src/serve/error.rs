//! Response envelope and the error taxonomy of the HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use textstat_storage::StorageError;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct FieldError {
    pub(crate) field: String,
    pub(crate) message: String,
}

impl FieldError {
    pub(crate) fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// The `{success, data, message, errors, meta}` body shared by every route.
#[derive(Debug, Serialize)]
pub(crate) struct ApiResponse<T: Serialize> {
    pub(crate) success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) meta: Option<serde_json::Value>,
}

impl<T: Serialize> ApiResponse<T> {
    pub(crate) fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: None,
        }
    }

    pub(crate) fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub(crate) fn with_meta(mut self, meta: impl Serialize) -> Self {
        self.meta = serde_json::to_value(meta).ok();
        self
    }
}

impl ApiResponse<()> {
    pub(crate) fn failure(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
            errors: None,
            meta: None,
        }
    }

    pub(crate) fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// Everything a handler can fail with.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("invalid id format: {0}")]
    InvalidId(String),

    /// Unknown id, or a text whose analysis has not finished.
    #[error("text not found")]
    NotFound,

    #[error("route not found")]
    RouteNotFound,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(StorageError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Storage(StorageError::Duplicate { .. }) => StatusCode::CONFLICT,
            ApiError::Storage(StorageError::Backend(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(self) -> ApiResponse<()> {
        match self {
            ApiError::Validation(errors) => {
                ApiResponse::failure("Validation failed").with_errors(errors)
            }
            ApiError::InvalidId(_) => ApiResponse::failure("Invalid ID format"),
            ApiError::NotFound | ApiError::Storage(StorageError::NotFound { .. }) => {
                ApiResponse::failure("Text not found")
            }
            ApiError::RouteNotFound => ApiResponse::failure("Route not found"),
            ApiError::Storage(StorageError::Duplicate { field }) => {
                let message = format!("{field} already exists");
                ApiResponse::failure("Duplicate entry")
                    .with_errors(vec![FieldError::new(&field, message)])
            }
            ApiError::Storage(StorageError::Backend(detail)) => {
                tracing::error!(error = %detail, "storage failure while handling request");
                ApiResponse::failure("Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.body())).into_response()
    }
}
