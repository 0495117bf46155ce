use crate::item_repository::ItemError;
use crate::services::ComparisonError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// Detail sent for every 5xx response.
pub const INTERNAL_DETAIL: &str = "Internal server error";

/// Errors returned by HTTP handlers. Rendered as `{"detail": "<message>"}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message sent to the client. Internal causes are only logged.
    fn detail(&self) -> String {
        match self {
            ApiError::Internal(_) => INTERNAL_DETAIL.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ItemError> for ApiError {
    fn from(e: ItemError) -> Self {
        match e {
            ItemError::Validation(msg) => ApiError::Unprocessable(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ComparisonError> for ApiError {
    fn from(e: ComparisonError) -> Self {
        match e {
            ComparisonError::InvalidIdCount { .. } => ApiError::Unprocessable(e.to_string()),
            ComparisonError::DuplicateIds => ApiError::BadRequest(e.to_string()),
            ComparisonError::ItemsNotFound(_) => ApiError::NotFound(e.to_string()),
            ComparisonError::Item(inner) => inner.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Unprocessable(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}
