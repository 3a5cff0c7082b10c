//! # REST API Errors
//!
//! Error types for the JSON API. Each error maps to an HTTP status and a
//! JSON body of the form `{"detail": "..."}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// REST API errors
#[derive(Debug, Clone, Error)]
pub enum RestError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Malformed or non-positive query parameter value
    #[error("Invalid query parameter {name}: {value:?}")]
    InvalidParam { name: String, value: String },

    /// Query parameter that is neither a filter nor a pagination knob
    #[error("Unknown query parameter: {0}")]
    UnknownParam(String),

    /// Requested page size or limit above the maximum
    #[error("Requested {0} rows; maximum is {1}")]
    LimitExceeded(u32, u32),

    /// Resource not found
    #[error("Airport not found")]
    NotFound,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// The store holds no data yet
    #[error("Dataset not ready: {0}")]
    DatasetNotReady(String),

    /// Store failure during query execution
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RestError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::InvalidParam { .. } => StatusCode::BAD_REQUEST,
            RestError::UnknownParam(_) => StatusCode::BAD_REQUEST,
            RestError::LimitExceeded(_, _) => StatusCode::BAD_REQUEST,
            RestError::NotFound => StatusCode::NOT_FOUND,
            RestError::DatasetNotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            RestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<StoreError> for RestError {
    fn from(e: StoreError) -> Self {
        RestError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RestError::UnknownParam("foo".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(RestError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            RestError::DatasetNotReady("empty store".to_string()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            RestError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_detail_message() {
        let err = RestError::UnknownParam("colour".to_string());
        assert_eq!(err.to_string(), "Unknown query parameter: colour");
    }
}
