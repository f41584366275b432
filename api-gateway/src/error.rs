//! Error handling for the API gateway

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error information
    pub error: ErrorInfo,
    /// Request ID for tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Detailed error information
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code (string identifier for the error type)
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Common(#[from] common::error::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    /// Status code and error code reported to the client
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        use common::error::Error;

        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Common(e) => match e {
                // Client errors (4xx)
                Error::AccountNotFound(_) => (StatusCode::NOT_FOUND, "account_not_found"),
                Error::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
                Error::ConcurrentModification(_) => (StatusCode::CONFLICT, "concurrent_modification"),
                Error::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_error"),

                // Server errors (5xx)
                Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
                Error::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
                Error::Migration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "migration_error"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Generate a request ID for tracking errors
        let request_id = Uuid::new_v4().to_string();
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!("API Error [{}]: {:?}", request_id, &self);
        } else {
            tracing::warn!("API Error [{}]: {}", request_id, &self);
        }

        let details = match &self {
            ApiError::Common(common::error::Error::Database(e)) => Some(serde_json::json!({
                "code": e.as_database_error().and_then(|dbe| dbe.code().map(|c| c.to_string())),
            })),
            _ => None,
        };

        let error_response = ErrorResponse {
            error: ErrorInfo {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
            request_id: Some(request_id),
        };

        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::error::Error;

    #[test]
    fn business_errors_map_to_client_statuses() {
        let cases = [
            (Error::account_not_found(), StatusCode::NOT_FOUND),
            (Error::Conflict("insufficient balance".into()), StatusCode::CONFLICT),
            (Error::ConcurrentModification("stale".into()), StatusCode::CONFLICT),
            (Error::ValidationError("bad".into()), StatusCode::BAD_REQUEST),
            (Error::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError::Common(error).status_and_code().0, expected);
        }
    }

    #[test]
    fn business_messages_are_verbatim() {
        let err = ApiError::Common(Error::Conflict("account not active".into()));
        assert_eq!(err.to_string(), "account not active");
    }
}
