//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use botrent_types::error::TrialError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Trial lookups and bot id parsing.
    Trial(TrialError),
    /// Malformed request body or parameters.
    Validation(String),
}

impl From<TrialError> for AppError {
    fn from(e: TrialError) -> Self {
        AppError::Trial(e)
    }
}

impl AppError {
    /// Status code and machine-readable error code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Trial(TrialError::NotFound(_)) => (StatusCode::NOT_FOUND, "TRIAL_NOT_FOUND"),
            AppError::Trial(TrialError::InvalidBotId(_)) | AppError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Trial(e) => e.to_string(),
            AppError::Validation(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.message();
        tracing::debug!(code, %message, "Request rejected");

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
