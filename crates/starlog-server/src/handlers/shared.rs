//! Shared handler utilities.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use starlog_core::StarlogError;
use tracing::{debug, error};

/// Library error rendered as `{"success": false, "error": ...}`.
#[derive(Debug)]
pub struct ApiError(pub StarlogError);

impl From<StarlogError> for ApiError {
    fn from(err: StarlogError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else if self.0.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            debug!("Rejected request: {}", self.0);
        }
        let body = json!({
            "success": false,
            "error": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

/// Extract a required, non-blank query parameter or return an error.
pub(crate) fn require_param(value: Option<String>, name: &str) -> Result<String, ApiError> {
    match value {
        None => Err(ApiError(StarlogError::InvalidParams {
            message: format!("Missing required parameter: {}", name),
        })),
        Some(v) if v.trim().is_empty() => Err(ApiError(StarlogError::Validation {
            field: name.to_string(),
            message: "must not be empty".to_string(),
        })),
        Some(v) => Ok(v),
    }
}
