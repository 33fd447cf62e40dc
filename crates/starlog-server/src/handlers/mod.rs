//! HTTP request handlers.

mod commits;
mod shared;

pub use commits::{
    handle_get_commits, handle_get_saved, handle_remove, handle_save, handle_search,
    handle_search_saved,
};
pub use shared::ApiError;

use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}
