//! Commit listing, starring and search handlers.

use super::shared::{require_param, ApiError};
use crate::server::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use starlog_core::CommitRecord;
use std::sync::Arc;

/// Query string accepted by the `/commits` routes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitsQuery {
    pub repo_owner: Option<String>,
    pub repo_name: Option<String>,
    pub commit_id: Option<String>,
    pub message: Option<String>,
    pub search_query: Option<String>,
}

impl CommitsQuery {
    fn repo(&self) -> Result<(String, String), ApiError> {
        Ok((
            require_param(self.repo_owner.clone(), "repoOwner")?,
            require_param(self.repo_name.clone(), "repoName")?,
        ))
    }

    fn commit_id(&self) -> Result<String, ApiError> {
        require_param(self.commit_id.clone(), "commitId")
    }
}

type ListResult = Result<Json<Vec<CommitRecord>>, ApiError>;

/// `GET /commits?repoName&repoOwner`
pub async fn handle_get_commits(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CommitsQuery>,
) -> ListResult {
    let (owner, name) = query.repo()?;
    Ok(Json(state.service.get_repo_commits(&owner, &name).await))
}

/// `GET /commits/save?commitId&repoName&repoOwner`
pub async fn handle_save(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CommitsQuery>,
) -> Result<Json<Value>, ApiError> {
    let commit_id = query.commit_id()?;
    let (owner, name) = query.repo()?;
    state.service.save(&commit_id, &owner, &name).await?;
    Ok(Json(json!({"success": true})))
}

/// `GET /commits/remove?commitId&repoName&repoOwner`
pub async fn handle_remove(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CommitsQuery>,
) -> Result<Json<Value>, ApiError> {
    let commit_id = query.commit_id()?;
    let (owner, name) = query.repo()?;
    state.service.remove(&commit_id, &owner, &name).await?;
    Ok(Json(json!({"success": true})))
}

/// `GET /commits/search?repoName&repoOwner&message`
pub async fn handle_search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CommitsQuery>,
) -> ListResult {
    let (owner, name) = query.repo()?;
    Ok(Json(
        state
            .service
            .search(&owner, &name, query.message.as_deref())
            .await,
    ))
}

/// `GET /commits/saved`
pub async fn handle_get_saved(State(state): State<Arc<AppState>>) -> ListResult {
    Ok(Json(state.service.get_saved_commits().await?))
}

/// `GET /commits/search-saved?searchQuery`
pub async fn handle_search_saved(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CommitsQuery>,
) -> ListResult {
    Ok(Json(
        state
            .service
            .search_saved(query.search_query.as_deref())
            .await?,
    ))
}
