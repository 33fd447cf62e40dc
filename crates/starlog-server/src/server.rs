//! HTTP server implementation using Axum.

use crate::handlers::{
    handle_get_commits, handle_get_saved, handle_health, handle_remove, handle_save,
    handle_search, handle_search_saved,
};
use axum::{routing::get, Router};
use starlog_core::CommitService;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Application state shared across handlers.
pub struct AppState {
    pub service: CommitService,
}

/// Build the router for `service`.
///
/// When `static_dir` is set, unmatched paths are served from it, falling back
/// to its `index.html`.
pub fn build_router(service: CommitService, static_dir: Option<&Path>) -> Router {
    let state = Arc::new(AppState { service });

    // Configure CORS for the browser client
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/health", get(handle_health))
        .route("/commits", get(handle_get_commits))
        .route("/commits/save", get(handle_save))
        .route("/commits/remove", get(handle_remove))
        .route("/commits/search", get(handle_search))
        .route("/commits/saved", get(handle_get_saved))
        .route("/commits/search-saved", get(handle_search_saved))
        .with_state(state);

    if let Some(dir) = static_dir {
        let index = dir.join("index.html");
        app = app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    app.layer(TraceLayer::new_for_http()).layer(cors)
}

/// Start the HTTP server.
///
/// Returns the actual address the server is bound to (useful when port=0).
pub async fn start_server(
    service: CommitService,
    static_dir: Option<PathBuf>,
    host: &str,
    port: u16,
) -> anyhow::Result<SocketAddr> {
    let app = build_router(service, static_dir.as_deref());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("Server listening on {}", actual_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    Ok(actual_addr)
}
