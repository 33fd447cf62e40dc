//! Starlog Server - HTTP backend for browsing and starring repository commits.
//!
//! Exposes the `starlog-core` commit service over a small JSON API and can
//! host the single-page client from a static directory.

pub mod handlers;
pub mod server;

pub use server::{build_router, start_server, AppState};
