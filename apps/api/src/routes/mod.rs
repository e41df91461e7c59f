pub mod health;
pub mod pages;

use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::analysis::handlers as analysis;
use crate::files::handlers as files;
use crate::state::AppState;

pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(pages::index_handler))
        .route("/health", get(health::health_handler))
        .route("/upload/:file_type", post(files::handle_upload))
        .route("/files", get(files::handle_list_files))
        .route("/analyze", post(analysis::handle_analyze))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}
