use std::sync::Arc;

use crate::analysis::session::SessionManager;
use crate::files::store::FileStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once in `main`; tests build it around a fake assistant backend.
#[derive(Clone)]
pub struct AppState {
    pub store: FileStore,
    pub sessions: Arc<SessionManager>,
}
