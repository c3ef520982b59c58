//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::ProductRepository;

/// Shared application state passed to all handlers.
///
/// Built once in `main` and handed to [`create_router`](super::create_router).
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn ProductRepository>,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }
}
