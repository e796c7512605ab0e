//! State shared by every handler.

use std::sync::Arc;

use crate::db::repository::FullRepository;

/// Built once in `main` and cloned per request; the repository (and its
/// connection pool) lives as long as the last clone.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend chosen at startup.
    pub repository: Arc<dyn FullRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self { repository }
    }
}
