//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::engine::WaitlistEngine;
use crate::services::ProposalStore;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for course and enrollment data
    pub repository: Arc<dyn FullRepository>,
    /// Engine bound to the configured grid and selector
    pub engine: Arc<WaitlistEngine>,
    /// Last computed proposals per course
    pub proposals: ProposalStore,
}

impl AppState {
    pub fn new(repository: Arc<dyn FullRepository>, engine: WaitlistEngine) -> Self {
        Self {
            repository,
            engine: Arc::new(engine),
            proposals: ProposalStore::new(),
        }
    }

    /// State with a default-configured engine.
    pub fn with_repository(repository: Arc<dyn FullRepository>) -> Self {
        Self::new(repository, WaitlistEngine::default())
    }
}
