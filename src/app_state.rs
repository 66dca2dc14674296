//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::BoardService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Board service for all business logic.
    pub board: Arc<BoardService>,
}

impl AppState {
    /// Wraps a service for sharing across handlers.
    #[must_use]
    pub fn new(board: BoardService) -> Self {
        Self {
            board: Arc::new(board),
        }
    }
}
