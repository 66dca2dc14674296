//! REST endpoint handlers organized by resource.

pub mod comment;
pub mod situation;
pub mod system;
pub mod vote;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(situation::routes())
        .merge(vote::routes())
        .merge(comment::routes())
}
