//! Service layer: business logic orchestration.
//!
//! [`BoardService`] coordinates the SQLite store and the upload directory
//! on behalf of the REST handlers.

pub mod board_service;

pub use board_service::{BoardService, ImageUpload};
