//! Persistence layer: SQLite tables and the upload directory.
//!
//! [`SqliteStore`] owns the `sqlx::SqlitePool` for situations, votes and
//! comments. [`UploadStore`] owns the directory that attached images are
//! written to.

pub mod sqlite;
pub mod uploads;

pub use sqlite::SqliteStore;
pub use uploads::UploadStore;
