//! # cooked-board
//!
//! Backend for a small board where people post "situations", others vote
//! on whether the poster is `cooked` or `going_to_make_it`, and anyone can
//! comment or reply.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── Static shell + uploads (server)
//!     │
//!     ├── BoardService (service/)
//!     ├── Thread assembly (domain/)
//!     │
//!     ├── SqliteStore (persistence/sqlite)
//!     └── UploadStore (persistence/uploads)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod server;
pub mod service;
