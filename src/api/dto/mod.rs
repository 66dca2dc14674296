//! Data Transfer Objects for REST request decoding.
//!
//! Response bodies are the domain types themselves; only the request side
//! needs dedicated DTOs.

pub mod comment_dto;
pub mod common_dto;
pub mod situation_dto;
pub mod vote_dto;

pub use comment_dto::*;
pub use common_dto::*;
pub use situation_dto::*;
pub use vote_dto::*;
