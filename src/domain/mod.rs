//! Domain layer: situations, comments, votes and thread assembly.
//!
//! These types are shared by the persistence layer (which builds them
//! from rows) and the REST layer (which serializes them as responses).

pub mod situation;
pub mod thread;
pub mod vote;

pub use situation::{Comment, Situation};
pub use thread::{ReplyNode, SituationThread, assemble_threads};
pub use vote::{VoteCounts, VoteKind};
