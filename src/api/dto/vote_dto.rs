//! Vote request DTO.

use serde::Deserialize;
use utoipa::ToSchema;

use super::common_dto::{lenient_id, lenient_string};
use crate::error::BoardError;

/// Request body for `POST /vote`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct VoteRequest {
    /// Situation to vote on. Numeric strings are accepted.
    #[serde(default, deserialize_with = "lenient_id")]
    pub post_id: Option<i64>,
    /// `cooked` or `going_to_make_it`; any other string is stored but not
    /// counted.
    #[serde(default, deserialize_with = "lenient_string")]
    pub vote_type: Option<String>,
}

impl VoteRequest {
    /// Returns `(post_id, vote_type)` when both are present and non-empty.
    ///
    /// A `post_id` of `0` counts as missing.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MissingVoteFields`] otherwise.
    pub fn into_parts(self) -> Result<(i64, String), BoardError> {
        match (
            self.post_id.filter(|id| *id != 0),
            self.vote_type.filter(|t| !t.is_empty()),
        ) {
            (Some(post_id), Some(vote_type)) => Ok((post_id, vote_type)),
            _ => Err(BoardError::MissingVoteFields),
        }
    }
}
