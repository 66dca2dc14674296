//! Comment request DTO.

use serde::Deserialize;
use utoipa::ToSchema;

use super::common_dto::{lenient_id, lenient_string};
use crate::error::BoardError;

/// Request body for `POST /comments`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CommentRequest {
    /// Situation the comment belongs to. Numeric strings are accepted.
    #[serde(default, deserialize_with = "lenient_id")]
    pub situation_id: Option<i64>,
    /// Comment body. May be empty.
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: Option<String>,
}

impl CommentRequest {
    /// Returns `(situation_id, text)`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MissingField`] naming the first absent field.
    /// This surfaces as a 500, unlike the 400 of `POST /vote`.
    pub fn into_parts(self) -> Result<(i64, String), BoardError> {
        let situation_id = self
            .situation_id
            .ok_or(BoardError::MissingField("situation_id"))?;
        let text = self.text.ok_or(BoardError::MissingField("text"))?;
        Ok((situation_id, text))
    }
}
