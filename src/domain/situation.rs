//! Stored situations and their comments.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// A user-submitted post, optionally a reply to another situation.
///
/// Serialized as the body of `POST /situations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Situation {
    /// Surrogate key, monotonically increasing and never reused.
    pub id: i64,
    /// Free text of the post.
    pub text: String,
    /// Filename of the attached image inside the upload directory.
    pub image_path: Option<String>,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Id of the situation this one replies to. `None` for top-level posts.
    pub reply_to: Option<i64>,
}

impl Situation {
    /// Returns `true` if this situation is a top-level post.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.reply_to.is_none()
    }
}

/// Free-text annotation attached to a situation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Comment {
    /// Surrogate key.
    pub id: i64,
    /// Comment body.
    pub text: String,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Situation the comment is attached to. Not checked for existence.
    pub situation_id: i64,
}
