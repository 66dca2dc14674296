//! Board service: orchestrates uploads and store writes for every endpoint.

use axum::body::Bytes;

use crate::domain::{Comment, Situation, SituationThread, VoteCounts};
use crate::error::BoardError;
use crate::persistence::{SqliteStore, UploadStore};

/// An image part received with a new situation.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Filename as sent by the client.
    pub filename: String,
    /// Raw file contents.
    pub bytes: Bytes,
}

/// Orchestration layer for all board operations.
///
/// Owns the [`SqliteStore`] and [`UploadStore`] handles constructed at
/// startup. Handlers never touch either directly.
#[derive(Debug, Clone)]
pub struct BoardService {
    store: SqliteStore,
    uploads: UploadStore,
}

impl BoardService {
    /// Creates a new `BoardService`.
    #[must_use]
    pub fn new(store: SqliteStore, uploads: UploadStore) -> Self {
        Self { store, uploads }
    }

    /// Returns a reference to the inner [`UploadStore`].
    #[must_use]
    pub fn uploads(&self) -> &UploadStore {
        &self.uploads
    }

    /// Closes the database. Called after the server has drained.
    pub async fn close(&self) {
        self.store.close().await;
        tracing::info!("database closed");
    }

    /// Creates a situation, storing its image first when one is accepted.
    ///
    /// Images with an unsupported extension are dropped without error. If
    /// the insert fails, an image written for this request is removed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Storage`] if the image cannot be written and
    /// [`BoardError::Database`] if the insert fails.
    pub async fn create_situation(
        &self,
        text: &str,
        reply_to: Option<i64>,
        image: Option<ImageUpload>,
    ) -> Result<Situation, BoardError> {
        let image_path = match image {
            Some(upload) => self.uploads.save(&upload.filename, &upload.bytes).await?,
            None => None,
        };

        match self
            .store
            .insert_situation(text, image_path.as_deref(), reply_to)
            .await
        {
            Ok(situation) => {
                tracing::info!(
                    id = situation.id,
                    reply_to = ?situation.reply_to,
                    has_image = situation.image_path.is_some(),
                    "situation created"
                );
                Ok(situation)
            }
            Err(e) => {
                if let Some(name) = &image_path {
                    self.uploads.discard(name).await;
                }
                Err(e)
            }
        }
    }

    /// Records a vote and returns the updated counts for the situation.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Database`] on store failure.
    pub async fn cast_vote(
        &self,
        situation_id: i64,
        vote_type: &str,
    ) -> Result<VoteCounts, BoardError> {
        let counts = self.store.insert_vote(situation_id, vote_type).await?;
        tracing::debug!(situation_id, vote_type, "vote recorded");
        Ok(counts)
    }

    /// Returns the current vote counts for a situation.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Database`] on store failure.
    pub async fn vote_counts(&self, situation_id: i64) -> Result<VoteCounts, BoardError> {
        self.store.vote_counts(situation_id).await
    }

    /// Attaches a comment to a situation.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Database`] on store failure.
    pub async fn add_comment(&self, situation_id: i64, text: &str) -> Result<Comment, BoardError> {
        let comment = self.store.insert_comment(situation_id, text).await?;
        tracing::info!(id = comment.id, situation_id, "comment added");
        Ok(comment)
    }

    /// Returns the comments for a situation, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Database`] on store failure.
    pub async fn comments(&self, situation_id: i64) -> Result<Vec<Comment>, BoardError> {
        self.store.comments_for(situation_id).await
    }

    /// Returns every top-level situation as a thread.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Database`] on store failure.
    pub async fn threads(&self) -> Result<Vec<SituationThread>, BoardError> {
        self.store.load_threads().await
    }
}
