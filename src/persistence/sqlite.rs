//! SQLite implementation of the persistence layer.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::config::BoardConfig;
use crate::domain::{Comment, Situation, SituationThread, VoteCounts, VoteKind, assemble_threads};
use crate::error::BoardError;

type SituationRow = (i64, String, Option<String>, DateTime<Utc>, Option<i64>);
type CommentRow = (i64, String, DateTime<Utc>, i64);

/// Ids of every situation `GET /situations` materializes: roots and their
/// direct replies.
const VISIBLE_SITUATIONS: &str = "SELECT id FROM situations WHERE reply_to IS NULL \
     OR reply_to IN (SELECT id FROM situations WHERE reply_to IS NULL)";

const VOTE_COUNTS: &str = "SELECT vote_type, COUNT(*) FROM votes \
     WHERE situation_id = $1 AND vote_type IN ($2, $3) GROUP BY vote_type";

/// SQLite-backed store for situations, votes and comments.
///
/// Cheap to clone; every clone shares the same connection pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a store over an existing pool. Does not run migrations.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens the database described by `config` and applies migrations.
    ///
    /// The database file is created if it does not exist. Foreign keys are
    /// left unenforced so votes and comments may reference unknown ids.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Database`] if the URL is invalid or the pool
    /// cannot connect, and [`BoardError::Migration`] if the schema cannot
    /// be applied.
    pub async fn connect(config: &BoardConfig) -> Result<Self, BoardError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .foreign_keys(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect_with(options)
            .await?;

        let store = Self::new(pool);
        store.migrate().await?;
        info!(url = %config.database_url, "database ready");
        Ok(store)
    }

    /// Closes the pool once checked-out connections are returned. Later
    /// queries fail with [`sqlx::Error::PoolClosed`].
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Opens a private in-memory database with the schema applied.
    ///
    /// Uses a single long-lived connection so every query sees the same
    /// database.
    ///
    /// # Errors
    ///
    /// Returns a [`BoardError`] if the connection or migration fails.
    pub async fn in_memory() -> Result<Self, BoardError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(false);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Applies pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Migration`] on failure.
    pub async fn migrate(&self) -> Result<(), BoardError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Inserts a situation and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Database`] on failure; the transaction is
    /// rolled back.
    pub async fn insert_situation(
        &self,
        text: &str,
        image_path: Option<&str>,
        reply_to: Option<i64>,
    ) -> Result<Situation, BoardError> {
        let created_at = Utc::now();
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO situations (text, image_path, created_at, reply_to) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(text)
        .bind(image_path)
        .bind(created_at)
        .bind(reply_to)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Situation {
            id,
            text: text.to_string(),
            image_path: image_path.map(str::to_string),
            created_at,
            reply_to,
        })
    }

    /// Records a vote and returns the situation's updated counts.
    ///
    /// Any `vote_type` string is stored; only recognized kinds are counted.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Database`] on failure; the transaction is
    /// rolled back.
    pub async fn insert_vote(
        &self,
        situation_id: i64,
        vote_type: &str,
    ) -> Result<VoteCounts, BoardError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO votes (situation_id, vote_type, created_at) VALUES ($1, $2, $3)")
            .bind(situation_id)
            .bind(vote_type)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        let counts = count_votes(&mut tx, situation_id).await?;
        tx.commit().await?;
        Ok(counts)
    }

    /// Returns the vote counts for a situation. Unknown ids yield zeros.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Database`] on failure.
    pub async fn vote_counts(&self, situation_id: i64) -> Result<VoteCounts, BoardError> {
        let mut conn = self.pool.acquire().await?;
        count_votes(&mut conn, situation_id).await
    }

    /// Inserts a comment and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Database`] on failure; the transaction is
    /// rolled back.
    pub async fn insert_comment(&self, situation_id: i64, text: &str) -> Result<Comment, BoardError> {
        let created_at = Utc::now();
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO comments (situation_id, text, created_at) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(situation_id)
        .bind(text)
        .bind(created_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Comment {
            id,
            text: text.to_string(),
            created_at,
            situation_id,
        })
    }

    /// Returns the comments for a situation, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Database`] on failure.
    pub async fn comments_for(&self, situation_id: i64) -> Result<Vec<Comment>, BoardError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            "SELECT id, text, created_at, situation_id FROM comments \
             WHERE situation_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(situation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(comment_from_row).collect())
    }

    /// Loads every top-level situation with its votes, comments and direct
    /// replies.
    ///
    /// Runs four queries regardless of how many situations exist: roots,
    /// replies, grouped vote counts and comments.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Database`] on failure.
    pub async fn load_threads(&self) -> Result<Vec<SituationThread>, BoardError> {
        let mut tx = self.pool.begin().await?;

        let roots = sqlx::query_as::<_, SituationRow>(
            "SELECT id, text, image_path, created_at, reply_to FROM situations \
             WHERE reply_to IS NULL ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&mut *tx)
        .await?;

        let replies = sqlx::query_as::<_, SituationRow>(
            "SELECT id, text, image_path, created_at, reply_to FROM situations \
             WHERE reply_to IN (SELECT id FROM situations WHERE reply_to IS NULL) \
             ORDER BY id ASC",
        )
        .fetch_all(&mut *tx)
        .await?;

        let vote_rows = sqlx::query_as::<_, (i64, String, i64)>(&format!(
            "SELECT situation_id, vote_type, COUNT(*) FROM votes \
             WHERE vote_type IN ($1, $2) \
             AND situation_id IN ({VISIBLE_SITUATIONS}) \
             GROUP BY situation_id, vote_type"
        ))
        .bind(VoteKind::Cooked.as_str())
        .bind(VoteKind::GoingToMakeIt.as_str())
        .fetch_all(&mut *tx)
        .await?;

        let comment_rows = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT id, text, created_at, situation_id FROM comments \
             WHERE situation_id IN ({VISIBLE_SITUATIONS}) \
             ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut votes: HashMap<i64, VoteCounts> = HashMap::new();
        for (situation_id, vote_type, count) in vote_rows {
            votes.entry(situation_id).or_default().record(&vote_type, count);
        }

        Ok(assemble_threads(
            roots.into_iter().map(situation_from_row).collect(),
            replies.into_iter().map(situation_from_row).collect(),
            &votes,
            comment_rows.into_iter().map(comment_from_row).collect(),
        ))
    }
}

async fn count_votes(
    conn: &mut SqliteConnection,
    situation_id: i64,
) -> Result<VoteCounts, BoardError> {
    let rows = sqlx::query_as::<_, (String, i64)>(VOTE_COUNTS)
        .bind(situation_id)
        .bind(VoteKind::Cooked.as_str())
        .bind(VoteKind::GoingToMakeIt.as_str())
        .fetch_all(conn)
        .await?;

    let mut counts = VoteCounts::default();
    for (vote_type, count) in rows {
        counts.record(&vote_type, count);
    }
    Ok(counts)
}

fn situation_from_row((id, text, image_path, created_at, reply_to): SituationRow) -> Situation {
    Situation {
        id,
        text,
        image_path,
        created_at,
        reply_to,
    }
}

fn comment_from_row((id, text, created_at, situation_id): CommentRow) -> Comment {
    Comment {
        id,
        text,
        created_at,
        situation_id,
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    async fn store() -> SqliteStore {
        let Ok(store) = SqliteStore::in_memory().await else {
            panic!("in-memory store failed");
        };
        store
    }

    async fn post(store: &SqliteStore, text: &str, reply_to: Option<i64>) -> Situation {
        let Ok(situation) = store.insert_situation(text, None, reply_to).await else {
            panic!("insert failed");
        };
        situation
    }

    #[tokio::test]
    async fn situation_ids_increase() {
        let store = store().await;
        let a = post(&store, "rent due tomorrow", None).await;
        let b = post(&store, "car broke down", None).await;
        let c = post(&store, "same", Some(a.id)).await;

        assert_eq!(a.id, 1);
        assert!(b.id > a.id);
        assert!(c.id > b.id);
        assert_eq!(a.image_path, None);
        assert_eq!(a.reply_to, None);
        assert_eq!(c.reply_to, Some(a.id));
    }

    #[tokio::test]
    async fn vote_counts_track_each_kind() {
        let store = store().await;
        let s = post(&store, "exam in an hour", None).await;

        for _ in 0..3 {
            let _ = store.insert_vote(s.id, "cooked").await;
        }
        let _ = store.insert_vote(s.id, "going_to_make_it").await;
        let Ok(after_last) = store.insert_vote(s.id, "going_to_make_it").await else {
            panic!("vote failed");
        };
        assert_eq!(after_last.cooked, 3);
        assert_eq!(after_last.going_to_make_it, 2);

        let Ok(counts) = store.vote_counts(s.id).await else {
            panic!("count failed");
        };
        assert_eq!(counts, after_last);
    }

    #[tokio::test]
    async fn unknown_situation_and_vote_type_are_accepted() {
        let store = store().await;

        let Ok(counts) = store.insert_vote(404, "meh").await else {
            panic!("vote on unknown id should be stored");
        };
        assert_eq!(counts, VoteCounts::default());

        let Ok(counts) = store.vote_counts(12345).await else {
            panic!("count failed");
        };
        assert_eq!(counts, VoteCounts::default());
    }

    #[tokio::test]
    async fn comments_come_back_newest_first() {
        let store = store().await;
        let s = post(&store, "landlord texted", None).await;

        for text in ["first", "second", "third"] {
            let Ok(_) = store.insert_comment(s.id, text).await else {
                panic!("comment failed");
            };
        }

        let Ok(comments) = store.comments_for(s.id).await else {
            panic!("fetch failed");
        };
        let texts: Vec<&str> = comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["third", "second", "first"]);
        assert!(
            comments
                .windows(2)
                .all(|w| w[0].created_at >= w[1].created_at && w[0].id > w[1].id)
        );
    }

    #[tokio::test]
    async fn threads_nest_replies_and_skip_deeper_levels() {
        let store = store().await;
        let root = post(&store, "root", None).await;
        let other = post(&store, "other root", None).await;
        let reply = post(&store, "reply", Some(root.id)).await;
        let deep = post(&store, "reply to reply", Some(reply.id)).await;

        let _ = store.insert_vote(root.id, "cooked").await;
        let _ = store.insert_vote(reply.id, "going_to_make_it").await;
        let _ = store.insert_vote(deep.id, "cooked").await;
        let _ = store.insert_comment(reply.id, "hang in there").await;

        let Ok(threads) = store.load_threads().await else {
            panic!("load failed");
        };

        let ids: Vec<i64> = threads.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![other.id, root.id]);

        let root_thread = &threads[1];
        assert_eq!(root_thread.votes.cooked, 1);
        assert_eq!(root_thread.replies.len(), 1);

        let reply_node = &root_thread.replies[0];
        assert_eq!(reply_node.id, reply.id);
        assert_eq!(reply_node.votes.going_to_make_it, 1);
        assert_eq!(reply_node.comments.len(), 1);
        assert_eq!(reply_node.comments[0].text, "hang in there");

        assert!(threads.iter().all(|t| t.id != deep.id));
    }
}
