//! Two-level situation threads as returned by `GET /situations`.
//!
//! A thread is a top-level situation plus its direct replies. Replies to
//! replies are stored but never materialized here.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{Comment, Situation, VoteCounts};

/// A direct reply inside a [`SituationThread`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReplyNode {
    /// Reply id.
    pub id: i64,
    /// Reply text.
    pub text: String,
    /// Attached image filename, if any.
    pub image_path: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Vote totals for the reply.
    pub votes: VoteCounts,
    /// Comments on the reply, newest first.
    pub comments: Vec<Comment>,
}

/// A top-level situation with its votes, comments and direct replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SituationThread {
    /// Situation id.
    pub id: i64,
    /// Situation text.
    pub text: String,
    /// Attached image filename, if any.
    pub image_path: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Vote totals for the situation.
    pub votes: VoteCounts,
    /// Comments on the situation, newest first.
    pub comments: Vec<Comment>,
    /// Direct replies in insertion order.
    pub replies: Vec<ReplyNode>,
}

/// Builds the thread list from batched query results.
///
/// Output order follows the input: `roots` in the order given (newest
/// first from the store), replies in the order given (insertion order),
/// and comments in the order given (newest first). Replies whose parent
/// is not in `roots` and comments for situations that are not shown are
/// dropped. Situations missing from `votes` get zero counts.
#[must_use]
pub fn assemble_threads(
    roots: Vec<Situation>,
    replies: Vec<Situation>,
    votes: &HashMap<i64, VoteCounts>,
    comments: Vec<Comment>,
) -> Vec<SituationThread> {
    let mut comments_by_situation: HashMap<i64, Vec<Comment>> = HashMap::new();
    for comment in comments {
        comments_by_situation
            .entry(comment.situation_id)
            .or_default()
            .push(comment);
    }

    let mut replies_by_parent: HashMap<i64, Vec<ReplyNode>> = HashMap::new();
    for reply in replies {
        let Some(parent) = reply.reply_to else {
            continue;
        };
        let node = ReplyNode {
            id: reply.id,
            votes: votes.get(&reply.id).copied().unwrap_or_default(),
            comments: comments_by_situation.remove(&reply.id).unwrap_or_default(),
            text: reply.text,
            image_path: reply.image_path,
            created_at: reply.created_at,
        };
        replies_by_parent.entry(parent).or_default().push(node);
    }

    roots
        .into_iter()
        .filter(Situation::is_root)
        .map(|root| SituationThread {
            id: root.id,
            votes: votes.get(&root.id).copied().unwrap_or_default(),
            comments: comments_by_situation.remove(&root.id).unwrap_or_default(),
            replies: replies_by_parent.remove(&root.id).unwrap_or_default(),
            text: root.text,
            image_path: root.image_path,
            created_at: root.created_at,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(secs: i64) -> DateTime<Utc> {
        let Some(base) = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single() else {
            panic!("valid timestamp");
        };
        base + Duration::seconds(secs)
    }

    fn situation(id: i64, reply_to: Option<i64>) -> Situation {
        Situation {
            id,
            text: format!("situation {id}"),
            image_path: None,
            created_at: at(id),
            reply_to,
        }
    }

    fn comment(id: i64, situation_id: i64) -> Comment {
        Comment {
            id,
            text: format!("comment {id}"),
            created_at: at(id),
            situation_id,
        }
    }

    #[test]
    fn replies_nest_under_their_parent() {
        let roots = vec![situation(3, None), situation(1, None)];
        let replies = vec![situation(2, Some(1)), situation(4, Some(1))];

        let threads = assemble_threads(roots, replies, &HashMap::new(), Vec::new());

        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].id, 3);
        assert!(threads[0].replies.is_empty());
        assert_eq!(threads[1].id, 1);
        let reply_ids: Vec<i64> = threads[1].replies.iter().map(|r| r.id).collect();
        assert_eq!(reply_ids, vec![2, 4]);
    }

    #[test]
    fn replies_never_appear_top_level() {
        let roots = vec![situation(1, None), situation(2, Some(1))];
        let replies = vec![situation(2, Some(1))];

        let threads = assemble_threads(roots, replies, &HashMap::new(), Vec::new());

        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].replies.len(), 1);
    }

    #[test]
    fn orphan_replies_are_dropped() {
        let roots = vec![situation(1, None)];
        let replies = vec![situation(5, Some(99))];

        let threads = assemble_threads(roots, replies, &HashMap::new(), Vec::new());

        assert_eq!(threads.len(), 1);
        assert!(threads[0].replies.is_empty());
    }

    #[test]
    fn votes_and_comments_attach_to_roots_and_replies() {
        let roots = vec![situation(1, None)];
        let replies = vec![situation(2, Some(1))];
        let mut votes = HashMap::new();
        votes.insert(
            1,
            VoteCounts {
                cooked: 2,
                going_to_make_it: 1,
            },
        );
        votes.insert(
            2,
            VoteCounts {
                cooked: 0,
                going_to_make_it: 5,
            },
        );
        let comments = vec![comment(12, 1), comment(11, 2), comment(10, 1)];

        let threads = assemble_threads(roots, replies, &votes, comments);

        let thread = &threads[0];
        assert_eq!(thread.votes.cooked, 2);
        assert_eq!(thread.votes.going_to_make_it, 1);
        let root_comments: Vec<i64> = thread.comments.iter().map(|c| c.id).collect();
        assert_eq!(root_comments, vec![12, 10]);

        let reply = &thread.replies[0];
        assert_eq!(reply.votes.going_to_make_it, 5);
        assert_eq!(reply.comments.len(), 1);
        assert_eq!(reply.comments[0].id, 11);
    }

    #[test]
    fn missing_votes_default_to_zero() {
        let threads = assemble_threads(
            vec![situation(1, None)],
            Vec::new(),
            &HashMap::new(),
            Vec::new(),
        );
        assert_eq!(threads[0].votes, VoteCounts::default());
    }

    #[test]
    fn thread_serializes_without_reply_to() {
        let threads = assemble_threads(
            vec![situation(1, None)],
            vec![situation(2, Some(1))],
            &HashMap::new(),
            Vec::new(),
        );
        let Ok(json) = serde_json::to_value(&threads) else {
            panic!("serialization failed");
        };
        let root = &json[0];
        assert!(root.get("reply_to").is_none());
        assert!(root.get("replies").is_some());
        let reply = &root["replies"][0];
        assert!(reply.get("replies").is_none());
        assert_eq!(reply["votes"]["cooked"], 0);
    }
}
