//! Vote kinds and per-situation tallies.
//!
//! Votes are stored with a free-form `vote_type` string. Only the two
//! kinds in [`VoteKind`] are ever counted; anything else is kept in the
//! table but invisible to [`VoteCounts`].

use serde::Serialize;
use utoipa::ToSchema;

/// The two reactions the board recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteKind {
    /// The poster is cooked.
    Cooked,
    /// The poster is going to make it.
    GoingToMakeIt,
}

impl VoteKind {
    /// Returns the string stored in the `vote_type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cooked => "cooked",
            Self::GoingToMakeIt => "going_to_make_it",
        }
    }

    /// Parses a stored `vote_type`. Returns `None` for unrecognized values.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "cooked" => Some(Self::Cooked),
            "going_to_make_it" => Some(Self::GoingToMakeIt),
            _ => None,
        }
    }
}

/// Vote totals for one situation.
///
/// Returned by `GET /vote/{id}` and `POST /vote`, and embedded as `votes`
/// in every node of `GET /situations`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct VoteCounts {
    /// Number of `cooked` votes.
    pub cooked: i64,
    /// Number of `going_to_make_it` votes.
    pub going_to_make_it: i64,
}

impl VoteCounts {
    /// Adds `count` votes of the given raw `vote_type`.
    ///
    /// Unrecognized types are ignored.
    pub fn record(&mut self, vote_type: &str, count: i64) {
        match VoteKind::parse(vote_type) {
            Some(VoteKind::Cooked) => self.cooked = self.cooked.saturating_add(count),
            Some(VoteKind::GoingToMakeIt) => {
                self.going_to_make_it = self.going_to_make_it.saturating_add(count);
            }
            None => {}
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parse_recognizes_both_kinds() {
        assert_eq!(VoteKind::parse("cooked"), Some(VoteKind::Cooked));
        assert_eq!(
            VoteKind::parse("going_to_make_it"),
            Some(VoteKind::GoingToMakeIt)
        );
        assert_eq!(VoteKind::parse("Cooked"), None);
        assert_eq!(VoteKind::parse("meh"), None);
    }

    #[test]
    fn as_str_matches_parse() {
        for kind in [VoteKind::Cooked, VoteKind::GoingToMakeIt] {
            assert_eq!(VoteKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn record_ignores_unknown_types() {
        let mut counts = VoteCounts::default();
        counts.record("cooked", 3);
        counts.record("going_to_make_it", 1);
        counts.record("spicy", 10);
        counts.record("cooked", 1);

        assert_eq!(counts.cooked, 4);
        assert_eq!(counts.going_to_make_it, 1);
    }

    #[test]
    fn counts_serialize_with_wire_names() {
        let counts = VoteCounts {
            cooked: 3,
            going_to_make_it: 0,
        };
        let Ok(json) = serde_json::to_value(counts) else {
            panic!("serialization failed");
        };
        assert_eq!(
            json,
            serde_json::json!({ "cooked": 3, "going_to_make_it": 0 })
        );
    }
}
