//! Vote handlers: cast a vote and read counts.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::VoteRequest;
use crate::app_state::AppState;
use crate::domain::VoteCounts;
use crate::error::{BoardError, ErrorResponse, VoteRejection};

/// `POST /vote`: Vote on a situation.
///
/// Votes are not deduplicated and the situation is not checked for
/// existence.
///
/// # Errors
///
/// Returns [`BoardError::MissingVoteFields`] when `post_id` or `vote_type`
/// is missing, [`BoardError::InvalidVoteBody`] when the body is not JSON.
#[utoipa::path(
    post,
    path = "/vote",
    tag = "Votes",
    summary = "Cast a vote",
    description = "Records a `cooked` or `going_to_make_it` vote and returns the updated counts. Any other `vote_type` is stored but never counted.",
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Updated counts", body = VoteCounts),
        (status = 400, description = "Missing required fields", body = VoteRejection),
        (status = 500, description = "Insert failed", body = ErrorResponse),
    )
)]
pub async fn cast_vote(
    State(state): State<AppState>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, BoardError> {
    let Json(req) = payload.map_err(|rejection| BoardError::InvalidVoteBody(rejection.body_text()))?;
    let (post_id, vote_type) = req.into_parts()?;

    let counts = state.board.cast_vote(post_id, &vote_type).await?;
    Ok(Json(counts))
}

/// `GET /vote/{situation_id}`: Current vote counts.
///
/// # Errors
///
/// Returns [`BoardError::InvalidPathId`] when the id is not an integer
/// and [`BoardError::Database`] on store failure.
#[utoipa::path(
    get,
    path = "/vote/{situation_id}",
    tag = "Votes",
    summary = "Get vote counts",
    description = "Returns the vote counts for a situation. Unknown ids return zero counts.",
    params(
        ("situation_id" = i64, Path, description = "Situation id"),
    ),
    responses(
        (status = 200, description = "Vote counts", body = VoteCounts),
        (status = 404, description = "Id is not an integer", body = ErrorResponse),
        (status = 500, description = "Query failed", body = ErrorResponse),
    )
)]
pub async fn get_votes(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, BoardError> {
    let Path(situation_id) = path?;
    let counts = state.board.vote_counts(situation_id).await?;
    Ok(Json(counts))
}

/// Vote routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vote", post(cast_vote))
        .route("/vote/{situation_id}", get(get_votes))
}
