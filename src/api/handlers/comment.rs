//! Comment handlers.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::CommentRequest;
use crate::app_state::AppState;
use crate::domain::Comment;
use crate::error::{BoardError, ErrorResponse};

/// `POST /comments`: Comment on a situation.
///
/// # Errors
///
/// Returns [`BoardError::MissingField`] or [`BoardError::InvalidBody`] for
/// a bad body (both reported as 500), [`BoardError::Database`] on store
/// failure.
#[utoipa::path(
    post,
    path = "/comments",
    tag = "Comments",
    summary = "Add a comment",
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 500, description = "Missing field or insert failed", body = ErrorResponse),
    )
)]
pub async fn add_comment(
    State(state): State<AppState>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, BoardError> {
    let Json(req) = payload?;
    let (situation_id, text) = req.into_parts()?;

    let comment = state.board.add_comment(situation_id, &text).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// `GET /comments/{situation_id}`: Comments for a situation, newest first.
///
/// # Errors
///
/// Returns [`BoardError::InvalidPathId`] when the id is not an integer
/// and [`BoardError::Database`] on store failure.
#[utoipa::path(
    get,
    path = "/comments/{situation_id}",
    tag = "Comments",
    summary = "List comments",
    params(
        ("situation_id" = i64, Path, description = "Situation id"),
    ),
    responses(
        (status = 200, description = "Comments, newest first", body = Vec<Comment>),
        (status = 404, description = "Id is not an integer", body = ErrorResponse),
        (status = 500, description = "Query failed", body = ErrorResponse),
    )
)]
pub async fn list_comments(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, BoardError> {
    let Path(situation_id) = path?;
    let comments = state.board.comments(situation_id).await?;
    Ok(Json(comments))
}

/// Comment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/comments", post(add_comment))
        .route("/comments/{situation_id}", get(list_comments))
}
