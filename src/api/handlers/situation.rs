//! Situation handlers: create and list threads.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::SituationForm;
use crate::app_state::AppState;
use crate::domain::{Situation, SituationThread};
use crate::error::{BoardError, ErrorResponse};

/// `POST /situations`: Post a situation or a reply.
///
/// # Errors
///
/// Returns [`BoardError`] if the form cannot be read, the image cannot be
/// stored, or the insert fails.
#[utoipa::path(
    post,
    path = "/situations",
    tag = "Situations",
    summary = "Post a situation",
    description = "Creates a top-level situation, or a reply when `reply_to` is set. An `image` part with an unsupported extension is dropped silently.",
    request_body(content = SituationForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Situation created", body = Situation),
        (status = 413, description = "Request body too large", body = ErrorResponse),
        (status = 500, description = "Creation failed", body = ErrorResponse),
    )
)]
pub async fn create_situation(
    State(state): State<AppState>,
    form: SituationForm,
) -> Result<impl IntoResponse, BoardError> {
    let situation = state
        .board
        .create_situation(&form.text, form.reply_to, form.image)
        .await?;

    Ok((StatusCode::CREATED, Json(situation)))
}

/// `GET /situations`: List top-level situations with replies.
///
/// # Errors
///
/// Returns [`BoardError::Database`] on store failure.
#[utoipa::path(
    get,
    path = "/situations",
    tag = "Situations",
    summary = "List situation threads",
    description = "Returns every top-level situation, newest first, with vote counts, comments (newest first) and direct replies (oldest first).",
    responses(
        (status = 200, description = "Situation threads", body = Vec<SituationThread>),
        (status = 500, description = "Query failed", body = ErrorResponse),
    )
)]
pub async fn list_situations(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, BoardError> {
    let threads = state.board.threads().await?;
    Ok(Json(threads))
}

/// Situation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/situations", post(create_situation).get(list_situations))
}
