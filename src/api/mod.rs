//! REST API layer: route handlers, DTOs, OpenAPI document and router
//! composition.
//!
//! Resource endpoints are mounted at the root, matching the paths the web
//! client already calls.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::domain::{Comment, ReplyNode, Situation, SituationThread, VoteCounts};
use crate::error::{ErrorResponse, VoteRejection};

/// OpenAPI document generated from the handler annotations.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "cooked-board",
        description = "Post situations, vote whether the poster is cooked, and comment."
    ),
    paths(
        handlers::situation::create_situation,
        handlers::situation::list_situations,
        handlers::vote::cast_vote,
        handlers::vote::get_votes,
        handlers::comment::add_comment,
        handlers::comment::list_comments,
        handlers::system::health_handler,
    ),
    components(schemas(
        Situation,
        SituationThread,
        ReplyNode,
        Comment,
        VoteCounts,
        dto::SituationForm,
        dto::VoteRequest,
        dto::CommentRequest,
        ErrorResponse,
        VoteRejection,
        handlers::system::HealthResponse,
    )),
    tags(
        (name = "Situations", description = "Posts and threaded replies"),
        (name = "Votes", description = "cooked / going_to_make_it reactions"),
        (name = "Comments", description = "Comments on situations"),
        (name = "System", description = "Health and documentation"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::routes())
        .merge(handlers::system::routes())
}
