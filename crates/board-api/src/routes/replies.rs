use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use board_persist::{Reply, Thread, ThreadView};

use crate::{
    error::{BoardError, BoardResult, StoreResultExt},
    extract::Fields,
    routes::{board_page, redirect, SUCCESS},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ListRepliesQuery {
    pub thread_id: Option<String>,
}

/// Accepted body for creating a reply (JSON or urlencoded)
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReplyRequest {
    pub thread_id: String,
    pub text: String,
    pub delete_password: String,
    pub board: String,
}

/// Accepted body for reporting or deleting a reply (JSON or urlencoded)
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplyActionRequest {
    pub thread_id: String,
    pub reply_id: String,
    pub delete_password: String,
}

/// Get a thread with every reply
///
/// An unknown thread answers the same as a missing `thread_id`.
#[utoipa::path(
    get,
    path = "/api/replies/{board}",
    params(
        ("board" = String, Path, description = "Board name"),
        ("thread_id" = String, Query, description = "Thread ID")
    ),
    responses(
        (status = 200, description = "Thread with all replies, or the text \"missing thread_id\"", body = ThreadView)
    ),
    tag = "replies"
)]
pub async fn list_replies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListRepliesQuery>,
) -> BoardResult<Json<ThreadView>> {
    let thread_id = query
        .thread_id
        .filter(|id| !id.is_empty())
        .ok_or(BoardError::MissingThreadId)?;

    let thread = state
        .store
        .get_thread(&thread_id)
        .await
        .or_reject(BoardError::MissingThreadId)?
        .ok_or(BoardError::MissingThreadId)?;

    Ok(Json(thread))
}

/// Reply to a thread, bump it, and redirect to the thread page
#[utoipa::path(
    post,
    path = "/api/replies/{board}",
    params(("board" = String, Path, description = "Board name")),
    request_body = CreateReplyRequest,
    responses(
        (status = 302, description = "Redirect to /b/{board}/{thread_id}"),
        (status = 200, description = "\"missing required fields\" or \"failed to create reply\"", content_type = "text/plain")
    ),
    tag = "replies"
)]
pub async fn create_reply(
    State(state): State<Arc<AppState>>,
    fields: Fields,
) -> BoardResult<Response> {
    let [thread_id, text, delete_password, board] =
        fields.require(["thread_id", "text", "delete_password", "board"])?;

    let thread = state
        .store
        .create_reply(thread_id, text, delete_password)
        .await
        .or_reject(BoardError::ReplyNotCreated)?
        .ok_or(BoardError::ReplyNotCreated)?;

    tracing::info!(thread_id = %thread.id, replies = thread.replies.len(), "Reply created");
    Ok(redirect(board_page(board, Some(thread_id))))
}

/// Report a reply
#[utoipa::path(
    put,
    path = "/api/replies/{board}",
    params(("board" = String, Path, description = "Board name")),
    request_body = ReplyActionRequest,
    responses(
        (status = 200, description = "\"success\", \"incorrect password\" or \"missing required fields\"", content_type = "text/plain")
    ),
    tag = "replies"
)]
pub async fn report_reply(
    State(state): State<Arc<AppState>>,
    fields: Fields,
) -> BoardResult<&'static str> {
    let [thread_id, reply_id, delete_password] =
        fields.require(["thread_id", "reply_id", "delete_password"])?;
    authorize_reply(&state, thread_id, reply_id, delete_password).await?;

    let updated = state
        .store
        .report_reply(thread_id, reply_id)
        .await
        .or_reject(BoardError::IncorrectPassword)?;

    if !reply_in(&updated, reply_id).is_some_and(|reply| reply.reported) {
        return Err(BoardError::IncorrectPassword);
    }

    tracing::info!(thread_id = %thread_id, reply_id = %reply_id, "Reply reported");
    Ok(SUCCESS)
}

/// Delete a reply by overwriting its text; the reply itself stays
#[utoipa::path(
    delete,
    path = "/api/replies/{board}",
    params(("board" = String, Path, description = "Board name")),
    request_body = ReplyActionRequest,
    responses(
        (status = 200, description = "\"success\", \"incorrect password\" or \"missing required fields\"", content_type = "text/plain")
    ),
    tag = "replies"
)]
pub async fn delete_reply(
    State(state): State<Arc<AppState>>,
    fields: Fields,
) -> BoardResult<&'static str> {
    let [thread_id, reply_id, delete_password] =
        fields.require(["thread_id", "reply_id", "delete_password"])?;
    authorize_reply(&state, thread_id, reply_id, delete_password).await?;

    let updated = state
        .store
        .delete_reply(thread_id, reply_id)
        .await
        .or_reject(BoardError::IncorrectPassword)?;

    if !reply_in(&updated, reply_id).is_some_and(Reply::is_deleted) {
        return Err(BoardError::IncorrectPassword);
    }

    tracing::info!(thread_id = %thread_id, reply_id = %reply_id, "Reply deleted");
    Ok(SUCCESS)
}

async fn authorize_reply(
    state: &AppState,
    thread_id: &str,
    reply_id: &str,
    delete_password: &str,
) -> BoardResult<()> {
    let replies = state
        .store
        .get_replies(thread_id)
        .await
        .or_reject(BoardError::IncorrectPassword)?
        .unwrap_or_default();

    let authorized = replies
        .iter()
        .find(|reply| reply.id == reply_id)
        .is_some_and(|reply| reply.password_matches(delete_password));

    if authorized {
        Ok(())
    } else {
        Err(BoardError::IncorrectPassword)
    }
}

fn reply_in<'a>(thread: &'a Option<Thread>, reply_id: &str) -> Option<&'a Reply> {
    thread.as_ref().and_then(|thread| thread.reply(reply_id))
}
