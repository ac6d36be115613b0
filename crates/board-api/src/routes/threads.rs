use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use board_persist::{ThreadView, LISTING_LIMIT, LISTING_REPLY_LIMIT};

use crate::{
    error::{BoardError, BoardResult, StoreResultExt},
    extract::Fields,
    routes::{board_page, redirect, SUCCESS},
    state::AppState,
};

/// Accepted body for creating a thread (JSON or urlencoded)
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateThreadRequest {
    pub text: String,
    pub delete_password: String,
    pub board: String,
}

/// Accepted body for reporting or deleting a thread (JSON or urlencoded)
#[derive(Debug, Deserialize, ToSchema)]
pub struct ThreadActionRequest {
    pub thread_id: String,
    pub delete_password: String,
}

/// List the most recently bumped threads
///
/// Threads from every board share one collection, so `board` does not
/// filter the listing.
#[utoipa::path(
    get,
    path = "/api/threads/{board}",
    params(("board" = String, Path, description = "Board name")),
    responses(
        (status = 200, description = "Up to 10 threads with at most 3 replies each", body = [ThreadView]),
        (status = 500, description = "Store unavailable")
    ),
    tag = "threads"
)]
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
) -> BoardResult<Json<Vec<ThreadView>>> {
    let threads = state
        .store
        .list_threads(LISTING_LIMIT, LISTING_REPLY_LIMIT)
        .await?;

    tracing::debug!(board = %board, count = threads.len(), "Threads listed");
    Ok(Json(threads))
}

/// Create a thread and redirect to its board
#[utoipa::path(
    post,
    path = "/api/threads/{board}",
    params(("board" = String, Path, description = "Board name")),
    request_body = CreateThreadRequest,
    responses(
        (status = 302, description = "Redirect to /b/{board}"),
        (status = 200, description = "\"missing required fields\" or \"error creating thread\"", content_type = "text/plain")
    ),
    tag = "threads"
)]
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    fields: Fields,
) -> BoardResult<Response> {
    let [text, delete_password, board] = fields.require(["text", "delete_password", "board"])?;

    let thread = state
        .store
        .create_thread(text, delete_password)
        .await
        .or_reject(BoardError::ThreadNotCreated)?;

    tracing::info!(thread_id = %thread.id, board = %board, "Thread created");
    Ok(redirect(board_page(board, None)))
}

/// Report a thread
#[utoipa::path(
    put,
    path = "/api/threads/{board}",
    params(("board" = String, Path, description = "Board name")),
    request_body = ThreadActionRequest,
    responses(
        (status = 200, description = "\"success\", \"incorrect password\" or \"missing required fields\"", content_type = "text/plain")
    ),
    tag = "threads"
)]
pub async fn report_thread(
    State(state): State<Arc<AppState>>,
    fields: Fields,
) -> BoardResult<&'static str> {
    let [thread_id, delete_password] = fields.require(["thread_id", "delete_password"])?;
    authorize_thread(&state, thread_id, delete_password).await?;

    let reported = state
        .store
        .report_thread(thread_id)
        .await
        .or_reject(BoardError::IncorrectPassword)?;

    if !reported.is_some_and(|thread| thread.reported) {
        return Err(BoardError::IncorrectPassword);
    }

    tracing::info!(thread_id = %thread_id, "Thread reported");
    Ok(SUCCESS)
}

/// Delete a thread and all of its replies
#[utoipa::path(
    delete,
    path = "/api/threads/{board}",
    params(("board" = String, Path, description = "Board name")),
    request_body = ThreadActionRequest,
    responses(
        (status = 200, description = "\"success\", \"incorrect password\" or \"missing required fields\"", content_type = "text/plain")
    ),
    tag = "threads"
)]
pub async fn delete_thread(
    State(state): State<Arc<AppState>>,
    fields: Fields,
) -> BoardResult<&'static str> {
    let [thread_id, delete_password] = fields.require(["thread_id", "delete_password"])?;
    authorize_thread(&state, thread_id, delete_password).await?;

    let removed = state
        .store
        .delete_thread(thread_id)
        .await
        .or_reject(BoardError::IncorrectPassword)?;

    if removed.is_none() {
        return Err(BoardError::IncorrectPassword);
    }

    tracing::info!(thread_id = %thread_id, "Thread deleted");
    Ok(SUCCESS)
}

/// Unknown threads and wrong passwords are indistinguishable to the caller.
async fn authorize_thread(
    state: &AppState,
    thread_id: &str,
    delete_password: &str,
) -> BoardResult<()> {
    let thread = state
        .store
        .get_full_thread(thread_id)
        .await
        .or_reject(BoardError::IncorrectPassword)?;

    match thread {
        Some(thread) if thread.password_matches(delete_password) => Ok(()),
        _ => Err(BoardError::IncorrectPassword),
    }
}
