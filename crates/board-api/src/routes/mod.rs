use std::sync::Arc;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::state::AppState;

pub mod health;
pub mod replies;
pub mod threads;

/// Body of every successful report or delete.
pub const SUCCESS: &str = "success";

/// Board and health routes, state still to be supplied.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Threads
        .route(
            "/api/threads/:board",
            get(threads::list_threads)
                .post(threads::create_thread)
                .put(threads::report_thread)
                .delete(threads::delete_thread),
        )
        // Replies
        .route(
            "/api/replies/:board",
            get(replies::list_replies)
                .post(replies::create_reply)
                .put(replies::report_reply)
                .delete(replies::delete_reply),
        )
}

/// Client-facing board page for a thread or board, percent-encoded.
pub(crate) fn board_page(board: &str, thread_id: Option<&str>) -> String {
    let board = urlencoding::encode(board);
    match thread_id {
        Some(thread_id) => format!("/b/{}/{}", board, urlencoding::encode(thread_id)),
        None => format!("/b/{}", board),
    }
}

/// 302 Found to `location`.
pub(crate) fn redirect(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
