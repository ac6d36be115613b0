//! Request outcomes other than success.
//!
//! Existing clients tell outcomes apart by comparing the response body, so
//! each variant's message is the exact text sent on the wire, with HTTP 200.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use board_persist::PersistError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("missing required fields")]
    MissingFields,

    #[error("missing thread_id")]
    MissingThreadId,

    /// Wrong password, unknown thread or reply, or a failed mutation.
    #[error("incorrect password")]
    IncorrectPassword,

    #[error("error creating thread")]
    ThreadNotCreated,

    #[error("failed to create reply")]
    ReplyNotCreated,

    /// Store failure on a route with no textual fallback.
    #[error("Persistence error: {0}")]
    Store(#[from] PersistError),
}

impl IntoResponse for BoardError {
    fn into_response(self) -> Response {
        match self {
            BoardError::Store(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
            rejection => (StatusCode::OK, rejection.to_string()).into_response(),
        }
    }
}

pub type BoardResult<T> = Result<T, BoardError>;

pub trait StoreResultExt<T> {
    /// Collapse a store failure into `rejection`, logging the cause.
    fn or_reject(self, rejection: BoardError) -> BoardResult<T>;
}

impl<T> StoreResultExt<T> for board_persist::Result<T> {
    fn or_reject(self, rejection: BoardError) -> BoardResult<T> {
        self.map_err(|e| {
            match e {
                PersistError::InvalidObjectId(ref id) => {
                    tracing::debug!(id = %id, "Malformed id treated as not found")
                }
                ref other => tracing::warn!(error = %other, "Store operation failed"),
            }
            rejection
        })
    }
}
