use board_persist::{ReplyView, ThreadView};
use utoipa::OpenApi;

use crate::routes::{health, replies, threads};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        threads::list_threads,
        threads::create_thread,
        threads::report_thread,
        threads::delete_thread,
        replies::list_replies,
        replies::create_reply,
        replies::report_reply,
        replies::delete_reply,
    ),
    components(schemas(
        ThreadView,
        ReplyView,
        threads::CreateThreadRequest,
        threads::ThreadActionRequest,
        replies::CreateReplyRequest,
        replies::ReplyActionRequest,
        health::HealthResponse,
    )),
    tags(
        (name = "threads", description = "Threads on a board"),
        (name = "replies", description = "Replies within a thread"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
