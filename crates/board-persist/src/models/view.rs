//! Client-facing projections.
//!
//! These are the only thread and reply shapes that get serialized to
//! clients: no delete password, no reported flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Reply, Thread};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ThreadView {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    pub created_on: DateTime<Utc>,
    pub bumped_on: DateTime<Utc>,
    pub replies: Vec<ReplyView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReplyView {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    pub created_on: DateTime<Utc>,
}

impl Thread {
    /// Projects the thread, keeping at most `reply_limit` replies from the
    /// front of the list (all of them when `None`).
    pub fn view(&self, reply_limit: Option<usize>) -> ThreadView {
        let limit = reply_limit.unwrap_or(usize::MAX);
        ThreadView {
            id: self.id.clone(),
            text: self.text.clone(),
            created_on: self.created_on,
            bumped_on: self.bumped_on,
            replies: self.replies.iter().take(limit).map(ReplyView::from).collect(),
        }
    }
}

impl From<&Reply> for ReplyView {
    fn from(reply: &Reply) -> Self {
        Self {
            id: reply.id.clone(),
            text: reply.text.clone(),
            created_on: reply.created_on,
        }
    }
}

impl From<Thread> for ThreadView {
    fn from(thread: Thread) -> Self {
        thread.view(None)
    }
}
