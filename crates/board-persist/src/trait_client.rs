use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Reply, Thread, ThreadView};

/// Threads listed on a board page.
pub const LISTING_LIMIT: usize = 10;

/// Replies shown per thread on a board page.
pub const LISTING_REPLY_LIMIT: usize = 3;

/// Storage contract for threads and their embedded replies.
///
/// Ids are passed as text. Anything that is not a 24-hex object id fails
/// with [`PersistError::InvalidObjectId`](crate::PersistError::InvalidObjectId).
/// Every mutation is a single atomic store operation that hands back the
/// document as it looks afterwards (or as it was removed), `None` when no
/// document matched.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Insert a thread with no replies, unreported, created and bumped now.
    async fn create_thread(&self, text: &str, delete_password: &str) -> Result<Thread>;

    /// Most recently bumped threads first, across every board.
    async fn list_threads(&self, limit: usize, reply_limit: usize) -> Result<Vec<ThreadView>>;

    /// Projected thread with all of its replies.
    async fn get_thread(&self, thread_id: &str) -> Result<Option<ThreadView>>;

    /// Unprojected thread, secrets included.
    async fn get_full_thread(&self, thread_id: &str) -> Result<Option<Thread>>;

    /// Unprojected replies of a thread.
    async fn get_replies(&self, thread_id: &str) -> Result<Option<Vec<Reply>>>;

    async fn report_thread(&self, thread_id: &str) -> Result<Option<Thread>>;

    async fn delete_thread(&self, thread_id: &str) -> Result<Option<Thread>>;

    /// Append a reply and bump the parent in one update.
    async fn create_reply(
        &self,
        thread_id: &str,
        text: &str,
        delete_password: &str,
    ) -> Result<Option<Thread>>;

    async fn report_reply(&self, thread_id: &str, reply_id: &str) -> Result<Option<Thread>>;

    /// Overwrite the reply text with [`DELETED_TEXT`](crate::DELETED_TEXT).
    async fn delete_reply(&self, thread_id: &str, reply_id: &str) -> Result<Option<Thread>>;

    /// Drop every thread.
    async fn clear(&self) -> Result<()>;

    /// Cheap round trip to the backing store.
    async fn ping(&self) -> Result<()>;
}
