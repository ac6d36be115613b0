mod db_thread;
mod view;

// Export database-agnostic models
pub use db_thread::{Reply, Thread, DELETED_TEXT};
pub use view::{ReplyView, ThreadView};
