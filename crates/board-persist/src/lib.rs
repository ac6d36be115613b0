pub mod builder;
pub mod dbs;
pub mod error;
pub mod models;
pub mod seed;
pub mod trait_client;

pub use builder::{BoardStoreBuilder, StoreBackend};
pub use dbs::memory::MemoryBoardStore;
#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoBoardStore;
pub use error::{PersistError, Result};
pub use models::{Reply, ReplyView, Thread, ThreadView, DELETED_TEXT};
pub use seed::seed_sample_data;
pub use trait_client::{BoardStore, LISTING_LIMIT, LISTING_REPLY_LIMIT};
