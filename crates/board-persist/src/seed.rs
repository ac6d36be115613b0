use crate::error::{PersistError, Result};
use crate::trait_client::{BoardStore, LISTING_LIMIT, LISTING_REPLY_LIMIT};

const SAMPLE_THREADS: [&str; 3] = ["hello!", "hello again", "go away"];
const SAMPLE_THREAD_PASSWORD: &str = "pass";
const SAMPLE_REPLIES: [&str; 3] = ["that reply", "that next reply", "that last reply"];
const SAMPLE_REPLY_PASSWORD: &str = "no";

/// Wipe the store and load the demo threads.
///
/// Three threads go in, then the most recently bumped one gets three
/// replies.
pub async fn seed_sample_data(store: &dyn BoardStore) -> Result<()> {
    store.clear().await?;

    for text in SAMPLE_THREADS {
        store.create_thread(text, SAMPLE_THREAD_PASSWORD).await?;
    }

    let newest = store
        .list_threads(LISTING_LIMIT, LISTING_REPLY_LIMIT)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| PersistError::Internal("seeded threads are missing".to_string()))?;

    for text in SAMPLE_REPLIES {
        store
            .create_reply(&newest.id, text, SAMPLE_REPLY_PASSWORD)
            .await?;
    }

    tracing::info!(thread_id = %newest.id, "Sample data seeded");
    Ok(())
}
