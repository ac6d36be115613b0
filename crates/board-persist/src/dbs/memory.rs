//! In-process [`BoardStore`] backed by a vector of threads.
//!
//! Each mutation holds the write lock for its whole read-modify-write, so a
//! concurrent report and delete of the same reply cannot lose an update.

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::dbs::parse_object_id;
use crate::error::Result;
use crate::models::{Reply, Thread, ThreadView, DELETED_TEXT};
use crate::trait_client::BoardStore;

/// Threads kept in insertion order.
#[derive(Default)]
pub struct MemoryBoardStore {
    threads: RwLock<Vec<Thread>>,
}

impl MemoryBoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `update` against the matching thread under the write lock and
    /// return the thread as it looks afterwards.
    async fn update_thread<F>(&self, thread_id: &str, update: F) -> Result<Option<Thread>>
    where
        F: FnOnce(&mut Thread) -> bool + Send,
    {
        let key = parse_object_id(thread_id)?.to_hex();
        let mut threads = self.threads.write().await;
        Ok(threads
            .iter_mut()
            .find(|thread| thread.id == key)
            .and_then(|thread| update(thread).then(|| thread.clone())))
    }

    async fn update_reply<F>(
        &self,
        thread_id: &str,
        reply_id: &str,
        update: F,
    ) -> Result<Option<Thread>>
    where
        F: FnOnce(&mut Reply) + Send,
    {
        let reply_key = parse_object_id(reply_id)?.to_hex();
        self.update_thread(thread_id, move |thread| {
            match thread.replies.iter_mut().find(|reply| reply.id == reply_key) {
                Some(reply) => {
                    update(reply);
                    true
                }
                None => false,
            }
        })
        .await
    }

    async fn find_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        let key = parse_object_id(thread_id)?.to_hex();
        let threads = self.threads.read().await;
        Ok(threads.iter().find(|thread| thread.id == key).cloned())
    }
}

#[async_trait]
impl BoardStore for MemoryBoardStore {
    async fn create_thread(&self, text: &str, delete_password: &str) -> Result<Thread> {
        let now = Utc::now();
        let thread = Thread {
            id: ObjectId::new().to_hex(),
            text: text.to_string(),
            delete_password: delete_password.to_string(),
            created_on: now,
            bumped_on: now,
            reported: false,
            replies: Vec::new(),
        };

        self.threads.write().await.push(thread.clone());
        Ok(thread)
    }

    async fn list_threads(&self, limit: usize, reply_limit: usize) -> Result<Vec<ThreadView>> {
        let threads = self.threads.read().await;
        // Newest insert first, so the stable sort breaks bump ties the same
        // way a descending `_id` does.
        let mut recent: Vec<&Thread> = threads.iter().rev().collect();
        recent.sort_by(|a, b| b.bumped_on.cmp(&a.bumped_on));

        Ok(recent
            .into_iter()
            .take(limit)
            .map(|thread| thread.view(Some(reply_limit)))
            .collect())
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Option<ThreadView>> {
        Ok(self.find_thread(thread_id).await?.map(ThreadView::from))
    }

    async fn get_full_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        self.find_thread(thread_id).await
    }

    async fn get_replies(&self, thread_id: &str) -> Result<Option<Vec<Reply>>> {
        Ok(self.find_thread(thread_id).await?.map(|thread| thread.replies))
    }

    async fn report_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        self.update_thread(thread_id, |thread| {
            thread.reported = true;
            true
        })
        .await
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        let key = parse_object_id(thread_id)?.to_hex();
        let mut threads = self.threads.write().await;
        Ok(threads
            .iter()
            .position(|thread| thread.id == key)
            .map(|index| threads.remove(index)))
    }

    async fn create_reply(
        &self,
        thread_id: &str,
        text: &str,
        delete_password: &str,
    ) -> Result<Option<Thread>> {
        let now = Utc::now();
        let reply = Reply {
            id: ObjectId::new().to_hex(),
            text: text.to_string(),
            delete_password: delete_password.to_string(),
            created_on: now,
            reported: false,
        };

        self.update_thread(thread_id, move |thread| {
            thread.bumped_on = now;
            thread.replies.push(reply);
            true
        })
        .await
    }

    async fn report_reply(&self, thread_id: &str, reply_id: &str) -> Result<Option<Thread>> {
        self.update_reply(thread_id, reply_id, |reply| reply.reported = true)
            .await
    }

    async fn delete_reply(&self, thread_id: &str, reply_id: &str) -> Result<Option<Thread>> {
        self.update_reply(thread_id, reply_id, |reply| {
            reply.text = DELETED_TEXT.to_string();
        })
        .await
    }

    async fn clear(&self) -> Result<()> {
        self.threads.write().await.clear();
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
