use std::time::Duration;

use async_trait::async_trait;
use mongodb::options::ClientOptions;
use mongodb::Client;

use crate::dbs::mongo::repositories::MongoThreadRepository;
use crate::dbs::parse_object_id;
use crate::error::{PersistError, Result};
use crate::models::{Reply, Thread, ThreadView};
use crate::trait_client::BoardStore;

pub struct MongoBoardStore {
    thread_repo: MongoThreadRepository,
}

impl MongoBoardStore {
    /// Connect to MongoDB and create client
    pub async fn connect(
        mongodb_uri: &str,
        database: &str,
        pool_size: Option<u32>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut options = ClientOptions::parse(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        if pool_size.is_some() {
            options.max_pool_size = pool_size;
        }
        if timeout.is_some() {
            options.server_selection_timeout = timeout;
            options.connect_timeout = timeout;
        }

        let client = Client::with_options(options)
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        Ok(Self {
            thread_repo: MongoThreadRepository::new(&client, database),
        })
    }
}

#[async_trait]
impl BoardStore for MongoBoardStore {
    async fn create_thread(&self, text: &str, delete_password: &str) -> Result<Thread> {
        let thread = self
            .thread_repo
            .create_thread(text.to_string(), delete_password.to_string())
            .await?;
        Ok(thread.into())
    }

    async fn list_threads(&self, limit: usize, reply_limit: usize) -> Result<Vec<ThreadView>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let reply_limit = i64::try_from(reply_limit).unwrap_or(i64::MAX);
        let threads = self.thread_repo.list_threads(limit, reply_limit).await?;
        Ok(threads
            .into_iter()
            .map(|thread| ThreadView::from(Thread::from(thread)))
            .collect())
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Option<ThreadView>> {
        Ok(self
            .get_full_thread(thread_id)
            .await?
            .map(ThreadView::from))
    }

    async fn get_full_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        let object_id = parse_object_id(thread_id)?;
        let thread = self.thread_repo.get_thread(object_id).await?;
        Ok(thread.map(Thread::from))
    }

    async fn get_replies(&self, thread_id: &str) -> Result<Option<Vec<Reply>>> {
        let object_id = parse_object_id(thread_id)?;
        let replies = self.thread_repo.get_replies(object_id).await?;
        Ok(replies.map(|r| r.replies.into_iter().map(Reply::from).collect()))
    }

    async fn report_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        let object_id = parse_object_id(thread_id)?;
        let thread = self.thread_repo.report_thread(object_id).await?;
        Ok(thread.map(Thread::from))
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        let object_id = parse_object_id(thread_id)?;
        let thread = self.thread_repo.delete_thread(object_id).await?;
        Ok(thread.map(Thread::from))
    }

    async fn create_reply(
        &self,
        thread_id: &str,
        text: &str,
        delete_password: &str,
    ) -> Result<Option<Thread>> {
        let object_id = parse_object_id(thread_id)?;
        let thread = self
            .thread_repo
            .add_reply(object_id, text.to_string(), delete_password.to_string())
            .await?;
        Ok(thread.map(Thread::from))
    }

    async fn report_reply(&self, thread_id: &str, reply_id: &str) -> Result<Option<Thread>> {
        let object_id = parse_object_id(thread_id)?;
        let reply_object_id = parse_object_id(reply_id)?;
        let thread = self.thread_repo.report_reply(object_id, reply_object_id).await?;
        Ok(thread.map(Thread::from))
    }

    async fn delete_reply(&self, thread_id: &str, reply_id: &str) -> Result<Option<Thread>> {
        let object_id = parse_object_id(thread_id)?;
        let reply_object_id = parse_object_id(reply_id)?;
        let thread = self.thread_repo.delete_reply(object_id, reply_object_id).await?;
        Ok(thread.map(Thread::from))
    }

    async fn clear(&self) -> Result<()> {
        self.thread_repo.drop_threads().await
    }

    async fn ping(&self) -> Result<()> {
        self.thread_repo.ping().await
    }
}
