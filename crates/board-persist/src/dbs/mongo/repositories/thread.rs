use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, DateTime, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, Database};

use crate::dbs::mongo::models::{MongoReplies, MongoReply, MongoThread};
use crate::error::Result;
use crate::models::DELETED_TEXT;

#[derive(Clone)]
pub struct MongoThreadRepository {
    database: Database,
    collection: Collection<MongoThread>,
}

impl MongoThreadRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let database = client.database(db_name);
        let collection = database.collection("threads");
        Self { database, collection }
    }

    /// Insert a new thread
    pub async fn create_thread(&self, text: String, delete_password: String) -> Result<MongoThread> {
        let thread = MongoThread::new(text, delete_password);
        self.collection.insert_one(&thread).await?;
        Ok(thread)
    }

    /// Most recently bumped threads, replies sliced to the first `reply_limit`
    pub async fn list_threads(&self, limit: i64, reply_limit: i64) -> Result<Vec<MongoThread>> {
        let threads = self
            .collection
            .find(doc! {})
            .sort(listing_order())
            .limit(limit)
            .projection(doc! { "replies": { "$slice": [0, reply_limit] } })
            .await?
            .try_collect()
            .await?;
        Ok(threads)
    }

    /// Get thread by ID
    pub async fn get_thread(&self, thread_id: ObjectId) -> Result<Option<MongoThread>> {
        let filter = doc! { "_id": thread_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Only the replies array of a thread
    pub async fn get_replies(&self, thread_id: ObjectId) -> Result<Option<MongoReplies>> {
        let filter = doc! { "_id": thread_id };
        let replies = self
            .collection
            .clone_with_type::<MongoReplies>()
            .find_one(filter)
            .projection(doc! { "replies": 1 })
            .await?;
        Ok(replies)
    }

    pub async fn report_thread(&self, thread_id: ObjectId) -> Result<Option<MongoThread>> {
        let filter = doc! { "_id": thread_id };
        let update = doc! { "$set": { "reported": true } };
        let thread = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(thread)
    }

    pub async fn delete_thread(&self, thread_id: ObjectId) -> Result<Option<MongoThread>> {
        let filter = doc! { "_id": thread_id };
        Ok(self.collection.find_one_and_delete(filter).await?)
    }

    /// Push a reply and bump the thread in a single update
    pub async fn add_reply(
        &self,
        thread_id: ObjectId,
        text: String,
        delete_password: String,
    ) -> Result<Option<MongoThread>> {
        let now = DateTime::now();
        let reply = MongoReply::new(text, delete_password, now);
        let filter = doc! { "_id": thread_id };
        let update = doc! {
            "$set": { "bumped_on": now },
            "$push": { "replies": bson::to_bson(&reply)? }
        };

        let thread = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(thread)
    }

    pub async fn report_reply(
        &self,
        thread_id: ObjectId,
        reply_id: ObjectId,
    ) -> Result<Option<MongoThread>> {
        self.update_reply(thread_id, reply_id, doc! { "$set": { "replies.$.reported": true } })
            .await
    }

    pub async fn delete_reply(
        &self,
        thread_id: ObjectId,
        reply_id: ObjectId,
    ) -> Result<Option<MongoThread>> {
        self.update_reply(thread_id, reply_id, doc! { "$set": { "replies.$.text": DELETED_TEXT } })
            .await
    }

    /// Positional update of the array element whose `_id` is `reply_id`
    async fn update_reply(
        &self,
        thread_id: ObjectId,
        reply_id: ObjectId,
        update: Document,
    ) -> Result<Option<MongoThread>> {
        let filter = doc! { "_id": thread_id, "replies._id": reply_id };
        let thread = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(thread)
    }

    /// Drop the collection; dropping a missing collection is not an error
    pub async fn drop_threads(&self) -> Result<()> {
        self.collection.drop().await?;
        Ok(())
    }

    pub async fn ping(&self) -> Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

/// Most recent bump first. BSON dates stop at milliseconds, so ties fall back
/// to the newest `_id`.
fn listing_order() -> Document {
    doc! { "bumped_on": -1, "_id": -1 }
}
