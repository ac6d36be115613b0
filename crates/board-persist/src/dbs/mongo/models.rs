use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::models::{Reply, Thread};

/// MongoDB-specific Thread document (uses ObjectId and BSON dates)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoThread {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub text: String,
    pub delete_password: String,
    pub created_on: DateTime,
    pub bumped_on: DateTime,
    pub reported: bool,
    #[serde(default)]
    pub replies: Vec<MongoReply>,
}

/// Reply embedded in the `replies` array of a [`MongoThread`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoReply {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub text: String,
    pub delete_password: String,
    pub created_on: DateTime,
    pub reported: bool,
}

/// Result of projecting a thread down to `{ replies: 1 }`
#[derive(Debug, Clone, Deserialize)]
pub struct MongoReplies {
    #[serde(default)]
    pub replies: Vec<MongoReply>,
}

impl MongoThread {
    pub fn new(text: String, delete_password: String) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            text,
            delete_password,
            created_on: now,
            bumped_on: now,
            reported: false,
            replies: Vec::new(),
        }
    }
}

impl MongoReply {
    pub fn new(text: String, delete_password: String, created_on: DateTime) -> Self {
        Self {
            id: ObjectId::new(),
            text,
            delete_password,
            created_on,
            reported: false,
        }
    }
}

// Conversions from MongoDB-specific to database-agnostic models

impl From<MongoReply> for Reply {
    fn from(reply: MongoReply) -> Self {
        Self {
            id: reply.id.to_hex(),
            text: reply.text,
            delete_password: reply.delete_password,
            created_on: reply.created_on.to_chrono(),
            reported: reply.reported,
        }
    }
}

impl From<MongoThread> for Thread {
    fn from(thread: MongoThread) -> Self {
        Self {
            id: thread.id.to_hex(),
            text: thread.text,
            delete_password: thread.delete_password,
            created_on: thread.created_on.to_chrono(),
            bumped_on: thread.bumped_on.to_chrono(),
            reported: thread.reported,
            replies: thread.replies.into_iter().map(Reply::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc};

    #[test]
    fn test_thread_document_shape() {
        let mut thread = MongoThread::new("hello".to_string(), "pass".to_string());
        thread.replies.push(MongoReply::new("hi".to_string(), "no".to_string(), thread.bumped_on));

        let document = bson::to_document(&thread).unwrap();
        assert!(document.get_object_id("_id").is_ok());
        assert!(document.get_datetime("bumped_on").is_ok());
        assert_eq!(document.get_bool("reported").unwrap(), false);

        let replies = document.get_array("replies").unwrap();
        let reply = replies[0].as_document().unwrap();
        assert!(reply.get_object_id("_id").is_ok());
        assert_eq!(reply.get_str("text").unwrap(), "hi");
    }

    #[test]
    fn test_conversion_keeps_secrets_and_hex_ids() {
        let thread = MongoThread::new("hello".to_string(), "pass".to_string());
        let hex = thread.id.to_hex();
        let converted = Thread::from(thread);

        assert_eq!(converted.id, hex);
        assert_eq!(converted.delete_password, "pass");
        assert_eq!(converted.created_on, converted.bumped_on);
    }

    #[test]
    fn test_replies_projection_deserializes() {
        let projected = doc! {
            "_id": ObjectId::new(),
            "replies": [{
                "_id": ObjectId::new(),
                "text": "hi",
                "delete_password": "no",
                "created_on": DateTime::now(),
                "reported": false,
            }],
        };

        let replies: MongoReplies = bson::from_document(projected).unwrap();
        assert_eq!(replies.replies.len(), 1);
        assert_eq!(replies.replies[0].delete_password, "no");
    }
}
