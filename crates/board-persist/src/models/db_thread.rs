use chrono::{DateTime, Utc};

/// Text a reply carries once it has been deleted.
pub const DELETED_TEXT: &str = "[deleted]";

/// Database-agnostic thread model.
///
/// Carries the delete password and the reported flag, so it is deliberately
/// not `Serialize`. Anything sent to a client goes through [`ThreadView`].
///
/// [`ThreadView`]: crate::models::ThreadView
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    pub id: String,
    pub text: String,
    pub delete_password: String,
    pub created_on: DateTime<Utc>,
    pub bumped_on: DateTime<Utc>,
    pub reported: bool,
    pub replies: Vec<Reply>,
}

/// Database-agnostic reply model, embedded in its parent [`Thread`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub id: String,
    pub text: String,
    pub delete_password: String,
    pub created_on: DateTime<Utc>,
    pub reported: bool,
}

impl Thread {
    /// Plaintext, case-sensitive comparison.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.delete_password == candidate
    }

    pub fn reply(&self, reply_id: &str) -> Option<&Reply> {
        self.replies.iter().find(|reply| reply.id == reply_id)
    }
}

impl Reply {
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.delete_password == candidate
    }

    pub fn is_deleted(&self) -> bool {
        self.text == DELETED_TEXT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(id: &str, text: &str) -> Reply {
        Reply {
            id: id.to_string(),
            text: text.to_string(),
            delete_password: "no".to_string(),
            created_on: Utc::now(),
            reported: false,
        }
    }

    #[test]
    fn test_password_is_case_sensitive() {
        let now = Utc::now();
        let thread = Thread {
            id: "t".to_string(),
            text: "hello".to_string(),
            delete_password: "Pass".to_string(),
            created_on: now,
            bumped_on: now,
            reported: false,
            replies: vec![],
        };

        assert!(thread.password_matches("Pass"));
        assert!(!thread.password_matches("pass"));
        assert!(!thread.password_matches(""));
    }

    #[test]
    fn test_reply_lookup_and_sentinel() {
        let now = Utc::now();
        let thread = Thread {
            id: "t".to_string(),
            text: "hello".to_string(),
            delete_password: "pass".to_string(),
            created_on: now,
            bumped_on: now,
            reported: false,
            replies: vec![reply("a", "first"), reply("b", DELETED_TEXT)],
        };

        assert_eq!(thread.reply("a").map(|r| r.text.as_str()), Some("first"));
        assert!(thread.reply("b").is_some_and(Reply::is_deleted));
        assert!(thread.reply("c").is_none());
    }
}
