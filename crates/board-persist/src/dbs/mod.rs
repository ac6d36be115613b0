use bson::oid::ObjectId;

use crate::error::{PersistError, Result};

pub mod memory;
#[cfg(feature = "mongodb")]
pub mod mongo;

pub(crate) fn parse_object_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|e| PersistError::InvalidObjectId(format!("{}: {}", id, e)))
}
