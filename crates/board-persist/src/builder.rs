use std::sync::Arc;
#[cfg(feature = "mongodb")]
use std::time::Duration;

use serde::Deserialize;

use crate::dbs::memory::MemoryBoardStore;
use crate::error::{PersistError, Result};
use crate::trait_client::BoardStore;

/// Which [`BoardStore`] implementation to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Mongodb,
    Memory,
}

pub struct BoardStoreBuilder {
    backend: StoreBackend,
    mongodb_uri: Option<String>,
    database: Option<String>,
    pool_size: Option<u32>,
    timeout_ms: Option<u64>,
}

impl BoardStoreBuilder {
    pub fn new() -> Self {
        Self {
            backend: StoreBackend::default(),
            mongodb_uri: None,
            database: None,
            pool_size: None,
            timeout_ms: None,
        }
    }

    pub fn backend(mut self, backend: StoreBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn mongodb_uri(mut self, uri: impl Into<String>) -> Self {
        self.mongodb_uri = Some(uri.into());
        self
    }

    pub fn database(mut self, db: impl Into<String>) -> Self {
        self.database = Some(db.into());
        self
    }

    pub fn pool_size(mut self, size: u32) -> Self {
        self.pool_size = Some(size);
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub async fn build(self) -> Result<Arc<dyn BoardStore>> {
        match self.backend {
            StoreBackend::Memory => Ok(Arc::new(MemoryBoardStore::new())),
            StoreBackend::Mongodb => self.build_mongo().await,
        }
    }

    #[cfg(feature = "mongodb")]
    async fn build_mongo(self) -> Result<Arc<dyn BoardStore>> {
        let mongodb_uri = self
            .mongodb_uri
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| PersistError::Internal("mongodb_uri is required".to_string()))?;
        let database = self
            .database
            .filter(|db| !db.is_empty())
            .ok_or_else(|| PersistError::Internal("database is required".to_string()))?;

        let store = crate::dbs::mongo::MongoBoardStore::connect(
            &mongodb_uri,
            &database,
            self.pool_size,
            self.timeout_ms.map(Duration::from_millis),
        )
        .await?;
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "mongodb"))]
    async fn build_mongo(self) -> Result<Arc<dyn BoardStore>> {
        Err(PersistError::Connection(
            "built without the `mongodb` feature".to_string(),
        ))
    }
}

impl Default for BoardStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
