use std::sync::Arc;

use board_persist::BoardStore;

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// The store is built once at startup and shared behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn BoardStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn BoardStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
