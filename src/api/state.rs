use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;

/// Everything a handler needs, built once at startup and cloned per request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}
