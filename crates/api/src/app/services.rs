use std::sync::Arc;

use itemtrack_infra::{InMemoryItemStore, ItemStore, SqliteItemStore, StoreError};

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn ItemStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// Dev/test wiring: everything lives in process memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryItemStore::new()))
    }

    /// Persistent wiring on a SQLite database.
    pub async fn sqlite(database_url: &str) -> Result<Self, StoreError> {
        let store = SqliteItemStore::connect(database_url).await?;
        Ok(Self::new(Arc::new(store)))
    }

    pub fn store(&self) -> &dyn ItemStore {
        self.store.as_ref()
    }
}
