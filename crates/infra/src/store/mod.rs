//! Item persistence.
//!
//! ## Components
//!
//! - `ItemStore`: the persistence contract used by manual CRUD and imports
//! - `InMemoryItemStore`: tests/dev
//! - `SqliteItemStore`: durable store on a SQLite database (sqlx)

pub mod in_memory;
pub mod sqlite;

use std::sync::Arc;

use itemtrack_core::ItemId;
use itemtrack_inventory::{Item, ItemChanges, NewItem};

pub use in_memory::InMemoryItemStore;
pub use sqlite::SqliteItemStore;

/// Item store error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("item not found: {0}")]
    NotFound(ItemId),
    #[error("storage error: {0}")]
    Storage(String),
}

/// Item store abstraction.
///
/// Stores own id assignment and the `assigned_at` timestamp; domain rules
/// (total recomputation) stay in [`Item`].
#[async_trait::async_trait]
pub trait ItemStore: Send + Sync {
    /// Persist a new item, returning its assigned id.
    async fn create(&self, item: NewItem) -> Result<ItemId, StoreError>;

    /// Persist a batch of items all-or-nothing. On error nothing is stored.
    async fn create_batch(&self, items: Vec<NewItem>) -> Result<Vec<ItemId>, StoreError>;

    /// All items, most recently assigned first (ties: highest id first).
    async fn list_all_by_recency(&self) -> Result<Vec<Item>, StoreError>;

    async fn get(&self, id: ItemId) -> Result<Item, StoreError>;

    /// Apply an edit; `total_value` is recomputed.
    async fn update(&self, id: ItemId, changes: ItemChanges) -> Result<Item, StoreError>;

    async fn delete(&self, id: ItemId) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<S> ItemStore for Arc<S>
where
    S: ItemStore + ?Sized,
{
    async fn create(&self, item: NewItem) -> Result<ItemId, StoreError> {
        (**self).create(item).await
    }

    async fn create_batch(&self, items: Vec<NewItem>) -> Result<Vec<ItemId>, StoreError> {
        (**self).create_batch(items).await
    }

    async fn list_all_by_recency(&self) -> Result<Vec<Item>, StoreError> {
        (**self).list_all_by_recency().await
    }

    async fn get(&self, id: ItemId) -> Result<Item, StoreError> {
        (**self).get(id).await
    }

    async fn update(&self, id: ItemId, changes: ItemChanges) -> Result<Item, StoreError> {
        (**self).update(id, changes).await
    }

    async fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        (**self).delete(id).await
    }
}

/// Most recent first; same-instant items fall back to id order.
pub(crate) fn sort_by_recency(items: &mut [Item]) {
    items.sort_by(|a, b| {
        b.assigned_at()
            .cmp(&a.assigned_at())
            .then_with(|| b.id_typed().cmp(&a.id_typed()))
    });
}
