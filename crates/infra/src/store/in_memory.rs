use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use itemtrack_core::ItemId;
use itemtrack_inventory::{Item, ItemChanges, NewItem};

use super::{ItemStore, StoreError, sort_by_recency};

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    items: BTreeMap<ItemId, Item>,
}

impl State {
    fn insert(&mut self, item: NewItem, now: chrono::DateTime<Utc>) -> ItemId {
        self.last_id += 1;
        let id = ItemId::new(self.last_id);
        self.items.insert(id, Item::create(id, item, now));
        id
    }
}

/// In-memory item store for tests/dev.
///
/// Ids start at 1 and are never reused, matching an autoincrement column.
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    state: RwLock<State>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Storage("item store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Storage("item store lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl ItemStore for InMemoryItemStore {
    async fn create(&self, item: NewItem) -> Result<ItemId, StoreError> {
        let mut state = self.write()?;
        Ok(state.insert(item, Utc::now()))
    }

    async fn create_batch(&self, items: Vec<NewItem>) -> Result<Vec<ItemId>, StoreError> {
        // A single write guard makes the batch atomic for readers.
        let mut state = self.write()?;
        let now = Utc::now();
        Ok(items.into_iter().map(|item| state.insert(item, now)).collect())
    }

    async fn list_all_by_recency(&self) -> Result<Vec<Item>, StoreError> {
        let mut items: Vec<Item> = self.read()?.items.values().cloned().collect();
        sort_by_recency(&mut items);
        Ok(items)
    }

    async fn get(&self, id: ItemId) -> Result<Item, StoreError> {
        self.read()?
            .items
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, id: ItemId, changes: ItemChanges) -> Result<Item, StoreError> {
        let mut state = self.write()?;
        let item = state.items.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        item.apply_changes(changes);
        Ok(item.clone())
    }

    async fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state
            .items
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(code: &str, quantity: f64, unit_value: f64) -> NewItem {
        NewItem {
            code: code.to_string(),
            description: format!("Item {code}"),
            category: None,
            unit: Some("unidad".to_string()),
            quantity,
            unit_value,
        }
    }

    #[tokio::test]
    async fn create_and_get() {
        let store = InMemoryItemStore::new();
        let id = store.create(new_item("A001", 10.0, 15.0)).await.unwrap();

        let item = store.get(id).await.unwrap();
        assert_eq!(item.code(), "A001");
        assert_eq!(item.total_value(), 150.0);
    }

    #[tokio::test]
    async fn list_is_most_recent_first() {
        let store = InMemoryItemStore::new();
        let first = store.create(new_item("A001", 1.0, 1.0)).await.unwrap();
        let batch = store
            .create_batch(vec![new_item("A002", 1.0, 1.0), new_item("A003", 1.0, 1.0)])
            .await
            .unwrap();

        let ids: Vec<ItemId> = store
            .list_all_by_recency()
            .await
            .unwrap()
            .iter()
            .map(Item::id_typed)
            .collect();
        assert_eq!(ids, vec![batch[1], batch[0], first]);
    }

    #[tokio::test]
    async fn update_recomputes_total() {
        let store = InMemoryItemStore::new();
        let id = store.create(new_item("A001", 10.0, 15.0)).await.unwrap();

        let updated = store
            .update(
                id,
                ItemChanges {
                    quantity: Some(2.0),
                    ..ItemChanges::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.total_value(), 30.0);

        let updated = store
            .update(
                id,
                ItemChanges {
                    category: Some(Some("Periféricos".to_string())),
                    ..ItemChanges::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.total_value(), 30.0);
        assert_eq!(store.get(id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn missing_items_are_not_found() {
        let store = InMemoryItemStore::new();
        let missing = ItemId::new(99);

        assert_eq!(store.get(missing).await, Err(StoreError::NotFound(missing)));
        assert_eq!(
            store.update(missing, ItemChanges::default()).await,
            Err(StoreError::NotFound(missing))
        );
        assert_eq!(store.delete(missing).await, Err(StoreError::NotFound(missing)));
    }

    #[tokio::test]
    async fn delete_removes_and_ids_are_not_reused() {
        let store = InMemoryItemStore::new();
        let id = store.create(new_item("A001", 1.0, 1.0)).await.unwrap();
        store.delete(id).await.unwrap();
        assert!(store.list_all_by_recency().await.unwrap().is_empty());

        let next = store.create(new_item("A002", 1.0, 1.0)).await.unwrap();
        assert!(next > id);
    }
}
