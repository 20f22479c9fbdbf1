//! Demo data for a fresh database.

use itemtrack_core::ItemId;
use itemtrack_inventory::NewItem;

use crate::store::{ItemStore, StoreError};

/// A few sample items (peripherals and monitors).
pub fn demo_items() -> Vec<NewItem> {
    let item = |code: &str, description: &str, category: &str, quantity: f64, unit_value: f64| {
        NewItem {
            code: code.to_string(),
            description: description.to_string(),
            category: Some(category.to_string()),
            unit: Some("unidad".to_string()),
            quantity,
            unit_value,
        }
    };

    vec![
        item("A001", "Mouse USB", "Periféricos", 10.0, 15.0),
        item("A002", "Teclado mecánico", "Periféricos", 5.0, 50.0),
        item("A003", "Monitor 24\"", "Monitores", 3.0, 120.0),
    ]
}

/// Store the demo items as one batch.
pub async fn seed_demo_items(store: &dyn ItemStore) -> Result<Vec<ItemId>, StoreError> {
    store.create_batch(demo_items()).await
}
