use chrono::{DateTime, Utc};
use serde::Serialize;

use itemtrack_inventory::{AssignItem, EditItem, Item};

// -------------------------
// Request DTOs
// -------------------------

/// `POST /items`. Amounts may be JSON numbers, numeric strings, or `null`.
pub type AssignItemRequest = AssignItem;

/// `PUT /items/:id`. Omitted fields stay unchanged.
pub type EditItemRequest = EditItem;

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ItemResponse {
    pub id: i64,
    pub code: String,
    pub description: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub quantity: f64,
    pub unit_value: f64,
    pub total_value: f64,
    pub assigned_at: DateTime<Utc>,
}

pub fn item_to_json(item: &Item) -> ItemResponse {
    ItemResponse {
        id: item.id_typed().get(),
        code: item.code().to_string(),
        description: item.description().to_string(),
        category: item.category().map(str::to_string),
        unit: item.unit().map(str::to_string),
        quantity: item.quantity(),
        unit_value: item.unit_value(),
        total_value: item.total_value(),
        assigned_at: item.assigned_at(),
    }
}
