use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use itemtrack_core::{DomainError, Entity, ItemId};

use crate::import::CellValue;

/// A validated item that has not been stored yet (no id, no timestamp).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub code: String,
    pub description: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub quantity: f64,
    pub unit_value: f64,
}

impl NewItem {
    pub fn total_value(&self) -> f64 {
        self.quantity * self.unit_value
    }
}

/// Stored item: the sole domain entity.
///
/// `total_value` is derived; it is recomputed whenever quantity or unit value
/// are set and can't be written directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    id: ItemId,
    code: String,
    description: String,
    category: Option<String>,
    unit: Option<String>,
    quantity: f64,
    unit_value: f64,
    total_value: f64,
    assigned_at: DateTime<Utc>,
}

impl Item {
    /// Materialize a stored item. Stores call this both on insert and when
    /// loading rows back.
    pub fn create(id: ItemId, new: NewItem, assigned_at: DateTime<Utc>) -> Self {
        let total_value = new.total_value();
        Self {
            id,
            code: new.code,
            description: new.description,
            category: new.category,
            unit: new.unit,
            quantity: new.quantity,
            unit_value: new.unit_value,
            total_value,
            assigned_at,
        }
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn unit_value(&self) -> f64 {
        self.unit_value
    }

    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    pub fn assigned_at(&self) -> DateTime<Utc> {
        self.assigned_at
    }

    /// Apply an edit. `id` and `assigned_at` never change.
    pub fn apply_changes(&mut self, changes: ItemChanges) {
        if let Some(code) = changes.code {
            self.code = code;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(unit) = changes.unit {
            self.unit = unit;
        }
        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
        if let Some(unit_value) = changes.unit_value {
            self.unit_value = unit_value;
        }

        self.total_value = self.quantity * self.unit_value;
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A typed, already validated edit. `None` leaves a field untouched;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemChanges {
    pub code: Option<String>,
    pub description: Option<String>,
    pub category: Option<Option<String>>,
    pub unit: Option<Option<String>>,
    pub quantity: Option<f64>,
    pub unit_value: Option<f64>,
}

/// Command: AssignItem (manual entry of a new item).
///
/// Quantity and unit value arrive as raw cells so form strings and JSON
/// numbers share the import conversion rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignItem {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub quantity: CellValue,
    #[serde(default)]
    pub unit_value: CellValue,
}

impl AssignItem {
    /// Same rules as an import row, minus the total-value fallback: code and
    /// description are required, amounts must be numeric and default to zero
    /// when absent or `null`. A provided but blank amount is invalid.
    pub fn validate(&self) -> Result<NewItem, DomainError> {
        let code = required_text(&self.code)?;
        let description = required_text(&self.description)?;

        Ok(NewItem {
            code,
            description,
            category: optional_text(self.category.as_deref()),
            unit: optional_text(self.unit.as_deref()),
            quantity: amount_or_zero(&self.quantity)?,
            unit_value: amount_or_zero(&self.unit_value)?,
        })
    }
}

/// Command: EditItem (manual edit of an existing item).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditItem {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub quantity: Option<CellValue>,
    #[serde(default)]
    pub unit_value: Option<CellValue>,
}

impl EditItem {
    /// Provided fields must satisfy the assign rules; an empty category or
    /// unit clears it.
    pub fn validate(&self) -> Result<ItemChanges, DomainError> {
        Ok(ItemChanges {
            code: self.code.as_deref().map(required_text).transpose()?,
            description: self.description.as_deref().map(required_text).transpose()?,
            category: self.category.as_deref().map(|c| optional_text(Some(c))),
            unit: self.unit.as_deref().map(|u| optional_text(Some(u))),
            quantity: self.quantity.as_ref().map(amount).transpose()?,
            unit_value: self.unit_value.as_ref().map(amount).transpose()?,
        })
    }
}

fn required_text(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("code and description are required"));
    }
    Ok(trimmed.to_string())
}

fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn amount(cell: &CellValue) -> Result<f64, DomainError> {
    cell.as_number()
        .ok_or_else(|| DomainError::validation("quantity and unit value must be valid numbers"))
}

fn amount_or_zero(cell: &CellValue) -> Result<f64, DomainError> {
    if matches!(cell, CellValue::Empty) {
        return Ok(0.0);
    }
    amount(cell)
}
