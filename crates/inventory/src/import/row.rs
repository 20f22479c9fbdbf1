//! Per-row validation and conversion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cell::CellValue;
use super::columns::{ColumnMap, Field};
use crate::item::NewItem;

/// Why a single import row was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum RowErrorReason {
    #[error("required field '{0}' is empty")]
    EmptyRequiredField(Field),

    #[error("quantity is not a valid number")]
    InvalidQuantity,

    #[error("unit value is not a valid number and cannot be derived from the total")]
    InvalidUnitValue,
}

/// A rejected row, numbered the way a spreadsheet user sees it (the header is
/// row 1).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Row {row_number}: {reason}")]
pub struct RowError {
    pub row_number: usize,
    pub reason: RowErrorReason,
}

/// Convert one raw row into an unsaved item.
///
/// Returns `Ok(None)` for a fully blank row, which callers skip without
/// recording anything.
pub fn convert_row(
    row: &[CellValue],
    columns: &ColumnMap,
    row_number: usize,
) -> Result<Option<NewItem>, RowError> {
    if row.iter().all(CellValue::is_blank) {
        return Ok(None);
    }

    let reject = |reason| RowError { row_number, reason };
    let cell = |field: Field| {
        columns
            .index_of(field)
            .and_then(|idx| row.get(idx))
            .unwrap_or(&CellValue::Empty)
    };

    let code = cell(Field::Code)
        .as_text()
        .ok_or_else(|| reject(RowErrorReason::EmptyRequiredField(Field::Code)))?;
    let description = cell(Field::Description)
        .as_text()
        .ok_or_else(|| reject(RowErrorReason::EmptyRequiredField(Field::Description)))?;

    let category = cell(Field::Category).as_text();
    let unit = cell(Field::Unit).as_text();

    let quantity = cell(Field::Quantity)
        .as_number()
        .ok_or_else(|| reject(RowErrorReason::InvalidQuantity))?;

    let unit_value = match cell(Field::UnitValue).as_number() {
        Some(value) => value,
        None => derive_unit_value(cell(Field::TotalValue), quantity)
            .ok_or_else(|| reject(RowErrorReason::InvalidUnitValue))?,
    };

    Ok(Some(NewItem {
        code,
        description,
        category,
        unit,
        quantity,
        unit_value,
    }))
}

/// Back out a unit value from a row total. Only used when the unit value cell
/// itself is unusable.
fn derive_unit_value(total: &CellValue, quantity: f64) -> Option<f64> {
    if quantity == 0.0 {
        return None;
    }
    let unit_value = total.as_number()? / quantity;
    unit_value.is_finite().then_some(unit_value)
}
