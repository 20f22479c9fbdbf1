//! Inventory domain module.
//!
//! This crate contains business rules for tracked items and spreadsheet
//! imports, implemented purely as deterministic domain logic (no IO, no HTTP,
//! no storage).

pub mod import;
pub mod item;

pub use import::{CellValue, ImportFailure, ImportReport, ImportSession};
pub use item::{AssignItem, EditItem, Item, ItemChanges, NewItem};
