//! Spreadsheet import engine.
//!
//! Pipeline (all pure, no IO):
//! - `normalize`: accent/case-insensitive header canonicalization
//! - `columns`: heuristic header -> field resolution
//! - `row`: per-row validation/conversion into [`NewItem`](crate::item::NewItem)
//! - `session`: runs the above over a whole sheet and stages the results
//! - `report`: the aggregate outcome handed to callers
//!
//! Reading files and persisting staged items live in the infrastructure crate.

pub mod cell;
pub mod columns;
pub mod normalize;
pub mod report;
pub mod row;
pub mod session;

pub use cell::CellValue;
pub use columns::{ColumnMap, Field};
pub use normalize::normalize_header;
pub use report::{ImportFailure, ImportReport};
pub use row::{RowError, RowErrorReason, convert_row};
pub use session::ImportSession;
