//! Import planning: everything an import does before touching storage.

use super::cell::CellValue;
use super::columns::ColumnMap;
use super::report::{ImportFailure, ImportReport};
use super::row::{RowError, convert_row};
use crate::item::NewItem;

/// Ephemeral state of one import: resolved columns, staged items, row errors.
///
/// Built by [`ImportSession::plan`], consumed by whoever persists the staged
/// items, then turned into an [`ImportReport`].
#[derive(Debug, Clone)]
pub struct ImportSession {
    columns: ColumnMap,
    staged: Vec<NewItem>,
    errors: Vec<RowError>,
}

impl ImportSession {
    /// Resolve the header row and convert every data row.
    ///
    /// `rows` is the first sheet by position: `rows[0]` is sheet row 1 (the
    /// header) and `rows[i]` is sheet row `i + 1`, which is the number used in
    /// error messages. Empty rows are skipped without an error.
    pub fn plan<I, R>(rows: I) -> Result<Self, ImportFailure>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[CellValue]>,
    {
        let mut rows = rows.into_iter();
        let header = rows.next().ok_or(ImportFailure::EmptyFile)?;

        let normalized: Vec<String> = header
            .as_ref()
            .iter()
            .map(CellValue::normalized_header)
            .collect();
        let columns = ColumnMap::resolve(&normalized);

        let missing = columns.missing_mandatory();
        if !missing.is_empty() {
            return Err(ImportFailure::MissingMandatoryColumns(missing));
        }

        let mut session = ImportSession {
            columns,
            staged: Vec::new(),
            errors: Vec::new(),
        };

        for (offset, row) in rows.enumerate() {
            let row_number = offset + 2;
            match convert_row(row.as_ref(), &session.columns, row_number) {
                Ok(Some(item)) => session.staged.push(item),
                Ok(None) => {}
                Err(err) => session.errors.push(err),
            }
        }

        Ok(session)
    }

    pub fn staged(&self) -> &[NewItem] {
        &self.staged
    }

    pub fn row_errors(&self) -> &[RowError] {
        &self.errors
    }

    /// Hand the staged items over for persistence.
    pub fn take_staged(&mut self) -> Vec<NewItem> {
        std::mem::take(&mut self.staged)
    }

    /// Report after the staged items were persisted (`imported` of them).
    pub fn into_report(self, imported: usize) -> ImportReport {
        ImportReport {
            imported_count: imported,
            errors: self.error_messages(),
            failure: None,
        }
    }

    /// Report after persistence failed: nothing counts as imported, row
    /// errors are still reported.
    pub fn into_failed_report(self, failure: ImportFailure) -> ImportReport {
        ImportReport {
            imported_count: 0,
            errors: self.error_messages(),
            failure: Some(failure),
        }
    }

    fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}
