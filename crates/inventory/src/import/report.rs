//! Import outcome reporting.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::columns::Field;

/// Failures that stop a whole import (file-level or storage-level).
///
/// Row-level problems are never represented here; they end up in
/// [`ImportReport::errors`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ImportFailure {
    #[error("unsupported file format '{0}'")]
    UnsupportedFormat(String),

    #[error("file could not be read as a spreadsheet: {0}")]
    ParseFailure(String),

    #[error("file is empty (no header row)")]
    EmptyFile,

    #[error("missing mandatory columns: {}", join_fields(.0))]
    MissingMandatoryColumns(Vec<Field>),

    #[error("items could not be stored: {0}")]
    StorageFailure(String),
}

impl ImportFailure {
    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ImportFailure::UnsupportedFormat(_) => "unsupported_format",
            ImportFailure::ParseFailure(_) => "parse_failure",
            ImportFailure::EmptyFile => "empty_file",
            ImportFailure::MissingMandatoryColumns(_) => "missing_mandatory_columns",
            ImportFailure::StorageFailure(_) => "storage_failure",
        }
    }
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Aggregate outcome of one import batch.
///
/// `errors` always carries every row error; truncating for display is the
/// caller's business.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported_count: usize,
    pub errors: Vec<String>,
    pub failure: Option<ImportFailure>,
}

impl ImportReport {
    /// Report for an import stopped before any row was processed.
    pub fn rejected_with(failure: ImportFailure) -> Self {
        Self {
            imported_count: 0,
            errors: Vec::new(),
            failure: Some(failure),
        }
    }

    pub fn rejected(&self) -> bool {
        self.failure.is_some()
    }

    pub fn rejection_reason(&self) -> Option<String> {
        self.failure.as_ref().map(ToString::to_string)
    }
}

/// Wire shape: `{imported_count, errors, rejected, rejection_reason, failure_kind}`.
impl Serialize for ImportReport {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("ImportReport", 5)?;
        s.serialize_field("imported_count", &self.imported_count)?;
        s.serialize_field("errors", &self.errors)?;
        s.serialize_field("rejected", &self.rejected())?;
        s.serialize_field("rejection_reason", &self.rejection_reason())?;
        s.serialize_field("failure_kind", &self.failure.as_ref().map(ImportFailure::kind))?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_message_names_fields() {
        let failure = ImportFailure::MissingMandatoryColumns(vec![Field::Code, Field::Quantity]);
        assert_eq!(failure.to_string(), "missing mandatory columns: code, quantity");
        assert_eq!(failure.kind(), "missing_mandatory_columns");
    }

    #[test]
    fn rejected_report_has_reason_and_no_imports() {
        let report = ImportReport::rejected_with(ImportFailure::EmptyFile);
        assert!(report.rejected());
        assert_eq!(report.imported_count, 0);
        assert_eq!(report.rejection_reason().as_deref(), Some("file is empty (no header row)"));
    }

    #[test]
    fn accepted_report_has_no_reason() {
        let report = ImportReport {
            imported_count: 3,
            errors: vec!["Row 4: quantity is not a valid number".to_string()],
            failure: None,
        };
        assert!(!report.rejected());
        assert_eq!(report.rejection_reason(), None);
    }
}
