//! Import batch runner: reads an uploaded file, plans the import, and persists
//! the staged items in one all-or-nothing batch.

use tracing::instrument;

use itemtrack_inventory::{ImportFailure, ImportReport, ImportSession};

use crate::spreadsheet::{self, SheetFormat, SpreadsheetError};
use crate::store::ItemStore;

/// An uploaded file as received from the HTTP layer.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Run one import end to end.
///
/// Never returns an error: every failure is folded into the report. File-level
/// and storage-level failures leave the store untouched; row-level failures
/// only skip their row.
#[instrument(skip(store, upload), fields(file_name = %upload.file_name, size = upload.bytes.len()))]
pub async fn run_import(store: &dyn ItemStore, upload: &Upload) -> ImportReport {
    let mut session = match plan(upload) {
        Ok(session) => session,
        Err(failure) => {
            tracing::warn!(kind = failure.kind(), reason = %failure, "import rejected");
            return ImportReport::rejected_with(failure);
        }
    };

    let staged = session.take_staged();
    let staged_count = staged.len();

    match store.create_batch(staged).await {
        Ok(ids) => {
            let report = session.into_report(ids.len());
            tracing::info!(
                imported = report.imported_count,
                row_errors = report.errors.len(),
                "import completed"
            );
            report
        }
        Err(err) => {
            tracing::error!(error = %err, staged = staged_count, "import batch discarded");
            session.into_failed_report(ImportFailure::StorageFailure(err.to_string()))
        }
    }
}

fn plan(upload: &Upload) -> Result<ImportSession, ImportFailure> {
    let format = SheetFormat::from_file_name(&upload.file_name).map_err(to_failure)?;
    let rows = spreadsheet::read_first_sheet(format, &upload.bytes).map_err(to_failure)?;
    ImportSession::plan(rows)
}

fn to_failure(err: SpreadsheetError) -> ImportFailure {
    match err {
        SpreadsheetError::UnsupportedFormat(ext) => ImportFailure::UnsupportedFormat(ext),
        SpreadsheetError::Unreadable(detail) => ImportFailure::ParseFailure(detail),
    }
}
