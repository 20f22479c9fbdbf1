use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use itemtrack_core::DomainError;
use itemtrack_infra::StoreError;
use itemtrack_inventory::{ImportFailure, ImportReport};

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound(id) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("item {id} not found"))
        }
        StoreError::Storage(msg) => {
            tracing::error!(error = %msg, "store operation failed");
            json_error(StatusCode::SERVICE_UNAVAILABLE, "storage_error", msg)
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

/// Status for a finished import; the body is always the report itself.
pub fn import_status(report: &ImportReport) -> StatusCode {
    match &report.failure {
        None => StatusCode::OK,
        Some(ImportFailure::UnsupportedFormat(_)) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        Some(
            ImportFailure::ParseFailure(_)
            | ImportFailure::EmptyFile
            | ImportFailure::MissingMandatoryColumns(_),
        ) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(ImportFailure::StorageFailure(_)) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
