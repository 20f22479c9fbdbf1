use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Multipart, multipart::MultipartError},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use itemtrack_infra::{Upload, run_import};

use crate::app::errors;
use crate::app::services::AppServices;

/// Multipart field carrying the spreadsheet.
pub const FILE_FIELD: &str = "file";

pub fn router() -> Router {
    Router::new().route("/import", post(import_items))
}

/// Bulk import from an uploaded spreadsheet; responds with the import report.
pub async fn import_items(
    Extension(services): Extension<Arc<AppServices>>,
    mut multipart: Multipart,
) -> axum::response::Response {
    let upload = match read_upload(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "missing_file",
                format!("multipart field '{FILE_FIELD}' is required"),
            );
        }
        Err(e) => return errors::json_error(e.status(), "invalid_upload", e.body_text()),
    };

    let report = run_import(services.store(), &upload).await;
    (errors::import_status(&report), Json(report)).into_response()
}

async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        return Ok(Some(Upload::new(file_name, bytes.to_vec())));
    }
    Ok(None)
}
