use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::services::UploadError;
use crate::state::AppState;

/// Multipart field carrying the file
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// POST /api/admin/uploads - store one file and return its public path
///
/// The body is streamed into memory chunk by chunk and abandoned as soon as
/// it passes the byte ceiling, so a rejected upload never touches disk.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let uploads = &state.uploads;
    let max_bytes = uploads.max_bytes();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or(UploadError::MissingFilename)?;
        uploads.check_extension(&filename)?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, max_bytes))? {
            uploads.check_size(bytes.len() + chunk.len())?;
            bytes.extend_from_slice(&chunk);
        }

        let url = uploads.store(&filename, &bytes).await?;
        return Ok(Json(UploadResponse { url }));
    }

    Err(UploadError::MissingFile.into())
}

/// Body-limit hits surface as the same size error as an oversized file.
fn multipart_error(err: MultipartError, max_bytes: usize) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge { max_bytes }
    } else {
        UploadError::Malformed(err.body_text())
    }
}
