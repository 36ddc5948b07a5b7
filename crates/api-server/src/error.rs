//! Request-level error taxonomy and HTTP mapping

use crate::types::ErrorResponse;
use axum::extract::multipart::MultipartError;
use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use thiserror::Error;
use zip_depot_archive::ArchiveError;
use zip_depot_report::ReportError;
use zip_depot_storage::StorageError;

/// Errors surfaced to API callers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request (missing upload field, unknown report type)
    #[error("validation error: {0}")]
    Validation(String),

    /// Reading the multipart body failed; keeps the transport's status
    /// (e.g. 413 when the configured size cap is exceeded)
    #[error("upload error: {0}")]
    Upload(#[from] MultipartError),

    /// The uploaded archive could not be decoded; nothing was stored
    #[error("{0}")]
    CorruptArchive(ArchiveError),

    /// A storage call failed at request level
    #[error("storage error: {0}")]
    Store(StorageError),

    /// The addressed folder holds no objects
    #[error("not found: {0}")]
    NotFound(String),

    /// Report rendering failed
    #[error("report error: {0}")]
    Report(#[from] ReportError),
}

impl From<ArchiveError> for ApiError {
    fn from(err: ArchiveError) -> Self {
        ApiError::CorruptArchive(err)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => ApiError::NotFound(what),
            other => ApiError::Store(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) | ApiError::CorruptArchive(_) => StatusCode::BAD_REQUEST,
            ApiError::Upload(e) => e.status(),
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::BAD_GATEWAY,
            ApiError::Report(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ApiError::NotFound("job1".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_corrupt_archive_maps_to_400() {
        let err = ApiError::from(ArchiveError::Corrupt("bad signature".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_not_found_is_rewrapped() {
        let err = ApiError::from(StorageError::NotFound("done/job1".to_string()));
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
