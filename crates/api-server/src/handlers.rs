//! HTTP request handlers for API endpoints

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use tracing::{info, warn};

use crate::{
    ApiError, ApiState, DeleteResponse, FileListResponse, HealthResponse, MarkDoneResponse,
    ReportRequest, UploadResponse,
};
use zip_depot_common::OperationLogEntry;
use zip_depot_report::{render, ReportData, ReportKind};

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Receive a zip archive and extract it into the extracted bucket.
///
/// The archive arrives as the multipart field `file`. A corrupt archive
/// fails the whole request before anything is stored; per-entry upload
/// failures degrade to partial success and are reported in `failed`.
pub async fn upload_zip(
    State(state): State<ApiState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut archive: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            let bytes = field.bytes().await?;
            archive = Some(bytes.to_vec());
            break;
        }
    }

    let archive = archive.ok_or_else(|| {
        ApiError::Validation("missing multipart field \"file\"".to_string())
    })?;

    info!("upload received, {} bytes", archive.len());

    let outcome =
        zip_depot_lifecycle::store_archive(state.store.as_ref(), &state.buckets.extracted, archive)
            .await?;

    if !outcome.is_complete() {
        warn!("{} entries failed to store", outcome.failed.len());
    }

    record_operation(&state, &headers, "upload-zip").await;

    Ok(Json(UploadResponse {
        ok: true,
        uploaded: outcome.succeeded,
        failed: outcome.failed,
    }))
}

/// List the extracted bucket
pub async fn list_files(
    State(state): State<ApiState>,
) -> Result<Json<FileListResponse>, ApiError> {
    let files = state.lifecycle.list_all_extracted().await?;

    Ok(Json(FileListResponse {
        files: files.into_iter().map(Into::into).collect(),
    }))
}

/// List one folder in the extracted bucket
pub async fn list_extracted_folder(
    State(state): State<ApiState>,
    Path(folder): Path<String>,
) -> Result<Json<FileListResponse>, ApiError> {
    let files = state.lifecycle.list_extracted(&folder).await?;

    Ok(Json(FileListResponse {
        files: files.into_iter().map(Into::into).collect(),
    }))
}

/// List one folder in the completed bucket
pub async fn list_completed_folder(
    State(state): State<ApiState>,
    Path(folder): Path<String>,
) -> Result<Json<FileListResponse>, ApiError> {
    let files = state.lifecycle.list_completed(&folder).await?;

    Ok(Json(FileListResponse {
        files: files.into_iter().map(Into::into).collect(),
    }))
}

/// Move a folder from the extracted to the completed bucket
pub async fn mark_folder_done(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(folder): Path<String>,
) -> Result<Json<MarkDoneResponse>, ApiError> {
    let outcome = state.lifecycle.mark_done(&folder).await?;
    info!("marked {folder} done, {} objects copied", outcome.copied);

    record_operation(&state, &headers, "mark-done").await;

    Ok(Json(MarkDoneResponse { ok: true }))
}

/// Delete a folder from the completed bucket
pub async fn delete_completed_folder(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(folder): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let removed = state.lifecycle.delete_completed(&folder).await?;

    record_operation(&state, &headers, "delete-folder").await;

    Ok(Json(DeleteResponse {
        success: true,
        message: format!("folder {folder} removed ({removed} objects)"),
    }))
}

/// Render a PDF report over one of the buckets or the operation log
pub async fn generate_report(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(request): Json<ReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = ReportKind::parse(&request.report_type).ok_or_else(|| {
        ApiError::Validation(format!("unknown reportType: {}", request.report_type))
    })?;

    let data = match kind {
        ReportKind::Extracted => ReportData::Inventory {
            title: "Extracted Files".to_string(),
            files: state.lifecycle.list_all_extracted().await?,
        },
        ReportKind::Completed => ReportData::Inventory {
            title: "Completed Files".to_string(),
            files: state.lifecycle.list_all_completed().await?,
        },
        ReportKind::Operations => ReportData::Operations {
            entries: state.oplog.recent(200).await?,
        },
    };

    let bytes = render(&data)?;
    info!("rendered {} report, {} bytes", request.report_type, bytes.len());

    record_operation(&state, &headers, "generate-report").await;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}-report.pdf\"", request.report_type),
            ),
        ],
        bytes,
    ))
}

/// Append to the operation log, best-effort.
///
/// Identity comes from the `x-depot-user` / `x-depot-role` headers set by
/// the auth layer in front of this service. A log failure must not fail the
/// caller's request.
async fn record_operation(state: &ApiState, headers: &HeaderMap, action: &str) {
    let username = header_value(headers, "x-depot-user").unwrap_or("anonymous");
    let role = header_value(headers, "x-depot-role").unwrap_or("user");

    let entry = OperationLogEntry::new(username, role, action);
    if let Err(e) = state.oplog.record(&entry).await {
        warn!("failed to record operation {action}: {e}");
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_value_missing() {
        let headers = HeaderMap::new();
        assert_eq!(header_value(&headers, "x-depot-user"), None);
    }

    #[test]
    fn test_header_value_present() {
        let mut headers = HeaderMap::new();
        headers.insert("x-depot-user", "alice".parse().unwrap());
        assert_eq!(header_value(&headers, "x-depot-user"), Some("alice"));
    }
}
