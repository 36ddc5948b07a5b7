//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zip_depot_common::{FailedEntry, StoredObject};

/// Response to a successful upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Always `true` on a 2xx response
    pub ok: bool,
    /// Storage keys stored successfully, in archive order
    pub uploaded: Vec<String>,
    /// Entries whose upload failed; the rest of the archive still went in
    pub failed: Vec<FailedEntry>,
}

/// One file in a listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Storage key
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Last-modified timestamp when the store reports one
    pub last_modified: Option<DateTime<Utc>>,
    /// Publicly resolvable URL, `null` for private buckets
    pub public_url: Option<String>,
}

impl From<StoredObject> for FileEntry {
    fn from(object: StoredObject) -> Self {
        Self {
            name: object.key,
            size: object.size,
            last_modified: object.last_modified,
            public_url: object.public_url,
        }
    }
}

/// Listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListResponse {
    /// Files under the requested prefix
    pub files: Vec<FileEntry>,
}

/// Response to a mark-done transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkDoneResponse {
    /// Always `true` on a 2xx response
    pub ok: bool,
}

/// Response to a folder delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Always `true` on a 2xx response
    pub success: bool,
    /// Human-readable summary
    pub message: String,
}

/// Report generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Which report to render: "extracted", "completed" or "operations"
    #[serde(rename = "reportType")]
    pub report_type: String,
}

/// Error payload for non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Underlying error message
    pub error: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_entry_uses_camel_case() {
        let entry = FileEntry {
            name: "job1/a.txt".to_string(),
            size: 3,
            last_modified: None,
            public_url: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("publicUrl"));
        assert!(json.contains("lastModified"));
    }

    #[test]
    fn test_report_request_wire_name() {
        let request: ReportRequest =
            serde_json::from_str(r#"{"reportType": "operations"}"#).unwrap();
        assert_eq!(request.report_type, "operations");
    }

    #[test]
    fn test_upload_response_shape() {
        let response = UploadResponse {
            ok: true,
            uploaded: vec!["a.txt".to_string()],
            failed: vec![],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"ok\":true"));
        assert!(json.contains("\"uploaded\""));
        assert!(json.contains("\"failed\""));
    }
}
