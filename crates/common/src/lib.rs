/// Common types shared across the zip depot crates
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Object name of the completion marker written next to a folder's files
/// when it transitions to the completed bucket.
pub const COMPLETION_MARKER: &str = ".completed.json";

/// A single object as reported by a bucket listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredObject {
    /// Storage key (sanitized relative path within the bucket)
    pub key: String,

    /// Object size in bytes
    pub size: u64,

    /// Last-modified timestamp, when the store reports one
    pub last_modified: Option<DateTime<Utc>>,

    /// Publicly resolvable retrieval URL, `None` for private buckets
    pub public_url: Option<String>,
}

/// A bulk-operation entry that failed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailedEntry {
    /// Storage key the operation targeted
    pub key: String,

    /// Why it failed
    pub reason: String,
}

/// Aggregated result of a bulk store operation.
///
/// Failed entries do not abort the remaining ones; callers decide whether a
/// non-empty `failed` list is acceptable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkOutcome {
    /// Keys that were stored/removed successfully, in processing order
    pub succeeded: Vec<String>,

    /// Entries that failed, with the underlying error message
    pub failed: Vec<FailedEntry>,
}

impl BulkOutcome {
    /// True when every entry succeeded
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Payload of the `<folder>/.completed.json` marker object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionMarker {
    /// Local wall-clock time the folder was marked done
    #[serde(rename = "completedAt")]
    pub completed_at: DateTime<Local>,
}

impl CompletionMarker {
    /// Marker stamped with the current local time
    #[must_use]
    pub fn now() -> Self {
        Self {
            completed_at: Local::now(),
        }
    }
}

/// One append-only access-log record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationLogEntry {
    /// Acting user
    pub username: String,

    /// Role the user acted under
    pub role: String,

    /// What was done (e.g. "upload-zip", "mark-done")
    pub action: String,

    /// When the operation ran
    pub created_at: DateTime<Utc>,
}

impl OperationLogEntry {
    /// Entry for an action performed right now
    #[must_use]
    pub fn new(username: impl Into<String>, role: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: role.into(),
            action: action.into(),
            created_at: Utc::now(),
        }
    }
}
