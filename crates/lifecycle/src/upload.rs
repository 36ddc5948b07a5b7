//! The upload pipeline: archive in, populated bucket out

use tracing::warn;
use zip_depot_archive::{sanitize_entry_path, ArchiveError, ZipExtractor};
use zip_depot_common::{BulkOutcome, FailedEntry};
use zip_depot_storage::ObjectStorage;

/// Extract a zip buffer into the given bucket.
///
/// The whole archive is decoded up front, so a corrupt buffer fails the
/// request before anything is uploaded. Per entry: directories are skipped,
/// the raw path is sanitized into a storage key (entries that sanitize to
/// nothing are skipped), and the bytes are stored with overwrite-on-conflict
/// semantics.
///
/// A failed upload does not abort the remaining entries; it is warned and
/// collected into [`BulkOutcome::failed`].
///
/// # Errors
///
/// Returns [`ArchiveError`] only for an undecodable archive. Store failures
/// are per-entry and reported through the outcome.
pub async fn store_archive(
    store: &dyn ObjectStorage,
    bucket: &str,
    data: Vec<u8>,
) -> Result<BulkOutcome, ArchiveError> {
    let entries = ZipExtractor::open(data)?.into_entries()?;

    let mut outcome = BulkOutcome::default();

    for entry in entries {
        let Some(key) = sanitize_entry_path(&entry.raw_path) else {
            warn!("skipping entry with no usable path: {}", entry.raw_path);
            continue;
        };

        match store.put_object(bucket, &key, &entry.bytes).await {
            Ok(()) => outcome.succeeded.push(key),
            Err(e) => {
                warn!("failed to store {key}: {e}");
                outcome.failed.push(FailedEntry {
                    key,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(outcome)
}
