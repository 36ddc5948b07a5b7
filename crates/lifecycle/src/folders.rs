//! Folder transitions between the extracted and completed buckets

use std::sync::Arc;
use tracing::info;
use zip_depot_common::{CompletionMarker, StoredObject, COMPLETION_MARKER};
use zip_depot_storage::{BucketConfig, ObjectStorage, StorageError, StorageResult};

/// Result of a mark-done transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkDoneOutcome {
    /// Objects copied to the completed bucket
    pub copied: usize,
}

/// Moves folders through `extracted → completed → deleted`.
///
/// Holds the shared store client and the two bucket names; constructed once
/// at startup and handed to request handlers.
#[derive(Clone)]
pub struct FolderLifecycle {
    store: Arc<dyn ObjectStorage>,
    buckets: BucketConfig,
}

impl FolderLifecycle {
    /// New manager over the given store and bucket pair
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStorage>, buckets: BucketConfig) -> Self {
        Self { store, buckets }
    }

    fn prefix(folder: &str) -> String {
        format!("{folder}/")
    }

    /// Move a folder's objects from the extracted to the completed bucket
    /// and stamp it with a `.completed.json` marker.
    ///
    /// Runs as copy → marker → batch delete of the sources. The sequence is
    /// not atomic: a failure partway can leave the folder present in both
    /// buckets, or (when only the final delete fails) an orphaned source
    /// folder. There is no compensation or retry.
    ///
    /// An empty (or absent) source folder is a no-op: nothing is copied and
    /// no marker is written, so re-running after a successful transition
    /// does not overwrite the original completion stamp.
    ///
    /// # Errors
    ///
    /// Propagates the first failing store call.
    pub async fn mark_done(&self, folder: &str) -> StorageResult<MarkDoneOutcome> {
        let prefix = Self::prefix(folder);

        let objects = self
            .store
            .list_objects(&self.buckets.extracted, &prefix)
            .await?;

        if objects.is_empty() {
            info!("mark-done on empty folder {folder}, nothing to do");
            return Ok(MarkDoneOutcome { copied: 0 });
        }

        for object in &objects {
            let data = self
                .store
                .get_object(&self.buckets.extracted, &object.key)
                .await?;
            self.store
                .put_object(&self.buckets.completed, &object.key, &data)
                .await?;
        }

        let marker = serde_json::to_vec(&CompletionMarker::now())
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        self.store
            .put_object(
                &self.buckets.completed,
                &format!("{prefix}{COMPLETION_MARKER}"),
                &marker,
            )
            .await?;

        let keys: Vec<String> = objects.iter().map(|o| o.key.clone()).collect();
        self.store
            .delete_objects(&self.buckets.extracted, &keys)
            .await?;

        info!("folder {folder} marked done, {} objects moved", keys.len());

        Ok(MarkDoneOutcome { copied: keys.len() })
    }

    /// List a folder in the extracted bucket
    ///
    /// # Errors
    ///
    /// Propagates store listing failures.
    pub async fn list_extracted(&self, folder: &str) -> StorageResult<Vec<StoredObject>> {
        self.store
            .list_objects(&self.buckets.extracted, &Self::prefix(folder))
            .await
    }

    /// List a folder in the completed bucket
    ///
    /// # Errors
    ///
    /// Propagates store listing failures.
    pub async fn list_completed(&self, folder: &str) -> StorageResult<Vec<StoredObject>> {
        self.store
            .list_objects(&self.buckets.completed, &Self::prefix(folder))
            .await
    }

    /// List everything in the extracted bucket
    ///
    /// # Errors
    ///
    /// Propagates store listing failures.
    pub async fn list_all_extracted(&self) -> StorageResult<Vec<StoredObject>> {
        self.store.list_objects(&self.buckets.extracted, "").await
    }

    /// List everything in the completed bucket
    ///
    /// # Errors
    ///
    /// Propagates store listing failures.
    pub async fn list_all_completed(&self) -> StorageResult<Vec<StoredObject>> {
        self.store.list_objects(&self.buckets.completed, "").await
    }

    /// Remove a folder from the completed bucket in one batch call.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] when the folder holds no objects;
    /// no removal is performed in that case.
    pub async fn delete_completed(&self, folder: &str) -> StorageResult<usize> {
        let objects = self
            .store
            .list_objects(&self.buckets.completed, &Self::prefix(folder))
            .await?;

        if objects.is_empty() {
            return Err(StorageError::NotFound(folder.to_string()));
        }

        let keys: Vec<String> = objects.iter().map(|o| o.key.clone()).collect();
        self.store
            .delete_objects(&self.buckets.completed, &keys)
            .await?;

        info!("folder {folder} deleted, {} objects removed", keys.len());

        Ok(keys.len())
    }
}
