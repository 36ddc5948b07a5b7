//! In-memory storage backends
//!
//! Drop-in [`ObjectStorage`] / [`OperationLog`] implementations holding
//! everything in process memory. Used for local development and for
//! exercising the lifecycle and HTTP layers without MinIO or `PostgreSQL`.

use crate::{ObjectStorage, OperationLog, StorageError, StorageResult};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use zip_depot_common::{OperationLogEntry, StoredObject};

type Buckets = HashMap<String, BTreeMap<String, (Vec<u8>, DateTime<Utc>)>>;

/// In-memory object storage
#[derive(Default)]
pub struct MemoryObjectStorage {
    buckets: RwLock<Buckets>,
    public_buckets: Vec<String>,
    public_base_url: String,
}

impl MemoryObjectStorage {
    /// Empty store with no public buckets
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store serving the given buckets publicly under `base_url`
    #[must_use]
    pub fn with_public_buckets(base_url: &str, buckets: &[&str]) -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            public_buckets: buckets.iter().map(|b| (*b).to_string()).collect(),
            public_base_url: base_url.to_string(),
        }
    }

    /// Number of objects currently held in a bucket
    pub async fn object_count(&self, bucket: &str) -> usize {
        self.buckets
            .read()
            .await
            .get(bucket)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait::async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> StorageResult<()> {
        self.buckets
            .write()
            .await
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), (data.to_vec(), Utc::now()));

        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        self.buckets
            .read()
            .await
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .map(|(data, _)| data.clone())
            .ok_or_else(|| StorageError::NotFound(format!("{bucket}/{key}")))
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> StorageResult<Vec<StoredObject>> {
        let buckets = self.buckets.read().await;

        let objects = buckets
            .get(bucket)
            .map(|objects| {
                objects
                    .iter()
                    .filter(|(key, _)| key.starts_with(prefix))
                    .map(|(key, (data, modified))| StoredObject {
                        key: key.clone(),
                        size: data.len() as u64,
                        last_modified: Some(*modified),
                        public_url: self.public_url(bucket, key),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(objects)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        if let Some(objects) = self.buckets.write().await.get_mut(bucket) {
            objects.remove(key);
        }

        Ok(())
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> StorageResult<()> {
        if let Some(objects) = self.buckets.write().await.get_mut(bucket) {
            for key in keys {
                objects.remove(key);
            }
        }

        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> Option<String> {
        if self.public_buckets.iter().any(|b| b == bucket) {
            Some(format!("{}/{bucket}/{key}", self.public_base_url))
        } else {
            None
        }
    }
}

/// In-memory operation log
#[derive(Default)]
pub struct MemoryOperationLog {
    entries: RwLock<Vec<OperationLogEntry>>,
}

impl MemoryOperationLog {
    /// Empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl OperationLog for MemoryOperationLog {
    async fn init_schema(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn record(&self, entry: &OperationLogEntry) -> StorageResult<()> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn recent(&self, limit: i64) -> StorageResult<Vec<OperationLogEntry>> {
        let entries = self.entries.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);

        Ok(entries.iter().rev().take(limit).cloned().collect())
    }
}
