//! Object storage implementation using S3/MinIO
//!
//! Buckets are flat namespaces of keyed byte blobs; "folders" are only a key
//! prefix convention. All operations take the bucket explicitly so the same
//! client serves both lifecycle buckets.

use crate::{require_env, StorageError, StorageResult};
use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    types::{Delete, ObjectIdentifier},
    Client,
};
use serde::{Deserialize, Serialize};
use zip_depot_common::StoredObject;

/// S3/MinIO configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// S3 endpoint (e.g. `http://localhost:9000` for `MinIO`)
    pub endpoint: String,

    /// AWS region, "us-east-1" for `MinIO`
    pub region: String,

    /// Access key ID
    pub access_key_id: String,

    /// Secret access key
    pub secret_access_key: String,

    /// Buckets whose objects are publicly retrievable
    pub public_buckets: Vec<String>,

    /// Base URL public object URLs are built from; defaults to the endpoint
    pub public_base_url: String,
}

impl S3Config {
    /// Read the S3 configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidConfig`] when the endpoint or either
    /// credential is absent.
    pub fn from_env() -> StorageResult<Self> {
        let endpoint = require_env("DEPOT_S3_ENDPOINT")?;
        let public_base_url =
            std::env::var("DEPOT_PUBLIC_BASE_URL").unwrap_or_else(|_| endpoint.clone());

        Ok(Self {
            endpoint,
            region: std::env::var("DEPOT_S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            access_key_id: require_env("DEPOT_S3_ACCESS_KEY_ID")?,
            secret_access_key: require_env("DEPOT_S3_SECRET_ACCESS_KEY")?,
            public_buckets: std::env::var("DEPOT_PUBLIC_BUCKETS")
                .unwrap_or_default()
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            public_base_url,
        })
    }
}

/// Object storage trait
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store an object, overwriting any existing object at the key
    async fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> StorageResult<()>;

    /// Retrieve an object's bytes
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>>;

    /// List objects under a key prefix, annotated with public URLs
    async fn list_objects(&self, bucket: &str, prefix: &str) -> StorageResult<Vec<StoredObject>>;

    /// Delete a single object
    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()>;

    /// Delete a set of objects in one batch call
    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> StorageResult<()>;

    /// Publicly resolvable URL for an object, `None` for private buckets
    fn public_url(&self, bucket: &str, key: &str) -> Option<String>;
}

/// S3/MinIO object storage implementation
pub struct S3ObjectStorage {
    client: Client,
    public_buckets: Vec<String>,
    public_base_url: String,
}

impl S3ObjectStorage {
    /// Create a new S3 object storage client
    ///
    /// # Errors
    ///
    /// Currently infallible beyond config construction; kept fallible to
    /// match the other backend constructors.
    pub async fn new(config: S3Config) -> StorageResult<Self> {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "zip-depot-storage",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .credentials_provider(credentials)
            .region(Region::new(config.region.clone()))
            .behavior_version_latest()
            .endpoint_url(&config.endpoint)
            .force_path_style(true) // Required for MinIO
            .build();

        Ok(Self {
            client: Client::from_conf(s3_config),
            public_buckets: config.public_buckets,
            public_base_url: config.public_base_url,
        })
    }
}

#[async_trait::async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> StorageResult<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|e| StorageError::S3Error(e.to_string()))?;

        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("NoSuchKey") {
                    StorageError::NotFound(format!("{bucket}/{key}"))
                } else {
                    StorageError::S3Error(e.to_string())
                }
            })?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::S3Error(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> StorageResult<Vec<StoredObject>> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .send()
            .await
            .map_err(|e| StorageError::S3Error(e.to_string()))?;

        let objects = response
            .contents()
            .iter()
            .filter_map(|obj| {
                let key = obj.key()?.to_string();
                let public_url = self.public_url(bucket, &key);
                Some(StoredObject {
                    size: obj.size().unwrap_or(0).unsigned_abs(),
                    last_modified: obj.last_modified().and_then(|t| {
                        chrono::DateTime::from_timestamp(t.secs(), t.subsec_nanos())
                    }),
                    public_url,
                    key,
                })
            })
            .collect();

        Ok(objects)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::S3Error(e.to_string()))?;

        Ok(())
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> StorageResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let identifiers = keys
            .iter()
            .map(|key| {
                ObjectIdentifier::builder()
                    .key(key)
                    .build()
                    .map_err(|e| StorageError::S3Error(e.to_string()))
            })
            .collect::<StorageResult<Vec<_>>>()?;

        let delete = Delete::builder()
            .set_objects(Some(identifiers))
            .build()
            .map_err(|e| StorageError::S3Error(e.to_string()))?;

        self.client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| StorageError::S3Error(e.to_string()))?;

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
