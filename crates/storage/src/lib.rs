//! Storage layer for the zip depot
//!
//! This crate provides the two remote backends the service talks to:
//! - **Object Storage (S3/MinIO)**: the extracted and completed buckets
//! - **Operation Log (`PostgreSQL`)**: the append-only access log
//!
//! Both are exposed as traits so handlers and the lifecycle manager depend on
//! capabilities, not on concrete clients. An in-memory object store backs
//! local development and tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use zip_depot_storage::{ObjectStorage, S3Config, S3ObjectStorage, StorageResult};
//!
//! #[tokio::main]
//! async fn main() -> StorageResult<()> {
//!     let config = S3Config::from_env()?;
//!     let storage = S3ObjectStorage::new(config).await?;
//!
//!     storage.put_object("extracted", "job1/a.txt", b"data").await?;
//!     let bytes = storage.get_object("extracted", "job1/a.txt").await?;
//!     assert_eq!(bytes, b"data");
//!
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod memory;
pub mod object_storage;
pub mod operation_log;

pub use memory::{MemoryObjectStorage, MemoryOperationLog};
pub use object_storage::{ObjectStorage, S3Config, S3ObjectStorage};
pub use operation_log::{OperationLog, PostgresConfig, PostgresOperationLog};

/// Storage layer errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("S3 error: {0}")]
    S3Error(String),

    #[error("PostgreSQL error: {0}")]
    PostgresError(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Names of the two lifecycle buckets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Bucket uploads are extracted into
    pub extracted: String,

    /// Bucket folders move to when marked done
    pub completed: String,
}

impl BucketConfig {
    /// Read bucket names from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidConfig`] when either name is absent.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self {
            extracted: require_env("DEPOT_EXTRACTED_BUCKET")?,
            completed: require_env("DEPOT_COMPLETED_BUCKET")?,
        })
    }
}

/// Complete storage configuration for both backends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// S3/MinIO configuration for object storage
    pub s3: S3Config,

    /// `PostgreSQL` configuration for the operation log
    pub postgres: PostgresConfig,

    /// Lifecycle bucket names
    pub buckets: BucketConfig,
}

impl StorageConfig {
    /// Read the full storage configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidConfig`] naming the first missing
    /// required variable; the process is expected to refuse to start.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self {
            s3: S3Config::from_env()?,
            postgres: PostgresConfig::from_env()?,
            buckets: BucketConfig::from_env()?,
        })
    }
}

pub(crate) fn require_env(name: &str) -> StorageResult<String> {
    std::env::var(name)
        .map_err(|_| StorageError::InvalidConfig(format!("missing environment variable {name}")))
}
