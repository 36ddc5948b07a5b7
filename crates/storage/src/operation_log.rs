//! Append-only operation log backed by `PostgreSQL`
//!
//! Every user-visible action (upload, mark-done, delete, report) is recorded
//! as `{username, role, action, created_at}`. The table is insert-only; the
//! only read path is the newest-first page the operations report consumes.

use crate::{require_env, StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use tokio_postgres::{Client, NoTls};
use zip_depot_common::OperationLogEntry;

/// `PostgreSQL` configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    /// Database host
    pub host: String,

    /// Database port
    pub port: u16,

    /// Database name
    pub database: String,

    /// Database user
    pub user: String,

    /// Database password
    pub password: String,
}

impl PostgresConfig {
    /// Read the database configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidConfig`] when host, database or user
    /// is absent.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self {
            host: require_env("DEPOT_POSTGRES_HOST")?,
            port: std::env::var("DEPOT_POSTGRES_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5432),
            database: require_env("DEPOT_POSTGRES_DB")?,
            user: require_env("DEPOT_POSTGRES_USER")?,
            password: std::env::var("DEPOT_POSTGRES_PASSWORD").unwrap_or_default(),
        })
    }

    /// Build connection string
    #[must_use]
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            self.host, self.port, self.database, self.user, self.password
        )
    }
}

/// Operation log trait
#[async_trait::async_trait]
pub trait OperationLog: Send + Sync {
    /// Initialize the schema (create the table if it does not exist)
    async fn init_schema(&self) -> StorageResult<()>;

    /// Append one entry
    async fn record(&self, entry: &OperationLogEntry) -> StorageResult<()>;

    /// Read the newest entries, most recent first
    async fn recent(&self, limit: i64) -> StorageResult<Vec<OperationLogEntry>>;
}

/// `PostgreSQL` operation log implementation
pub struct PostgresOperationLog {
    client: Client,
}

impl PostgresOperationLog {
    /// Connect to the database and spawn the connection task
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::PostgresError`] when the connection fails.
    pub async fn new(config: PostgresConfig) -> StorageResult<Self> {
        let (client, connection) = tokio_postgres::connect(&config.connection_string(), NoTls)
            .await
            .map_err(|e| StorageError::PostgresError(e.to_string()))?;

        // Drive the connection in the background
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl OperationLog for PostgresOperationLog {
    async fn init_schema(&self) -> StorageResult<()> {
        self.client
            .execute(
                r"
                CREATE TABLE IF NOT EXISTS operation_log (
                    id SERIAL PRIMARY KEY,
                    username TEXT NOT NULL,
                    role TEXT NOT NULL,
                    action TEXT NOT NULL,
                    created_at TIMESTAMP WITH TIME ZONE NOT NULL
                )
                ",
                &[],
            )
            .await
            .map_err(|e| StorageError::PostgresError(e.to_string()))?;

        self.client
            .execute(
                "CREATE INDEX IF NOT EXISTS idx_operation_log_created_at ON operation_log(created_at)",
                &[],
            )
            .await
            .map_err(|e| StorageError::PostgresError(e.to_string()))?;

        tracing::info!("operation log schema initialized");

        Ok(())
    }

    async fn record(&self, entry: &OperationLogEntry) -> StorageResult<()> {
        self.client
            .execute(
                r"
                INSERT INTO operation_log (username, role, action, created_at)
                VALUES ($1, $2, $3, $4)
                ",
                &[
                    &entry.username,
                    &entry.role,
                    &entry.action,
                    &entry.created_at,
                ],
            )
            .await
            .map_err(|e| StorageError::PostgresError(e.to_string()))?;

        Ok(())
    }

    async fn recent(&self, limit: i64) -> StorageResult<Vec<OperationLogEntry>> {
        let rows = self
            .client
            .query(
                r"
                SELECT username, role, action, created_at
                FROM operation_log
                ORDER BY created_at DESC
                LIMIT $1
                ",
                &[&limit],
            )
            .await
            .map_err(|e| StorageError::PostgresError(e.to_string()))?;

        let entries = rows
            .into_iter()
            .map(|row| OperationLogEntry {
                username: row.get(0),
                role: row.get(1),
                action: row.get(2),
                created_at: row.get(3),
            })
            .collect();

        Ok(entries)
    }
}
