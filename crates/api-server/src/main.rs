//! API Server Binary Entry Point

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zip_depot_api_server::{start_server, ApiState, ServerConfig};
use zip_depot_storage::{OperationLog, PostgresOperationLog, S3ObjectStorage, StorageConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zip_depot_api_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration is read once; a missing required value aborts startup.
    let server = ServerConfig::from_env()?;
    let storage = StorageConfig::from_env()?;

    let store = Arc::new(S3ObjectStorage::new(storage.s3).await?);
    let oplog = Arc::new(PostgresOperationLog::new(storage.postgres).await?);
    oplog.init_schema().await?;

    let state = ApiState::new(store, oplog, storage.buckets);

    tracing::info!("Starting Zip Depot API Server");
    start_server(&server.addr, state, server.max_upload_bytes).await?;

    Ok(())
}
