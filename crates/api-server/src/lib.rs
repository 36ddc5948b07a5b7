//! REST API server for the zip depot
//!
//! Receives zip uploads, extracts them into the extracted bucket, manages
//! folder lifecycle transitions and serves PDF reports. All backends are
//! injected through [`ApiState`]; nothing here holds ambient globals.

mod config;
mod error;
mod handlers;
mod types;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use zip_depot_lifecycle::FolderLifecycle;
use zip_depot_storage::{BucketConfig, ObjectStorage, OperationLog};

pub use config::ServerConfig;
pub use error::ApiError;
pub use handlers::*;
pub use types::*;

/// API server state shared across handlers
#[derive(Clone)]
pub struct ApiState {
    /// Object store serving both lifecycle buckets
    pub store: Arc<dyn ObjectStorage>,
    /// Append-only access log
    pub oplog: Arc<dyn OperationLog>,
    /// Folder transition manager over the same store
    pub lifecycle: FolderLifecycle,
    /// Lifecycle bucket names
    pub buckets: BucketConfig,
}

impl ApiState {
    /// Wire the injected backends into one state value
    #[must_use]
    pub fn new(
        store: Arc<dyn ObjectStorage>,
        oplog: Arc<dyn OperationLog>,
        buckets: BucketConfig,
    ) -> Self {
        let lifecycle = FolderLifecycle::new(store.clone(), buckets.clone());
        Self {
            store,
            oplog,
            lifecycle,
            buckets,
        }
    }
}

/// Build the API router with all endpoints
pub fn build_router(state: ApiState, max_upload_bytes: usize) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Upload pipeline
        .route("/upload-zip", post(upload_zip))
        // Listings
        .route("/files", get(list_files))
        .route("/extracted/{folder}/list", get(list_extracted_folder))
        .route("/done/{folder}/list", get(list_completed_folder))
        // Lifecycle transitions
        .route("/extracted/{folder}/done", post(mark_folder_done))
        .route("/done/{folder}/delete", delete(delete_completed_folder))
        // Reporting
        .route("/print/generate", post(generate_report))
        // Middleware
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server
///
/// # Errors
///
/// Returns the bind or serve error.
pub async fn start_server(
    addr: &str,
    state: ApiState,
    max_upload_bytes: usize,
) -> Result<(), std::io::Error> {
    tracing::info!("Starting API server on {}", addr);

    let app = build_router(state, max_upload_bytes);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await
}
