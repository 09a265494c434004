//! HTTP server for docxgen.
//!
//! Exposes a single endpoint that turns plain text or Markdown into a DOCX
//! document, uploads it to blob storage and returns the document URL.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use docxgen_server::{ServerConfig, StoreConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         storage: StoreConfig::Fs {
//!             root: PathBuf::from("blobs"),
//!             public_base_url: None,
//!         },
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Client ──POST /api/text-to-docx──► axum router (CORS, trace, body limit)
//!                                         │
//!                                         ├─► docxgen-convert (text ─► DOCX bytes)
//!                                         │
//!                                         └─► docxgen-storage (bytes ─► URL)
//! ```

mod app;
mod document;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use docxgen_config::{ConfigError, StorageBackend};
use docxgen_storage::{BlobStore, FsBlobStore, S3BlobStore, S3Config};
use state::AppState;

/// Default request body limit (2 MiB).
const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Blob store selection.
#[derive(Clone, Debug)]
pub enum StoreConfig {
    /// Upload to S3 or an S3-compatible service.
    S3(S3Config),
    /// Write below a local directory.
    Fs {
        /// Root directory.
        root: PathBuf,
        /// Base URL the directory is served from.
        public_base_url: Option<String>,
    },
}

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Request body size limit in bytes.
    pub max_body_bytes: usize,
    /// Include error details in 500 responses.
    pub expose_error_details: bool,
    /// Key prefix for uploaded documents.
    pub key_prefix: Option<String>,
    /// Blob store backend.
    pub storage: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            expose_error_details: false,
            key_prefix: Some("documents".to_owned()),
            storage: StoreConfig::Fs {
                root: PathBuf::from("blobs"),
                public_base_url: None,
            },
        }
    }
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = build_store(config.storage).await;
    tracing::info!(backend = store.backend(), "Blob store ready");

    let state = Arc::new(AppState {
        store,
        key_prefix: config.key_prefix,
        expose_error_details: config.expose_error_details,
    });

    let app = app::create_router(state, config.max_body_bytes);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn build_store(config: StoreConfig) -> Arc<dyn BlobStore> {
    match config {
        StoreConfig::S3(s3) => Arc::new(S3BlobStore::connect(s3).await),
        StoreConfig::Fs {
            root,
            public_base_url,
        } => {
            let store = FsBlobStore::new(root);
            Arc::new(match public_base_url {
                Some(base) => store.with_public_base_url(base),
                None => store,
            })
        }
    }
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from docxgen config.
///
/// # Errors
///
/// Returns `ConfigError::Validation` if the S3 backend is selected without
/// an `[storage.s3]` section.
pub fn server_config_from_config(
    config: &docxgen_config::Config,
) -> Result<ServerConfig, ConfigError> {
    let storage = match config.storage.backend {
        StorageBackend::S3 => {
            let s3 = config.require_s3()?;
            StoreConfig::S3(S3Config {
                bucket: s3.bucket.clone(),
                region: s3.region.clone(),
                endpoint: s3.endpoint.clone(),
                public_base_url: config.storage.public_base_url.clone(),
                public_read: s3.public_read,
            })
        }
        StorageBackend::Fs => StoreConfig::Fs {
            root: config.storage.fs.root.clone(),
            public_base_url: config.storage.public_base_url.clone(),
        },
    };

    Ok(ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        max_body_bytes: config.server.max_body_bytes,
        expose_error_details: config.environment.is_development(),
        key_prefix: config.storage.key_prefix.clone(),
        storage,
    })
}
