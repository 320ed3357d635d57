use std::sync::Arc;

use tokio::net::TcpListener;

use cairn_engine::ChunkEngine;
use cairn_store::{LocalStore, MemoryStore, ObjectStore};

use crate::config::{BackendConfig, ServerConfig};
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, AppState};

/// Cairn storage server.
pub struct CasServer {
    config: ServerConfig,
}

impl CasServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Stand up the backing store selected by configuration.
    async fn build_store(backend: &BackendConfig) -> ServerResult<Arc<dyn ObjectStore>> {
        match backend {
            BackendConfig::Memory => Ok(Arc::new(MemoryStore::new())),
            BackendConfig::Local { root } => Ok(Arc::new(LocalStore::new(root)?)),
            #[cfg(feature = "s3")]
            BackendConfig::S3 {
                bucket,
                region,
                endpoint,
            } => Ok(Arc::new(
                cairn_store::S3Store::from_env(bucket.clone(), region.clone(), endpoint.clone())
                    .await,
            )),
            #[cfg(not(feature = "s3"))]
            BackendConfig::S3 { .. } => Err(ServerError::Config(
                "server built without s3 support (enable the `s3` feature)".into(),
            )),
        }
    }

    /// Build the router over a fresh engine (useful for testing).
    pub async fn router(&self) -> ServerResult<axum::Router> {
        let store = Self::build_store(&self.config.backend).await?;
        let engine = Arc::new(ChunkEngine::new(store, self.config.chunk_size_bytes));
        Ok(build_router(AppState {
            engine,
            fetch_concurrency: self.config.fetch_concurrency,
        }))
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router().await?;
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("cairn server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
