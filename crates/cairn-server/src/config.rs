use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Which backing store to stand the engine on.
    pub backend: BackendConfig,
    /// Per-chunk size limit enforced on the streaming put path.
    pub chunk_size_bytes: usize,
    /// How many chunks a streaming get fetches ahead of the client.
    /// Delivery order is always original byte order.
    pub fetch_concurrency: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8082".parse().unwrap(),
            backend: BackendConfig::Local {
                root: PathBuf::from("./cairn-data"),
            },
            chunk_size_bytes: 4_000_000,
            fetch_concurrency: 4,
        }
    }
}

/// Backing store selection, decided once at startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    /// In-memory store; contents are lost on restart.
    Memory,
    /// One file per object under the given root directory.
    Local { root: PathBuf },
    /// S3-compatible bucket. Requires the `s3` build feature.
    S3 {
        bucket: String,
        #[serde(default)]
        region: Option<String>,
        #[serde(default)]
        endpoint: Option<String>,
    },
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| ServerError::Config(e.to_string()))
    }
}
