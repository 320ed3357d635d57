//! HTTP server for Cairn.
//!
//! Adapts the streaming put/get protocol to sequential calls into the chunk
//! engine. A put is a client-streamed body of framed chunks answered with
//! the manifest etag; a get streams framed chunks back in original byte
//! order. A whole-object path serves clients that transfer complete
//! objects in a single call.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::{BackendConfig, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use router::{build_router, AppState};
pub use server::CasServer;
