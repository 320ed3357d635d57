//! Chunked content-addressing and reassembly engine.
//!
//! This crate is the core of Cairn. It splits logical objects into
//! bounded-size chunks, content-addresses and deduplicates each chunk
//! against the backing store, records the ordered chunk sequence as a
//! manifest, and reassembles the original byte stream on retrieval.
//!
//! # Components
//!
//! - [`ChunkEngine`] — the put/get protocol: `put_chunk`, `finish_put`,
//!   `start_get`, `get_chunk`, plus the whole-object `put_object` /
//!   `get_object` path
//! - [`ManifestIndex`] — mapping from manifest etag to its ordered chunk
//!   etag sequence, owned exclusively by the engine
//! - [`Chunker`] — fixed-size splitter used by clients preparing a chunk
//!   stream
//!
//! The engine never retries backing-store calls and never partially
//! mutates the manifest index; retry policy belongs to the store
//! implementation.

pub mod chunker;
pub mod engine;
pub mod error;
pub mod manifest;

pub use chunker::Chunker;
pub use engine::ChunkEngine;
pub use error::{EngineError, EngineResult};
pub use manifest::{manifest_etag, ManifestIndex};
