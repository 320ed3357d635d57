//! Backing object store for Cairn.
//!
//! This crate implements the durable key-value blob store behind the chunk
//! engine. Every chunk and whole object is stored under its [`Etag`] and is
//! immutable once written (content-addressing guarantees this).
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`MemoryStore`] — `HashMap`-based store for tests and embedding
//! - [`LocalStore`] — one file per object with a 2-level fan-out layout
//! - `S3Store` — S3-compatible bucket backend (feature `s3`)
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written; a write under an existing key is
//!    a no-op because the key fully determines the content.
//! 2. Every write carries the content hash (the key itself) and backends
//!    verify the body against it before persisting.
//! 3. Concurrent reads are always safe.
//! 4. The store never interprets object contents -- it is a pure key-value
//!    store.
//! 5. All I/O errors are propagated, never silently ignored.
//!
//! [`Etag`]: cairn_types::Etag

pub mod error;
pub mod local;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use local::LocalStore;
pub use memory::MemoryStore;
#[cfg(feature = "s3")]
pub use s3::S3Store;
pub use traits::ObjectStore;
