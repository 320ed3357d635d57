//! Client library for Cairn.
//!
//! [`CasClient`] speaks the Cairn HTTP surface: chunked streaming uploads
//! (`PutChunk` frames in a streaming request body), streaming downloads
//! reassembled in order, and the whole-object single-call path.

pub mod client;
pub mod error;

pub use client::CasClient;
pub use error::{ClientError, ClientResult};
