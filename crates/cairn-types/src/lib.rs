//! Foundation types for Cairn.
//!
//! This crate provides the content-derived identifier used throughout the
//! Cairn system. Every other Cairn crate depends on `cairn-types`.
//!
//! # Key Types
//!
//! - [`Etag`] — Content-derived identifier (BLAKE3 hash, lower-case hex)
//! - [`TypeError`] — Errors from parsing and conversion

pub mod error;
pub mod etag;

pub use error::TypeError;
pub use etag::Etag;
