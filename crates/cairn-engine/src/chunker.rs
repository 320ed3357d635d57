//! Fixed-size splitter for preparing a chunk stream.

use bytes::Bytes;

/// Splits a byte sequence into chunks of a configured maximum size.
///
/// The last chunk may be smaller than `chunk_size`. Empty input produces
/// zero chunks (an empty object is represented by an empty manifest).
/// Splitting is zero-copy: each chunk is a slice of the input buffer.
pub struct Chunker {
    chunk_size: usize,
}

impl Chunker {
    /// Create a chunker with the given chunk size in bytes.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be non-zero");
        Self { chunk_size }
    }

    /// The configured chunk size in bytes.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Split data into consecutive chunks in original byte order.
    pub fn split(&self, data: &Bytes) -> Vec<Bytes> {
        let mut chunks = Vec::with_capacity(data.len().div_ceil(self.chunk_size));
        let mut offset = 0;
        while offset < data.len() {
            let end = usize::min(offset + self.chunk_size, data.len());
            chunks.push(data.slice(offset..end));
            offset = end;
        }
        chunks
    }
}
