use serde::{Deserialize, Serialize};

use cairn_types::Etag;

pub const PROTOCOL_VERSION: u32 = 1;
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;

/// All frame types carried in streaming request and response bodies.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CasMessage {
    /// One chunk of an in-flight put, in original byte order.
    PutChunk { data: Vec<u8> },
    /// One chunk of a streamed get, in original byte order.
    GetChunk { data: Vec<u8> },
    /// Terminal frame of a successful get stream.
    GetDone { etag: Etag, chunk_count: u32 },
    /// Terminal frame of a failed get stream.
    Error { code: u32, message: String },
}

impl CasMessage {
    pub fn type_tag(&self) -> u8 {
        match self {
            Self::PutChunk { .. } => 1,
            Self::GetChunk { .. } => 2,
            Self::GetDone { .. } => 3,
            Self::Error { .. } => 255,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::PutChunk { .. } => "PutChunk",
            Self::GetChunk { .. } => "GetChunk",
            Self::GetDone { .. } => "GetDone",
            Self::Error { .. } => "Error",
        }
    }
}

/// Error codes carried by [`CasMessage::Error`] frames and mirrored by the
/// HTTP status of non-streaming responses.
pub mod codes {
    /// Client-caused: oversized chunk, malformed frame or identifier.
    pub const INVALID_ARGUMENT: u32 = 400;
    /// The requested identifier is unknown.
    pub const NOT_FOUND: u32 = 404;
    /// Backing-store failure; detail is logged server-side only.
    pub const INTERNAL: u32 = 500;
}
