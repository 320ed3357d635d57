//! Wire protocol for Cairn.
//!
//! A put is a client-streamed sequence of [`CasMessage::PutChunk`] frames;
//! the server answers with a JSON [`PutResponse`] once the stream ends. A
//! get is a server-streamed sequence of [`CasMessage::GetChunk`] frames
//! terminated by [`CasMessage::GetDone`] (or an in-band
//! [`CasMessage::Error`]). Frames are length-prefixed bincode payloads;
//! [`FrameBuffer`] reassembles them from arbitrarily split transport reads.

pub mod codec;
pub mod endpoint;
pub mod error;
pub mod message;

pub use codec::{CasCodec, FrameBuffer};
pub use endpoint::{endpoints, ErrorResponse, HealthResponse, PutResponse};
pub use error::{ProtocolError, ProtocolResult};
pub use message::{codes, CasMessage, MAX_MESSAGE_SIZE, PROTOCOL_VERSION};
