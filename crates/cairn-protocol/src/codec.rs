use bytes::BytesMut;

use crate::error::{ProtocolError, ProtocolResult};
use crate::message::{CasMessage, MAX_MESSAGE_SIZE};

/// Codec for encoding/decoding protocol frames.
///
/// Framing: `[4 bytes big-endian len][1 byte tag][bincode payload]`, where
/// `len` covers the tag byte plus the payload.
pub struct CasCodec;

impl CasCodec {
    /// Encode a message with framing.
    pub fn encode(msg: &CasMessage) -> ProtocolResult<Vec<u8>> {
        let payload =
            bincode::serialize(msg).map_err(|e| ProtocolError::Serialization(e.to_string()))?;
        if payload.len() > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: payload.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        let len = (payload.len() + 1) as u32;
        let mut buf = Vec::with_capacity(4 + 1 + payload.len());
        buf.extend_from_slice(&len.to_be_bytes());
        buf.push(msg.type_tag());
        buf.extend_from_slice(&payload);
        Ok(buf)
    }

    /// Decode a complete framed message. Returns (message, bytes consumed).
    pub fn decode(data: &[u8]) -> ProtocolResult<(CasMessage, usize)> {
        if data.len() < 5 {
            return Err(ProtocolError::FramingError("too short".into()));
        }
        let len = u32::from_be_bytes(data[0..4].try_into().unwrap()) as usize;
        if len < 1 {
            return Err(ProtocolError::FramingError("zero-length frame".into()));
        }
        if len - 1 > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: len - 1,
                max: MAX_MESSAGE_SIZE,
            });
        }
        let total = 4 + len;
        if data.len() < total {
            return Err(ProtocolError::FramingError(format!(
                "incomplete: have {}, need {}",
                data.len(),
                total
            )));
        }
        let payload = &data[5..total];
        let msg: CasMessage = bincode::deserialize(payload)
            .map_err(|e| ProtocolError::Deserialization(e.to_string()))?;
        Ok((msg, total))
    }
}

/// Incremental frame decoder for streaming bodies.
///
/// Transport reads split frames at arbitrary boundaries; the buffer
/// accumulates bytes and yields complete messages as they become available.
#[derive(Default)]
pub struct FrameBuffer {
    buf: BytesMut,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append transport bytes to the buffer.
    pub fn extend(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Pop the next complete message, if one is buffered.
    ///
    /// Returns `Ok(None)` when more bytes are needed. Framing violations
    /// (zero-length or oversized frames, undecodable payloads) are errors.
    pub fn next_message(&mut self) -> ProtocolResult<Option<CasMessage>> {
        if self.buf.len() < 5 {
            return Ok(None);
        }
        let len = u32::from_be_bytes(self.buf[0..4].try_into().unwrap()) as usize;
        if len < 1 {
            return Err(ProtocolError::FramingError("zero-length frame".into()));
        }
        if len - 1 > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: len - 1,
                max: MAX_MESSAGE_SIZE,
            });
        }
        let total = 4 + len;
        if self.buf.len() < total {
            return Ok(None);
        }
        let frame = self.buf.split_to(total);
        let msg: CasMessage = bincode::deserialize(&frame[5..])
            .map_err(|e| ProtocolError::Deserialization(e.to_string()))?;
        Ok(Some(msg))
    }

    /// Whether the buffer holds no unconsumed bytes.
    ///
    /// After a stream ends, leftover bytes indicate a truncated or corrupt
    /// final frame.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
