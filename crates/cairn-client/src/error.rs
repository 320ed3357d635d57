use cairn_types::Etag;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status or an in-band error frame.
    #[error("server error {code}: {message}")]
    Remote { code: u32, message: String },

    #[error("protocol error: {0}")]
    Protocol(#[from] cairn_protocol::ProtocolError),

    #[error("unexpected {0} frame in get stream")]
    UnexpectedFrame(&'static str),

    #[error("stream ended before its terminal frame")]
    TruncatedStream,

    #[error("chunk count mismatch: server reported {expected}, received {actual}")]
    ChunkCountMismatch { expected: u32, actual: u32 },

    #[error("manifest mismatch: requested {requested}, stream reported {reported}")]
    ManifestMismatch { requested: Etag, reported: Etag },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;
