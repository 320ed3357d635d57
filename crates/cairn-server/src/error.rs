use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

use cairn_engine::EngineError;
use cairn_protocol::ErrorResponse;
use cairn_types::Etag;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("object not found: {0}")]
    NotFound(Etag),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("protocol error: {0}")]
    Protocol(#[from] cairn_protocol::ProtocolError),

    #[error("store error: {0}")]
    Store(#[from] cairn_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        // Client-caused conditions carry their message; everything else is
        // logged in full server-side and surfaced as an opaque 500.
        let (status, message) = match &self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Protocol(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::NotFound(etag) => (
                StatusCode::NOT_FOUND,
                format!("object not found: {etag}"),
            ),
            Self::Engine(err) => match err {
                EngineError::ChunkTooLarge { .. } => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                EngineError::NotFound(etag) => (
                    StatusCode::NOT_FOUND,
                    format!("object not found: {etag}"),
                ),
                EngineError::Store(err) => {
                    tracing::error!(error = %err, "backing store failure");
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
                }
            },
            other => {
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
