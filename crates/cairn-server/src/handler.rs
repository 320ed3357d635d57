use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde_json::json;

use cairn_engine::{EngineError, EngineResult};
use cairn_protocol::{codes, CasCodec, CasMessage, FrameBuffer, HealthResponse, PutResponse};
use cairn_types::Etag;

use crate::error::ServerError;
use crate::router::AppState;

/// Health check handler.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "name": "cairn-server",
        "version": env!("CARGO_PKG_VERSION"),
        "protocol_version": cairn_protocol::PROTOCOL_VERSION,
        "chunk_size_bytes": state.engine.chunk_size_bytes(),
    }))
}

/// Client-streaming put: decode `PutChunk` frames from the request body as
/// they arrive, store each chunk, and answer with the manifest etag once
/// the stream ends.
pub async fn put_stream(
    State(state): State<AppState>,
    body: Body,
) -> Result<Json<PutResponse>, ServerError> {
    let mut frames = FrameBuffer::new();
    let mut chunks: Vec<Etag> = Vec::new();

    let mut stream = body.into_data_stream();
    while let Some(data) = stream.next().await {
        let data = data.map_err(|e| ServerError::BadRequest(format!("body read failed: {e}")))?;
        frames.extend(&data);
        while let Some(msg) = frames.next_message()? {
            match msg {
                CasMessage::PutChunk { data } => {
                    let etag = state.engine.put_chunk(Bytes::from(data)).await?;
                    chunks.push(etag);
                }
                other => {
                    return Err(ServerError::BadRequest(format!(
                        "unexpected {} frame in put stream",
                        other.type_name()
                    )));
                }
            }
        }
    }
    if !frames.is_empty() {
        return Err(ServerError::BadRequest(
            "truncated frame at end of put stream".into(),
        ));
    }

    let etag = state.engine.finish_put(chunks);
    Ok(Json(PutResponse { etag }))
}

struct GetStream {
    fetches: BoxStream<'static, EngineResult<Bytes>>,
    manifest: Etag,
    chunk_count: u32,
    done: bool,
}

/// Server-streaming get: resolve the manifest, then stream each chunk in
/// original byte order as `GetChunk` frames, terminated by `GetDone`.
///
/// Chunks are prefetched up to `fetch_concurrency` ahead; `buffered`
/// preserves sequence order regardless of completion order. A chunk
/// failure mid-stream is reported as an in-band terminal `Error` frame,
/// since the response status is already committed.
pub async fn get_stream(
    State(state): State<AppState>,
    Path(etag): Path<String>,
) -> Result<Response, ServerError> {
    let manifest = parse_etag(&etag)?;
    if !state.engine.manifest_exists(&manifest) {
        return Err(ServerError::NotFound(manifest));
    }
    let sequence = state.engine.start_get(&manifest);
    let chunk_count = sequence.len() as u32;

    let engine = state.engine.clone();
    let fetches = futures::stream::iter(sequence.into_iter().map(move |chunk| {
        let engine = engine.clone();
        async move { engine.get_chunk(&chunk).await }
    }))
    .buffered(state.fetch_concurrency.max(1))
    .boxed();

    let init = GetStream {
        fetches,
        manifest,
        chunk_count,
        done: false,
    };
    let frames = futures::stream::unfold(init, |mut st| async move {
        if st.done {
            return None;
        }
        let frame = match st.fetches.next().await {
            Some(Ok(data)) => CasMessage::GetChunk {
                data: data.to_vec(),
            },
            Some(Err(err)) => {
                st.done = true;
                let (code, message) = terminal_error(&err);
                CasMessage::Error { code, message }
            }
            None => {
                st.done = true;
                CasMessage::GetDone {
                    etag: st.manifest,
                    chunk_count: st.chunk_count,
                }
            }
        };
        let item = CasCodec::encode(&frame).map(Bytes::from);
        Some((item, st))
    });

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        Body::from_stream(frames),
    )
        .into_response())
}

/// Whole-object put: one request, one object, no manifest indirection.
pub async fn put_object(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PutResponse>, ServerError> {
    let etag = state.engine.put_object(body).await?;
    Ok(Json(PutResponse { etag }))
}

/// Whole-object get.
pub async fn get_object(
    State(state): State<AppState>,
    Path(etag): Path<String>,
) -> Result<Response, ServerError> {
    let etag = parse_etag(&etag)?;
    let data = state.engine.get_object(&etag).await?;
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        data,
    )
        .into_response())
}

fn parse_etag(s: &str) -> Result<Etag, ServerError> {
    Etag::from_hex(s).map_err(|e| ServerError::BadRequest(format!("invalid etag: {e}")))
}

fn terminal_error(err: &EngineError) -> (u32, String) {
    match err {
        EngineError::NotFound(etag) => (codes::NOT_FOUND, format!("object not found: {etag}")),
        other => {
            tracing::error!(error = %other, "chunk fetch failed mid-stream");
            (codes::INTERNAL, "internal error".into())
        }
    }
}
