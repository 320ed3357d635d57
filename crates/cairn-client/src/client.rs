use std::path::Path;

use bytes::Bytes;
use futures::StreamExt;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use cairn_engine::Chunker;
use cairn_protocol::{
    endpoints, CasCodec, CasMessage, ErrorResponse, FrameBuffer, HealthResponse, PutResponse,
};
use cairn_types::Etag;

use crate::error::{ClientError, ClientResult};

const DEFAULT_CHUNK_SIZE: usize = 4_000_000;

/// Client for a Cairn storage server.
pub struct CasClient {
    base_url: String,
    http: reqwest::Client,
    chunk_size: usize,
}

impl CasClient {
    /// Create a client for the server at `base_url` (e.g.
    /// `http://127.0.0.1:8082`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Override the chunk size used for streaming uploads.
    ///
    /// Must not exceed the server's configured limit or uploads will be
    /// rejected as invalid arguments.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Upload in-memory bytes as a chunk stream. Returns the manifest etag.
    pub async fn put_stream_bytes(&self, data: Bytes) -> ClientResult<Etag> {
        let chunker = Chunker::new(self.chunk_size);
        let mut wire = Vec::new();
        for chunk in chunker.split(&data) {
            let frame = CasCodec::encode(&CasMessage::PutChunk {
                data: chunk.to_vec(),
            })?;
            wire.extend_from_slice(&frame);
        }

        let response = self
            .http
            .post(self.url(endpoints::STREAM))
            .body(wire)
            .send()
            .await?;
        self.parse_put_response(response).await
    }

    /// Upload a file as a chunk stream without buffering it whole. Returns
    /// the manifest etag.
    pub async fn put_stream_file(&self, path: impl AsRef<Path>) -> ClientResult<Etag> {
        let file = tokio::fs::File::open(path.as_ref()).await?;
        let chunk_size = self.chunk_size;

        // One frame per read of up to `chunk_size` bytes; the body streams
        // frames to the server as the file is read.
        let frames = futures::stream::try_unfold(file, move |mut file| async move {
            let mut buf = vec![0u8; chunk_size];
            let mut filled = 0;
            while filled < chunk_size {
                let n = file.read(&mut buf[filled..]).await?;
                if n == 0 {
                    break;
                }
                filled += n;
            }
            if filled == 0 {
                return Ok::<_, ClientError>(None);
            }
            buf.truncate(filled);
            let frame = CasCodec::encode(&CasMessage::PutChunk { data: buf })?;
            Ok(Some((Bytes::from(frame), file)))
        });

        let response = self
            .http
            .post(self.url(endpoints::STREAM))
            .body(reqwest::Body::wrap_stream(frames))
            .send()
            .await?;
        self.parse_put_response(response).await
    }

    /// Download a streamed object into `out`, reassembling chunks in
    /// original byte order. Returns the number of bytes written.
    pub async fn get_stream_to<W: AsyncWrite + Unpin>(
        &self,
        etag: &Etag,
        out: &mut W,
    ) -> ClientResult<u64> {
        let response = self
            .http
            .get(self.url(&endpoints::stream_path(etag)))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(self.remote_error(status, response).await);
        }

        let mut frames = FrameBuffer::new();
        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        let mut received = 0u32;

        while let Some(data) = stream.next().await {
            let data = data?;
            frames.extend(&data);
            while let Some(msg) = frames.next_message()? {
                match msg {
                    CasMessage::GetChunk { data } => {
                        out.write_all(&data).await?;
                        written += data.len() as u64;
                        received += 1;
                    }
                    CasMessage::GetDone {
                        etag: reported,
                        chunk_count,
                    } => {
                        if reported != *etag {
                            return Err(ClientError::ManifestMismatch {
                                requested: *etag,
                                reported,
                            });
                        }
                        if chunk_count != received {
                            return Err(ClientError::ChunkCountMismatch {
                                expected: chunk_count,
                                actual: received,
                            });
                        }
                        out.flush().await?;
                        debug!(%etag, written, chunk_count, "get stream complete");
                        return Ok(written);
                    }
                    CasMessage::Error { code, message } => {
                        return Err(ClientError::Remote { code, message });
                    }
                    CasMessage::PutChunk { .. } => {
                        return Err(ClientError::UnexpectedFrame("PutChunk"));
                    }
                }
            }
        }
        Err(ClientError::TruncatedStream)
    }

    /// Download a streamed object into memory.
    pub async fn get_stream(&self, etag: &Etag) -> ClientResult<Bytes> {
        let mut buf = Vec::new();
        self.get_stream_to(etag, &mut buf).await?;
        Ok(Bytes::from(buf))
    }

    /// Upload a complete object in a single call (whole-object path).
    pub async fn put_object(&self, data: Bytes) -> ClientResult<Etag> {
        let response = self
            .http
            .post(self.url(endpoints::OBJECT))
            .body(data)
            .send()
            .await?;
        self.parse_put_response(response).await
    }

    /// Download a complete object stored via the whole-object path.
    pub async fn get_object(&self, etag: &Etag) -> ClientResult<Bytes> {
        let response = self
            .http
            .get(self.url(&endpoints::object_path(etag)))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(self.remote_error(status, response).await);
        }
        Ok(response.bytes().await?)
    }

    /// Probe server health.
    pub async fn health(&self) -> ClientResult<HealthResponse> {
        let response = self.http.get(self.url(endpoints::HEALTH)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(self.remote_error(status, response).await);
        }
        Ok(response.json().await?)
    }

    async fn parse_put_response(&self, response: reqwest::Response) -> ClientResult<Etag> {
        let status = response.status();
        if !status.is_success() {
            return Err(self.remote_error(status, response).await);
        }
        let put: PutResponse = response.json().await?;
        Ok(put.etag)
    }

    async fn remote_error(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ClientError {
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        ClientError::Remote {
            code: status.as_u16() as u32,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cairn_engine::ChunkEngine;
    use cairn_server::{build_router, AppState};
    use cairn_store::MemoryStore;

    use super::*;

    /// Spawn a real server on an ephemeral port and return its base URL.
    async fn spawn_server(chunk_size: usize) -> String {
        let store = Arc::new(MemoryStore::new());
        let engine = Arc::new(ChunkEngine::new(store, chunk_size));
        let app = build_router(AppState {
            engine,
            fetch_concurrency: 2,
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn stream_roundtrip_in_memory() {
        let url = spawn_server(64).await;
        let client = CasClient::new(&url).with_chunk_size(64);
        let data: Bytes = (0..300u32).map(|i| (i % 251) as u8).collect::<Vec<u8>>().into();

        let etag = client.put_stream_bytes(data.clone()).await.unwrap();
        let fetched = client.get_stream(&etag).await.unwrap();
        assert_eq!(fetched, data);
    }

    #[tokio::test]
    async fn stream_roundtrip_via_file() {
        let url = spawn_server(64).await;
        let client = CasClient::new(&url).with_chunk_size(64);

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("payload.bin");
        let data: Vec<u8> = (0..1000u32).map(|i| (i % 241) as u8).collect();
        std::fs::write(&path, &data).unwrap();

        let etag = client.put_stream_file(&path).await.unwrap();

        // File-streamed and in-memory uploads of identical content agree.
        let same = client
            .put_stream_bytes(Bytes::from(data.clone()))
            .await
            .unwrap();
        assert_eq!(etag, same);

        let out_path = dir.path().join("fetched.bin");
        let mut out = tokio::fs::File::create(&out_path).await.unwrap();
        let written = client.get_stream_to(&etag, &mut out).await.unwrap();
        assert_eq!(written, data.len() as u64);
        assert_eq!(std::fs::read(&out_path).unwrap(), data);
    }

    #[tokio::test]
    async fn empty_object_roundtrip() {
        let url = spawn_server(64).await;
        let client = CasClient::new(&url);

        let etag = client.put_stream_bytes(Bytes::new()).await.unwrap();
        let fetched = client.get_stream(&etag).await.unwrap();
        assert!(fetched.is_empty());
    }

    #[tokio::test]
    async fn whole_object_roundtrip() {
        let url = spawn_server(64).await;
        let client = CasClient::new(&url);
        let data = Bytes::from_static(b"whole object payload");

        let etag = client.put_object(data.clone()).await.unwrap();
        assert_eq!(etag, Etag::from_content(&data));
        assert_eq!(client.get_object(&etag).await.unwrap(), data);
    }

    #[tokio::test]
    async fn unknown_etag_is_remote_404() {
        let url = spawn_server(64).await;
        let client = CasClient::new(&url);
        let etag = Etag::from_content(b"never stored");

        let err = client.get_stream(&etag).await.unwrap_err();
        assert!(matches!(err, ClientError::Remote { code: 404, .. }));

        let err = client.get_object(&etag).await.unwrap_err();
        assert!(matches!(err, ClientError::Remote { code: 404, .. }));
    }

    #[tokio::test]
    async fn oversized_chunk_is_remote_400() {
        let url = spawn_server(16).await;
        let client = CasClient::new(&url).with_chunk_size(32);

        let err = client
            .put_stream_bytes(Bytes::from(vec![0u8; 32]))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Remote { code: 400, .. }));
    }

    #[tokio::test]
    async fn health_probe() {
        let url = spawn_server(64).await;
        let client = CasClient::new(&url);
        let health = client.health().await.unwrap();
        assert_eq!(health.status, "ok");
    }
}
