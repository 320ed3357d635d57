use cairn_types::Etag;

/// HTTP endpoint paths for the Cairn protocol.
pub mod endpoints {
    /// Client-streaming put (`POST`).
    pub const STREAM: &str = "/v1/stream";
    /// Whole-object put (`POST`).
    pub const OBJECT: &str = "/v1/object";
    pub const HEALTH: &str = "/v1/health";
    pub const INFO: &str = "/v1/info";

    /// Path of a server-streaming get for the given manifest etag.
    pub fn stream_path(etag: &cairn_types::Etag) -> String {
        format!("{STREAM}/{etag}")
    }

    /// Path of a whole-object get for the given etag.
    pub fn object_path(etag: &cairn_types::Etag) -> String {
        format!("{OBJECT}/{etag}")
    }
}

/// Response to a completed put (streaming or whole-object).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PutResponse {
    pub etag: Etag,
}

/// Body of a non-streaming error response.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub protocol_version: u32,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            protocol_version: super::message::PROTOCOL_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_defaults() {
        let h = HealthResponse::default();
        assert_eq!(h.status, "ok");
        assert_eq!(h.protocol_version, 1);
    }

    #[test]
    fn endpoint_paths() {
        assert_eq!(endpoints::HEALTH, "/v1/health");
        assert_eq!(endpoints::STREAM, "/v1/stream");
        assert_eq!(endpoints::OBJECT, "/v1/object");

        let etag = Etag::from_content(b"path test");
        assert_eq!(
            endpoints::stream_path(&etag),
            format!("/v1/stream/{}", etag.to_hex())
        );
        assert_eq!(
            endpoints::object_path(&etag),
            format!("/v1/object/{}", etag.to_hex())
        );
    }

    #[test]
    fn put_response_serializes_etag_as_hex() {
        let etag = Etag::from_content(b"json etag");
        let json = serde_json::to_string(&PutResponse { etag }).unwrap();
        assert!(json.contains(&etag.to_hex()));
        let parsed: PutResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.etag, etag);
    }
}
