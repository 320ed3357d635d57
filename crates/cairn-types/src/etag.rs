use std::fmt;

use serde::de::Visitor;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Content-derived identifier for a chunk, whole object, or manifest.
///
/// An `Etag` is the BLAKE3 hash of the content it addresses. Identical content
/// always produces the same `Etag`, making objects deduplicatable and
/// verifiable. The canonical textual rendering is the lower-case hex encoding
/// of the 32-byte digest.
///
/// Chunks and whole objects are addressed directly from their bytes; a
/// manifest is addressed from the canonical serialization of its ordered
/// chunk-identifier list, so manifest identifiers never alias chunk
/// identifiers except by hash coincidence.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Etag([u8; 32]);

impl Etag {
    /// Compute an `Etag` from raw content bytes.
    ///
    /// Deterministic and total: any byte sequence, including empty, produces
    /// a valid identifier.
    pub fn from_content(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Create an `Etag` from a pre-computed digest.
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// The raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lower-case hex rendering (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex rendering (first 8 characters), for logs.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Etag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Etag({})", self.short_hex())
    }
}

impl fmt::Display for Etag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for Etag {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<Etag> for [u8; 32] {
    fn from(etag: Etag) -> Self {
        etag.0
    }
}

// Serialized as a hex string in human-readable formats (JSON responses) and
// as raw bytes in binary formats (frame payloads).
impl Serialize for Etag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Etag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Etag::from_hex(&s).map_err(serde::de::Error::custom)
        } else {
            deserializer.deserialize_bytes(EtagVisitor)
        }
    }
}

struct EtagVisitor;

impl Visitor<'_> for EtagVisitor {
    type Value = Etag;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("32 raw bytes")
    }

    fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Etag, E> {
        if v.len() != 32 {
            return Err(E::invalid_length(v.len(), &self));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(v);
        Ok(Etag(arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn from_content_is_deterministic() {
        let data = b"hello world";
        let etag1 = Etag::from_content(data);
        let etag2 = Etag::from_content(data);
        assert_eq!(etag1, etag2);
    }

    #[test]
    fn different_content_produces_different_etags() {
        let etag1 = Etag::from_content(b"hello");
        let etag2 = Etag::from_content(b"world");
        assert_ne!(etag1, etag2);
    }

    #[test]
    fn empty_content_is_valid() {
        let etag = Etag::from_content(b"");
        assert_eq!(etag.to_hex().len(), 64);
    }

    #[test]
    fn hex_roundtrip() {
        let etag = Etag::from_content(b"test");
        let hex = etag.to_hex();
        let parsed = Etag::from_hex(&hex).unwrap();
        assert_eq!(etag, parsed);
    }

    #[test]
    fn hex_is_lower_case() {
        let etag = Etag::from_content(b"case check");
        let hex = etag.to_hex();
        assert_eq!(hex, hex.to_lowercase());
    }

    #[test]
    fn from_hex_rejects_bad_length() {
        let err = Etag::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 32,
                actual: 2
            }
        );
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        assert!(matches!(
            Etag::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn short_hex_is_8_chars() {
        let etag = Etag::from_content(b"test");
        assert_eq!(etag.short_hex().len(), 8);
    }

    #[test]
    fn display_is_full_hex() {
        let etag = Etag::from_content(b"test");
        let display = format!("{etag}");
        assert_eq!(display.len(), 64);
        assert_eq!(display, etag.to_hex());
    }

    #[test]
    fn json_serializes_as_hex_string() {
        let etag = Etag::from_content(b"json test");
        let json = serde_json::to_string(&etag).unwrap();
        assert_eq!(json, format!("\"{}\"", etag.to_hex()));
        let parsed: Etag = serde_json::from_str(&json).unwrap();
        assert_eq!(etag, parsed);
    }

    #[test]
    fn bincode_roundtrip() {
        let etag = Etag::from_content(b"bincode test");
        let bytes = bincode::serialize(&etag).unwrap();
        let parsed: Etag = bincode::deserialize(&bytes).unwrap();
        assert_eq!(etag, parsed);
    }

    #[test]
    fn ordering_is_consistent() {
        let etag1 = Etag::from_hash([0; 32]);
        let etag2 = Etag::from_hash([1; 32]);
        assert!(etag1 < etag2);
    }

    proptest! {
        #[test]
        fn addressing_is_stable(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            prop_assert_eq!(Etag::from_content(&data), Etag::from_content(&data));
        }

        #[test]
        fn hex_roundtrip_any_content(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let etag = Etag::from_content(&data);
            prop_assert_eq!(Etag::from_hex(&etag.to_hex()).unwrap(), etag);
        }
    }
}
