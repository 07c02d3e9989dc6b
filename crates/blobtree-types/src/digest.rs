use std::fmt;

use serde::{Deserialize, Serialize};
use sha1::{Digest as _, Sha1};

use crate::error::TypeError;

/// Content digest identifying a BLOB in the digest store.
///
/// A `Digest` is the SHA-1 hash of a payload, which is how the blob store
/// addresses its content. Identical payloads always produce the same
/// `Digest`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Digest([u8; 20]);

impl Digest {
    /// Length of a digest in bytes.
    pub const LEN: usize = 20;

    /// Compute the digest of a payload.
    pub fn of(data: &[u8]) -> Self {
        let hash = Sha1::digest(data);
        let mut arr = [0u8; Self::LEN];
        arr.copy_from_slice(&hash);
        Self(arr)
    }

    /// Create a `Digest` from a pre-computed hash.
    pub fn from_hash(hash: [u8; 20]) -> Self {
        Self(hash)
    }

    /// The raw 20-byte hash.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Hex-encoded string representation, as used in blob URLs.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != Self::LEN {
            return Err(TypeError::InvalidLength {
                expected: Self::LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; Self::LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.short_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for Digest {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 20]> for Digest {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_is_deterministic() {
        assert_eq!(Digest::of(b"hello world"), Digest::of(b"hello world"));
    }

    #[test]
    fn different_data_produces_different_digests() {
        assert_ne!(Digest::of(b"hello"), Digest::of(b"world"));
    }

    #[test]
    fn matches_known_sha1() {
        // sha1("abc")
        assert_eq!(
            Digest::of(b"abc").to_hex(),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        // sha1("")
        assert_eq!(
            Digest::of(b"").to_hex(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn hex_roundtrip() {
        let digest = Digest::of(b"test");
        let parsed: Digest = digest.to_hex().parse().unwrap();
        assert_eq!(digest, parsed);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        let err = Digest::from_hex("abcd").unwrap_err();
        assert_eq!(err, TypeError::InvalidLength { expected: 20, actual: 2 });
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(matches!(Digest::from_hex("zz"), Err(TypeError::InvalidHex(_))));
    }

    #[test]
    fn display_is_full_hex() {
        let digest = Digest::of(b"test");
        assert_eq!(format!("{digest}").len(), 40);
        assert_eq!(format!("{digest:?}"), format!("Digest({})", digest.short_hex()));
    }

    #[test]
    fn serde_roundtrip() {
        let digest = Digest::of(b"serde test");
        let json = serde_json::to_string(&digest).unwrap();
        let parsed: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(digest, parsed);
    }
}
