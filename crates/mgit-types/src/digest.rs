use std::fmt;

use serde::{Deserialize, Serialize};
use sha1::{Digest as _, Sha1};

use crate::error::TypeError;

/// Width of a digest in bytes (SHA-1).
pub const DIGEST_LEN: usize = 20;

/// Content-addressed identifier for any stored object.
///
/// A `Digest` is the SHA-1 hash of an object's canonical encoding. Identical
/// content always produces the same `Digest`, making objects deduplicatable
/// and verifiable. Rendered externally as 40 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Compute a `Digest` by hashing raw bytes.
    pub fn hash(data: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Create a `Digest` from a pre-computed hash.
    pub const fn from_raw(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Create a `Digest` from a byte slice, checking the length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        if bytes.len() != DIGEST_LEN {
            return Err(TypeError::InvalidLength {
                expected: DIGEST_LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; DIGEST_LEN];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// The raw 20-byte hash.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Hex-encoded string representation (40 lowercase chars).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a 40-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
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

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<Digest> for [u8; DIGEST_LEN] {
    fn from(d: Digest) -> Self {
        d.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let data = b"hello world";
        assert_eq!(Digest::hash(data), Digest::hash(data));
    }

    #[test]
    fn different_data_produces_different_digests() {
        assert_ne!(Digest::hash(b"hello"), Digest::hash(b"world"));
    }

    #[test]
    fn known_sha1_vector() {
        // SHA-1("Hello, world!\n")
        let d = Digest::hash(b"Hello, world!\n");
        assert_eq!(d.to_hex(), "09fac8dbfd27bd9b4d23a00eb648aa751789536d");
    }

    #[test]
    fn hex_roundtrip() {
        let d = Digest::hash(b"roundtrip");
        let parsed = Digest::from_hex(&d.to_hex()).unwrap();
        assert_eq!(d, parsed);
    }

    #[test]
    fn from_hex_rejects_bad_length() {
        let err = Digest::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: DIGEST_LEN,
                actual: 2,
            }
        );
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        assert!(matches!(
            Digest::from_hex("zz".repeat(20).as_str()),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn from_slice_checks_length() {
        assert!(Digest::from_slice(&[0u8; 19]).is_err());
        assert!(Digest::from_slice(&[0u8; 20]).is_ok());
    }

    #[test]
    fn display_is_full_hex() {
        let d = Digest::hash(b"display");
        let s = format!("{d}");
        assert_eq!(s.len(), 40);
        assert_eq!(s, d.to_hex());
    }

    #[test]
    fn short_hex_is_8_chars() {
        assert_eq!(Digest::hash(b"short").short_hex().len(), 8);
    }

    #[test]
    fn ordering_is_consistent() {
        let a = Digest::from_raw([0; DIGEST_LEN]);
        let b = Digest::from_raw([1; DIGEST_LEN]);
        assert!(a < b);
    }
}
