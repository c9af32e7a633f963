use mgit_types::Digest;

use crate::error::{StoreError, StoreResult};

/// The kind of object stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Raw file content.
    Blob,
    /// Directory listing: sorted entries mapping names to object digests.
    Tree,
    /// Snapshot of the repository with parent linkage and metadata.
    Commit,
}

impl ObjectKind {
    /// The kind name used in the canonical header.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
        }
    }

    /// Parse a kind from its header name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "blob" => Some(Self::Blob),
            "tree" => Some(Self::Tree),
            "commit" => Some(Self::Commit),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed, immutable object: kind tag + content bytes.
///
/// Identity is the SHA-1 digest of the canonical encoding
/// `"{kind} {content-len}\0{content}"`. The digest is a pure function of
/// `(kind, content)`; representation never leaks into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Object {
    /// The type of this object.
    pub kind: ObjectKind,
    /// The payload bytes.
    pub content: Vec<u8>,
}

impl Object {
    /// Create a new object from kind and content.
    pub fn new(kind: ObjectKind, content: Vec<u8>) -> Self {
        Self { kind, content }
    }

    /// Create a blob object from raw bytes.
    pub fn blob(content: Vec<u8>) -> Self {
        Self::new(ObjectKind::Blob, content)
    }

    /// Canonical byte encoding: `"{kind} {len}\0{content}"`.
    ///
    /// The length is decimal ASCII with no leading zeros (`0` for empty
    /// content), so the header is variable-length and NUL-terminated.
    pub fn encode(&self) -> Vec<u8> {
        let header = format!("{} {}\0", self.kind, self.content.len());
        let mut bytes = Vec::with_capacity(header.len() + self.content.len());
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(&self.content);
        bytes
    }

    /// Compute the content-addressed digest of this object.
    pub fn digest(&self) -> Digest {
        Digest::hash(&self.encode())
    }

    /// Parse an object back out of its canonical encoding.
    ///
    /// `digest` identifies the object being decoded and is only used to
    /// attribute corruption errors. The content offset is found by locating
    /// the first NUL byte; the declared length must match the remaining
    /// payload exactly.
    pub fn decode(digest: Digest, bytes: &[u8]) -> StoreResult<Self> {
        let corrupt = |reason: &str| StoreError::CorruptObject {
            digest,
            reason: reason.to_string(),
        };

        let nul = bytes
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| corrupt("missing NUL header terminator"))?;

        let header = std::str::from_utf8(&bytes[..nul])
            .map_err(|_| corrupt("header is not valid UTF-8"))?;

        let (kind_name, len_str) = header
            .split_once(' ')
            .ok_or_else(|| corrupt("header has no space separator"))?;

        let kind = ObjectKind::from_name(kind_name)
            .ok_or_else(|| corrupt(&format!("unknown object kind {kind_name:?}")))?;

        if len_str.is_empty() || (len_str.len() > 1 && len_str.starts_with('0')) {
            return Err(corrupt(&format!("malformed content length {len_str:?}")));
        }
        let declared: usize = len_str
            .parse()
            .map_err(|_| corrupt(&format!("malformed content length {len_str:?}")))?;

        let content = &bytes[nul + 1..];
        if content.len() != declared {
            return Err(corrupt(&format!(
                "declared length {declared} but payload is {} bytes",
                content.len()
            )));
        }

        Ok(Self::new(kind, content.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_layout() {
        let obj = Object::blob(b"Hello, world!\n".to_vec());
        let bytes = obj.encode();
        assert!(bytes.starts_with(b"blob 14\0"));
        assert!(bytes.ends_with(b"Hello, world!\n"));
    }

    #[test]
    fn empty_content_encodes_zero_length() {
        let obj = Object::blob(Vec::new());
        assert_eq!(obj.encode(), b"blob 0\0");
    }

    #[test]
    fn digest_matches_git_blob_hash() {
        // `echo 'Hello, world!' | git hash-object --stdin`
        let obj = Object::blob(b"Hello, world!\n".to_vec());
        assert_eq!(obj.digest().to_hex(), "af5626b4a114abcb82d63db7c8082c3c4756e51b");
    }

    #[test]
    fn digest_is_pure_function_of_kind_and_content() {
        let a = Object::blob(b"same".to_vec());
        let b = Object::blob(b"same".to_vec());
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn different_kinds_produce_different_digests() {
        let blob = Object::new(ObjectKind::Blob, b"data".to_vec());
        let tree = Object::new(ObjectKind::Tree, b"data".to_vec());
        assert_ne!(blob.digest(), tree.digest());
    }

    #[test]
    fn decode_roundtrip() {
        for kind in [ObjectKind::Blob, ObjectKind::Tree, ObjectKind::Commit] {
            let obj = Object::new(kind, b"payload bytes".to_vec());
            let decoded = Object::decode(obj.digest(), &obj.encode()).unwrap();
            assert_eq!(obj, decoded);
        }
    }

    #[test]
    fn decode_content_with_embedded_nul() {
        let obj = Object::blob(b"a\0b\0c".to_vec());
        let decoded = Object::decode(obj.digest(), &obj.encode()).unwrap();
        assert_eq!(decoded.content, b"a\0b\0c");
    }

    #[test]
    fn decode_rejects_missing_nul() {
        let err = Object::decode(Digest::hash(b"x"), b"blob 3abc").unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn decode_rejects_unknown_kind() {
        let err = Object::decode(Digest::hash(b"x"), b"link 3\0abc").unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn decode_rejects_length_mismatch() {
        let err = Object::decode(Digest::hash(b"x"), b"blob 5\0abc").unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn decode_rejects_leading_zero_length() {
        let err = Object::decode(Digest::hash(b"x"), b"blob 03\0abc").unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn kind_name_roundtrip() {
        for kind in [ObjectKind::Blob, ObjectKind::Tree, ObjectKind::Commit] {
            assert_eq!(ObjectKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ObjectKind::from_name("tag"), None);
    }
}
