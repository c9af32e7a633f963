use mgit_types::Digest;

use crate::error::{TreeError, TreeResult};

/// Unix-style mode of a tree entry.
///
/// Only this fixed set of modes is valid; any other bit pattern in a
/// serialized tree is rejected as corruption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryMode {
    /// A sub-tree.
    Directory,
    /// A regular, non-executable file.
    Regular,
    /// A regular file with the executable bit set.
    Executable,
    /// A symbolic link; the blob content is the link target.
    Symlink,
    /// A nested repository reference.
    GitLink,
}

impl EntryMode {
    /// The raw mode bits as stored in the serialized tree.
    pub fn mode_bits(&self) -> u32 {
        match self {
            EntryMode::Directory => 0o040000,
            EntryMode::Regular => 0o100644,
            EntryMode::Executable => 0o100755,
            EntryMode::Symlink => 0o120000,
            EntryMode::GitLink => 0o160000,
        }
    }

    /// Parse raw mode bits, rejecting anything outside the fixed set.
    pub fn from_mode_bits(bits: u32) -> TreeResult<Self> {
        match bits {
            0o040000 => Ok(EntryMode::Directory),
            0o100644 => Ok(EntryMode::Regular),
            0o100755 => Ok(EntryMode::Executable),
            0o120000 => Ok(EntryMode::Symlink),
            0o160000 => Ok(EntryMode::GitLink),
            other => Err(TreeError::InvalidTree(format!(
                "unknown entry mode {other:o}"
            ))),
        }
    }

    /// Returns `true` for modes whose object is a sub-tree.
    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06o}", self.mode_bits())
    }
}

/// A single named entry in a tree, pointing at a blob or a sub-tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub mode: EntryMode,
    pub name: String,
    pub digest: Digest,
}

impl Entry {
    pub fn new(mode: EntryMode, name: impl Into<String>, digest: Digest) -> Self {
        Self {
            mode,
            name: name.into(),
            digest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_bits_roundtrip() {
        for mode in [
            EntryMode::Directory,
            EntryMode::Regular,
            EntryMode::Executable,
            EntryMode::Symlink,
            EntryMode::GitLink,
        ] {
            assert_eq!(EntryMode::from_mode_bits(mode.mode_bits()).unwrap(), mode);
        }
    }

    #[test]
    fn unknown_mode_bits_rejected() {
        let err = EntryMode::from_mode_bits(0o100600).unwrap_err();
        assert!(matches!(err, TreeError::InvalidTree(_)));
    }

    #[test]
    fn display_is_zero_padded_octal() {
        assert_eq!(EntryMode::Directory.to_string(), "040000");
        assert_eq!(EntryMode::Regular.to_string(), "100644");
    }

    #[test]
    fn only_directory_is_a_tree() {
        assert!(EntryMode::Directory.is_tree());
        assert!(!EntryMode::Regular.is_tree());
        assert!(!EntryMode::Symlink.is_tree());
    }
}
