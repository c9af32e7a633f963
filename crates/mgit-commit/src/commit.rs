//! Commit metadata and its text wire form.
//!
//! Serialized commits are line-oriented UTF-8:
//!
//! ```text
//! tree <40-hex-digest>
//! parent <40-hex-digest | none>
//! author <author>
//!
//! <message>
//! ```
//!
//! The three header lines are mandatory and fixed in order. A root commit
//! writes the literal `none` in the parent line. The blank line and message
//! are present only when the commit has a message; the message is stored
//! verbatim, newlines included.

use mgit_store::{Object, ObjectKind, ObjectStore};
use mgit_types::Digest;
use tracing::debug;

use crate::error::{CommitError, CommitResult};

/// A snapshot of the repository: a tree digest plus history metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Root tree of the snapshot.
    pub tree: Digest,
    /// Parent commit, `None` for a root commit.
    pub parent: Option<Digest>,
    pub author: String,
    pub message: Option<String>,
}

impl Commit {
    pub fn new(
        tree: Digest,
        parent: Option<Digest>,
        author: impl Into<String>,
        message: Option<String>,
    ) -> Self {
        Self {
            tree,
            parent,
            author: author.into(),
            message,
        }
    }

    /// Canonical text serialization.
    pub fn serialize(&self) -> Vec<u8> {
        let parent = match &self.parent {
            Some(digest) => digest.to_hex(),
            None => "none".to_string(),
        };
        let mut text = format!(
            "tree {}\nparent {}\nauthor {}\n",
            self.tree.to_hex(),
            parent,
            self.author
        );
        if let Some(message) = &self.message {
            text.push('\n');
            text.push_str(message);
        }
        text.into_bytes()
    }

    /// Wrap the serialization in a commit object.
    pub fn to_object(&self) -> Object {
        Object::new(ObjectKind::Commit, self.serialize())
    }

    /// Digest of the canonical serialization (the commit's identity).
    pub fn digest(&self) -> Digest {
        self.to_object().digest()
    }

    /// Parse a commit object, checking its kind first.
    pub fn from_object(object: &Object) -> CommitResult<Self> {
        if object.kind != ObjectKind::Commit {
            return Err(CommitError::WrongObjectType {
                expected: ObjectKind::Commit,
                actual: object.kind,
            });
        }
        Self::deserialize(&object.content)
    }

    /// Parse a serialized commit payload.
    pub fn deserialize(bytes: &[u8]) -> CommitResult<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| CommitError::InvalidCommit("payload is not UTF-8".into()))?;

        let (header, message) = match text.split_once("\n\n") {
            Some((header, message)) => (header, Some(message.to_string())),
            None => (text, None),
        };

        let mut lines = header.lines();
        let tree = field(lines.next(), "tree")?;
        let tree = Digest::from_hex(tree)
            .map_err(|e| CommitError::InvalidCommit(format!("bad tree digest: {e}")))?;

        let parent = field(lines.next(), "parent")?;
        let parent = if parent == "none" {
            None
        } else {
            Some(
                Digest::from_hex(parent)
                    .map_err(|e| CommitError::InvalidCommit(format!("bad parent digest: {e}")))?,
            )
        };

        let author = field(lines.next(), "author")?.to_string();
        if author.is_empty() {
            return Err(CommitError::InvalidCommit("author is empty".into()));
        }
        if let Some(extra) = lines.next() {
            return Err(CommitError::InvalidCommit(format!(
                "unexpected header line {extra:?}"
            )));
        }

        Ok(Self {
            tree,
            parent,
            author,
            message,
        })
    }
}

fn field<'a>(line: Option<&'a str>, key: &str) -> CommitResult<&'a str> {
    let line = line
        .ok_or_else(|| CommitError::InvalidCommit(format!("missing {key} line")))?;
    line.strip_prefix(key)
        .and_then(|rest| rest.strip_prefix(' '))
        .ok_or_else(|| CommitError::InvalidCommit(format!("expected {key} line, got {line:?}")))
}

/// Validated write path for a new commit.
///
/// Checks that `tree` resolves to a tree object and `parent` (when given)
/// to a commit object before writing, so a stored commit never dangles on
/// creation.
pub fn commit_tree(
    store: &dyn ObjectStore,
    tree: Digest,
    parent: Option<Digest>,
    author: &str,
    message: Option<&str>,
) -> CommitResult<Digest> {
    if author.is_empty() || author.contains('\n') {
        return Err(CommitError::InvalidCommit(format!(
            "author {author:?} must be a non-empty single line"
        )));
    }

    let tree_object = store.get(&tree)?;
    if tree_object.kind != ObjectKind::Tree {
        return Err(CommitError::WrongObjectType {
            expected: ObjectKind::Tree,
            actual: tree_object.kind,
        });
    }
    if let Some(parent) = &parent {
        let parent_object = store.get(parent)?;
        if parent_object.kind != ObjectKind::Commit {
            return Err(CommitError::WrongObjectType {
                expected: ObjectKind::Commit,
                actual: parent_object.kind,
            });
        }
    }

    let commit = Commit::new(tree, parent, author, message.map(str::to_string));
    let digest = store.put(&commit.to_object())?.digest();
    debug!(commit = %digest, tree = %tree, "commit written");
    Ok(digest)
}
