//! Blob-level diff: line-by-line comparison of file contents.
//!
//! The [`LeafDiffer`] trait is the seam between structural tree diffing and
//! leaf content diffing; [`TextDiffer`] is the default implementation,
//! built on the `similar` crate (Myers algorithm) with context lines.

use similar::{ChangeTag, TextDiff};

/// The result of diffing two blobs (file contents).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobDiff {
    /// The diff hunks.
    pub hunks: Vec<DiffHunk>,
}

impl BlobDiff {
    /// Returns `true` if the two blobs are identical.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Total number of lines added across all hunks.
    pub fn additions(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| matches!(l, DiffLine::Added(_)))
            .count()
    }

    /// Total number of lines removed across all hunks.
    pub fn deletions(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| matches!(l, DiffLine::Removed(_)))
            .count()
    }
}

/// A contiguous region of changes in a diff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffHunk {
    /// Line number in the old content where this hunk starts (1-based).
    pub old_start: usize,
    /// Number of lines from the old content in this hunk.
    pub old_count: usize,
    /// Line number in the new content where this hunk starts (1-based).
    pub new_start: usize,
    /// Number of lines from the new content in this hunk.
    pub new_count: usize,
    /// The individual diff lines in this hunk.
    pub lines: Vec<DiffLine>,
}

/// A single line in a diff hunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
    /// A line present in both old and new (context).
    Context(String),
    /// A line added in the new content.
    Added(String),
    /// A line removed from the old content.
    Removed(String),
}

/// Leaf-level diff strategy, injected into diff rendering.
pub trait LeafDiffer {
    /// Diff two leaf contents. An absent side is passed as an empty slice.
    fn diff_leaves(&self, old: &[u8], new: &[u8]) -> BlobDiff;
}

/// Line-oriented Myers differ with a fixed number of context lines.
#[derive(Debug, Clone)]
pub struct TextDiffer {
    context: usize,
}

impl TextDiffer {
    pub fn new() -> Self {
        Self { context: 3 }
    }

    pub fn with_context(context: usize) -> Self {
        Self { context }
    }
}

impl Default for TextDiffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LeafDiffer for TextDiffer {
    fn diff_leaves(&self, old: &[u8], new: &[u8]) -> BlobDiff {
        let (old_str, new_str) = match (std::str::from_utf8(old), std::str::from_utf8(new)) {
            (Ok(o), Ok(n)) => (o, n),
            _ => return binary_diff(old, new),
        };

        if old_str == new_str {
            return BlobDiff { hunks: Vec::new() };
        }

        let text_diff = TextDiff::from_lines(old_str, new_str);
        let mut hunks = Vec::new();

        for group in text_diff.grouped_ops(self.context) {
            let mut lines = Vec::new();
            let mut old_start = 0usize;
            let mut new_start = 0usize;
            let mut old_count = 0usize;
            let mut new_count = 0usize;
            let mut first = true;

            for op in &group {
                if first {
                    old_start = op.old_range().start + 1;
                    new_start = op.new_range().start + 1;
                    first = false;
                }

                for change in text_diff.iter_changes(op) {
                    let text = change.value().trim_end_matches('\n').to_string();
                    match change.tag() {
                        ChangeTag::Equal => {
                            lines.push(DiffLine::Context(text));
                            old_count += 1;
                            new_count += 1;
                        }
                        ChangeTag::Delete => {
                            lines.push(DiffLine::Removed(text));
                            old_count += 1;
                        }
                        ChangeTag::Insert => {
                            lines.push(DiffLine::Added(text));
                            new_count += 1;
                        }
                    }
                }
            }

            hunks.push(DiffHunk {
                old_start,
                old_count,
                new_start,
                new_count,
                lines,
            });
        }

        BlobDiff { hunks }
    }
}

/// Diff two blobs with the default text differ.
pub fn diff_blobs(old: &[u8], new: &[u8]) -> BlobDiff {
    TextDiffer::new().diff_leaves(old, new)
}

/// Synthetic single-hunk diff for content that is not valid UTF-8.
fn binary_diff(old: &[u8], new: &[u8]) -> BlobDiff {
    let mut lines = Vec::new();
    if !old.is_empty() {
        lines.push(DiffLine::Removed(format!(
            "(binary content, {} bytes)",
            old.len()
        )));
    }
    if !new.is_empty() {
        lines.push(DiffLine::Added(format!(
            "(binary content, {} bytes)",
            new.len()
        )));
    }

    BlobDiff {
        hunks: vec![DiffHunk {
            old_start: 1,
            old_count: usize::from(!old.is_empty()),
            new_start: 1,
            new_count: usize::from(!new.is_empty()),
            lines,
        }],
    }
}
