mod diff;
mod offsets;
mod surface;

pub use diff::{diff_text, TextDelta};
pub use offsets::{to_offsets, to_view_range};
pub use surface::{
    FlatSurface, RunPoint, SurfaceGeometry, SurfaceRect, TextSurface, ViewRange, WrappedSurface,
};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one tracked plain-text buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferId {
    /// The AI-drafted narrative summary.
    Summary,
    /// An open case document, by its server id.
    Document(String),
}

impl BufferId {
    pub fn document(id: impl Into<String>) -> Self {
        Self::Document(id.into())
    }

    pub fn document_id(&self) -> Option<&str> {
        match self {
            Self::Summary => None,
            Self::Document(id) => Some(id),
        }
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Summary => write!(f, "summary"),
            Self::Document(id) => write!(f, "document:{id}"),
        }
    }
}

/// Half-open `[start, end)` pair of character indices into one buffer.
///
/// A range with `start == end` is an empty selection and never survives as a
/// durable anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetRange {
    pub start: usize,
    pub end: usize,
}

impl OffsetRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

/// A named, mutable character buffer owned by the workspace coordinator.
///
/// All offsets are Unicode scalar value indices, not bytes; mutation goes
/// through the coordinator's entry points so anchors are rebased in step.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    id: BufferId,
    text: String,
    char_len: usize,
    revision: u64,
}

impl TextBuffer {
    pub fn new(id: BufferId, text: impl Into<String>) -> Self {
        let text = text.into();
        let char_len = text.chars().count();
        Self {
            id,
            text,
            char_len,
            revision: 0,
        }
    }

    pub fn id(&self) -> &BufferId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// Bumped on every mutation; lets hosts cheaply detect re-render needs.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Character-indexed slice. `None` when the range does not fit the buffer.
    pub fn slice(&self, range: OffsetRange) -> Option<String> {
        if range.start > range.end {
            return None;
        }
        let start = byte_of_char(&self.text, range.start)?;
        let end = byte_of_char(&self.text, range.end)?;
        Some(self.text[start..end].to_string())
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.char_len = text.chars().count();
        self.text = text;
        self.revision += 1;
    }

    /// Replaces `removed` characters at `start` with `insert`, returning the
    /// removed text. `None` when the span does not fit the buffer.
    pub(crate) fn splice(&mut self, start: usize, removed: usize, insert: &str) -> Option<String> {
        let removed_text = self.slice(OffsetRange::new(start, start + removed))?;
        let byte_start = byte_of_char(&self.text, start)?;
        let byte_end = byte_of_char(&self.text, start + removed)?;
        let mut next =
            String::with_capacity(self.text.len() - (byte_end - byte_start) + insert.len());
        next.push_str(&self.text[..byte_start]);
        next.push_str(insert);
        next.push_str(&self.text[byte_end..]);
        self.set_text(next);
        Some(removed_text)
    }
}

/// Byte position of the `char_idx`-th character, or of the end of `text`
/// when `char_idx` equals the character count.
pub(crate) fn byte_of_char(text: &str, char_idx: usize) -> Option<usize> {
    text.char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .nth(char_idx)
}

/// Character count of `text[..]` up to byte position `byte_idx`.
pub(crate) fn char_of_byte(text: &str, byte_idx: usize) -> usize {
    text[..byte_idx].chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_is_char_indexed() {
        let buffer = TextBuffer::new(BufferId::Summary, "naïve café");
        assert_eq!(buffer.char_len(), 10);
        assert_eq!(buffer.slice(OffsetRange::new(6, 10)).as_deref(), Some("café"));
        assert_eq!(buffer.slice(OffsetRange::new(0, 11)), None);
    }

    #[test]
    fn splice_replaces_and_returns_removed() {
        let mut buffer = TextBuffer::new(BufferId::Summary, "The cat sat.");
        let removed = buffer.splice(4, 3, "dog");
        assert_eq!(removed.as_deref(), Some("cat"));
        assert_eq!(buffer.text(), "The dog sat.");
        assert_eq!(buffer.revision(), 1);
    }

    #[test]
    fn splice_out_of_bounds_leaves_buffer_untouched() {
        let mut buffer = TextBuffer::new(BufferId::Summary, "short");
        assert_eq!(buffer.splice(3, 10, "x"), None);
        assert_eq!(buffer.text(), "short");
        assert_eq!(buffer.revision(), 0);
    }
}
