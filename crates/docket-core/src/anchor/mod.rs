mod adjust;

pub use adjust::adjust_range;

use docket_api::ContextSource;
use uuid::Uuid;

use crate::text::{char_of_byte, BufferId, OffsetRange};

/// What a tracked span means to the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorKind {
    /// The one ephemeral selection awaiting promotion. Replaced on every new
    /// selection, cleared on click-away or Escape.
    PendingSelection,
    /// A span promoted into the chat request context. Its text is re-sliced
    /// from the live buffer on every use, never cached.
    ChatContext { source: ContextSource },
    /// Server-sourced checklist evidence. Rendered only; re-fetched rather
    /// than adjusted locally.
    ChecklistEvidence(EvidenceTag),
}

/// Category metadata carried by a checklist evidence span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceTag {
    pub value_id: String,
    pub category_id: String,
    pub label: String,
    pub color: String,
}

/// A durable reference to a span of text in one buffer, surviving edits via
/// adjustment.
#[derive(Debug, Clone)]
pub struct Anchor {
    pub id: Uuid,
    pub buffer: BufferId,
    pub range: OffsetRange,
    pub kind: AnchorKind,
}

impl Anchor {
    pub fn new(buffer: BufferId, range: OffsetRange, kind: AnchorKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            buffer,
            range,
            kind,
        }
    }
}

/// A proposed replacement for a literal substring of the summary.
///
/// Unlike anchors, suggestions carry no stored offsets: they are located by
/// substring search against the current text at render time, since they are
/// derived fresh from whatever the summary says now.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub id: Uuid,
    /// Id assigned by the backend that produced the suggestion.
    pub source_id: String,
    pub find_text: String,
    pub replacement: String,
}

impl Suggestion {
    pub fn new(
        source_id: impl Into<String>,
        find_text: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_id: source_id.into(),
            find_text: find_text.into(),
            replacement: replacement.into(),
        }
    }

    /// Locates the first occurrence of `find_text` in `text`, as a character
    /// offset range. `None` when the substring no longer appears.
    pub fn resolve(&self, text: &str) -> Option<OffsetRange> {
        if self.find_text.is_empty() {
            return None;
        }
        let byte_start = text.find(&self.find_text)?;
        let start = char_of_byte(text, byte_start);
        Some(OffsetRange::new(
            start,
            start + self.find_text.chars().count(),
        ))
    }
}
