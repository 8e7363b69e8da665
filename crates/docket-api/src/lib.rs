//! Request/response shapes crossing the boundary between the Docket core and
//! its external collaborators (network layer, LLM backends, hosting shell).
//!
//! These are plain data: the core never performs transport itself.

use serde::{Deserialize, Serialize};

// ── Inbound ───────────────────────────────────────────────────────────────

/// A case document as delivered by the network layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// A checklist category with its collected fact values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistCategory {
    pub id: String,
    pub label: String,
    /// Display color for evidence highlights, e.g. `"#d08770"`.
    pub color: String,
    #[serde(default)]
    pub values: Vec<ChecklistValue>,
}

/// One fact value and the evidence span backing it in a source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistValue {
    pub id: String,
    pub text: String,
    pub document_id: String,
    pub start_offset: usize,
    pub end_offset: usize,
}

/// One edit the assistant wants applied to the summary.
///
/// Offsets address the buffer as it stands when this instruction is applied;
/// the instructions in a reply are consumed in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditInstruction {
    pub start: usize,
    pub delete_length: usize,
    pub insert_text: String,
}

/// An assistant chat reply, optionally carrying summary edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
    #[serde(default)]
    pub edits: Vec<EditInstruction>,
}

/// A proposed replacement for a literal substring of the summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionRecord {
    pub id: String,
    pub find_text: String,
    pub replacement: String,
}

// ── Outbound ──────────────────────────────────────────────────────────────

/// Where a promoted context span originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextSource {
    Document,
    Summary,
    ChecklistEvidence,
}

/// A span of live text attached to an outgoing chat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSpan {
    pub source: ContextSource,
    /// `None` when the span lives in the summary rather than a document.
    pub document_id: Option<String>,
    pub text: String,
    pub start_offset: usize,
    pub end_offset: usize,
}

/// Payload emitted when the user adds a fact to the checklist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChecklistItem {
    pub category_id: String,
    pub text: String,
    pub document_id: String,
    pub start_offset: usize,
    pub end_offset: usize,
}
