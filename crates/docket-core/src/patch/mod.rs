mod summary;

pub use summary::{diff_lines, DiffLine, LineTag};

use chrono::{DateTime, Utc};
use docket_api::EditInstruction;
use tracing::warn;
use uuid::Uuid;

use crate::anchor::adjust_range;
use crate::error::{DocketError, Result};
use crate::text::{BufferId, OffsetRange, TextBuffer, TextDelta};

/// Lifecycle of one assistant edit within its action. One-way: a fresh
/// assistant turn creates a brand-new action with fresh `Applied` patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchStatus {
    Applied,
    Reverted,
}

/// One atomic delete-then-insert edit attributable to an assistant turn.
#[derive(Debug, Clone)]
pub struct Patch {
    pub id: Uuid,
    pub buffer: BufferId,
    /// Span of the deleted text in the buffer as it stood when this patch
    /// applied.
    pub original_start: usize,
    pub original_end: usize,
    /// Span of the inserted text in the buffer now; maintained as sibling
    /// patches apply and revert around it.
    pub current_start: usize,
    pub current_end: usize,
    pub deleted_text: String,
    pub insert_text: String,
    pub status: PatchStatus,
}

impl Patch {
    pub fn is_applied(&self) -> bool {
        self.status == PatchStatus::Applied
    }

    pub fn current_range(&self) -> OffsetRange {
        OffsetRange::new(self.current_start, self.current_end)
    }

    fn insert_len(&self) -> usize {
        self.insert_text.chars().count()
    }

    fn deleted_len(&self) -> usize {
        self.deleted_text.chars().count()
    }

    fn shift_current(&mut self, delta: &TextDelta, new_len: usize) {
        let adjusted = adjust_range(self.current_range(), delta, new_len);
        self.current_start = adjusted.start;
        self.current_end = adjusted.end;
    }

    /// Human-readable description for the patch list and audit display.
    pub fn describe(&self) -> String {
        if self.deleted_text.trim().is_empty() && self.insert_text.trim().is_empty() {
            return "Minor whitespace adjustment".to_string();
        }
        if self.insert_text.is_empty() {
            return format!("Removed '{}'", self.deleted_text);
        }
        if self.deleted_text.is_empty() {
            return format!("Inserted '{}'", self.insert_text);
        }
        format!("Replaced '{}' with '{}'", self.deleted_text, self.insert_text)
    }
}

/// The ordered set of patches produced by a single assistant turn, with a
/// shared staleness flag.
#[derive(Debug, Clone)]
pub struct PatchAction {
    pub id: Uuid,
    pub buffer: BufferId,
    pub created_at: DateTime<Utc>,
    patches: Vec<Patch>,
    is_stale: bool,
    /// Buffer text captured around application, kept so the audit diff stays
    /// renderable after the action goes stale.
    before_text: String,
    after_text: String,
}

impl PatchAction {
    /// Applies `edits` to `buffer` in order, recording one patch per
    /// instruction. Offsets in each instruction address the buffer as it
    /// stands when that instruction runs; earlier patches' current spans are
    /// rebased as later ones land.
    ///
    /// On a rejected instruction the buffer is restored to its pre-action
    /// text and an error is returned.
    pub(crate) fn apply(buffer: &mut TextBuffer, edits: &[EditInstruction]) -> Result<PatchAction> {
        let before_text = buffer.text().to_string();
        let mut patches: Vec<Patch> = Vec::with_capacity(edits.len());

        for edit in edits {
            let Some(deleted) = buffer.splice(edit.start, edit.delete_length, &edit.insert_text)
            else {
                warn!(
                    buffer = %buffer.id(),
                    start = edit.start,
                    delete_length = edit.delete_length,
                    "edit instruction does not fit the buffer; action rolled back"
                );
                buffer.set_text(before_text);
                return Err(DocketError::edit(
                    buffer.id(),
                    format!(
                        "instruction at {}..{} exceeds buffer bounds",
                        edit.start,
                        edit.start + edit.delete_length
                    ),
                ));
            };

            let insert_len = edit.insert_text.chars().count();
            let delta = TextDelta {
                start: edit.start,
                removed_len: edit.delete_length,
                inserted_len: insert_len,
            };
            let new_len = buffer.char_len();
            for prior in &mut patches {
                prior.shift_current(&delta, new_len);
            }

            patches.push(Patch {
                id: Uuid::new_v4(),
                buffer: buffer.id().clone(),
                original_start: edit.start,
                original_end: edit.start + edit.delete_length,
                current_start: edit.start,
                current_end: edit.start + insert_len,
                deleted_text: deleted,
                insert_text: edit.insert_text.clone(),
                status: PatchStatus::Applied,
            });
        }

        Ok(PatchAction {
            id: Uuid::new_v4(),
            buffer: buffer.id().clone(),
            created_at: Utc::now(),
            patches,
            is_stale: false,
            before_text,
            after_text: buffer.text().to_string(),
        })
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn patch(&self, id: Uuid) -> Option<&Patch> {
        self.patches.iter().find(|patch| patch.id == id)
    }

    pub fn is_stale(&self) -> bool {
        self.is_stale
    }

    /// Whether `preview`/`revert` is currently legal for this patch.
    pub fn can_operate(&self, id: Uuid) -> bool {
        !self.is_stale && self.patch(id).is_some_and(Patch::is_applied)
    }

    pub fn has_applied_patches(&self) -> bool {
        self.patches.iter().any(Patch::is_applied)
    }

    /// Marks the action stale: the buffer changed outside this action's own
    /// operations, so patch positions can no longer be trusted. Preview and
    /// revert are disabled from here on; descriptions stay available.
    pub(crate) fn mark_stale(&mut self) {
        if !self.is_stale {
            warn!(action = %self.id, buffer = %self.buffer, "patch action went stale");
            self.is_stale = true;
        }
    }

    /// Undoes exactly one applied patch's net edit: the inserted span is
    /// replaced with the original deleted text, the patch flips to
    /// `Reverted`, and every other applied patch's current span is rebased.
    ///
    /// Returns the delta applied to the buffer so the owner can rebase its
    /// anchors, or `None` when the operation is not legal (stale action,
    /// unknown or already-reverted patch) — a silent no-op by contract.
    pub(crate) fn revert_patch(&mut self, buffer: &mut TextBuffer, id: Uuid) -> Option<TextDelta> {
        if !self.can_operate(id) {
            return None;
        }
        let idx = self.patches.iter().position(|patch| patch.id == id)?;
        let (start, insert_len, deleted_len, deleted_text) = {
            let patch = &self.patches[idx];
            (
                patch.current_start,
                patch.insert_len(),
                patch.deleted_len(),
                patch.deleted_text.clone(),
            )
        };

        buffer.splice(start, insert_len, &deleted_text)?;
        let delta = TextDelta {
            start,
            removed_len: insert_len,
            inserted_len: deleted_len,
        };

        self.patches[idx].status = PatchStatus::Reverted;
        let new_len = buffer.char_len();
        for (i, patch) in self.patches.iter_mut().enumerate() {
            if i != idx && patch.is_applied() {
                patch.shift_current(&delta, new_len);
            }
        }
        Some(delta)
    }

    /// Reverts every applied patch, most recent first. Returns the deltas in
    /// the order they were applied to the buffer.
    pub(crate) fn revert_all(&mut self, buffer: &mut TextBuffer) -> Vec<TextDelta> {
        let ids: Vec<Uuid> = self
            .patches
            .iter()
            .rev()
            .filter(|patch| patch.is_applied())
            .map(|patch| patch.id)
            .collect();
        ids.into_iter()
            .filter_map(|id| self.revert_patch(buffer, id))
            .collect()
    }

    /// One description line per patch, in application order. Available even
    /// when the action is stale, for the audit display.
    pub fn descriptions(&self) -> Vec<String> {
        self.patches.iter().map(Patch::describe).collect()
    }

    /// The whole action's before/after rendered as tagged lines.
    pub fn diff_lines(&self) -> Vec<DiffLine> {
        diff_lines(&self.before_text, &self.after_text)
    }
}
