//! The highlight coordinator.
//!
//! One `Workspace` owns every canonical text buffer, the live anchor
//! collections, the patch actions, and the single active highlight. Every
//! mutation goes through its entry points so that diffing, anchor rebasing,
//! staleness marking, and overlay invalidation stay in lock-step. All state
//! changes are synchronous on the caller's event loop; the only deferred
//! work is geometry resolution, which waits for the next render pass.

use std::collections::HashMap;

use docket_api::{
    ChatReply, ChecklistCategory, ContextSource, ContextSpan, DocumentRecord, NewChecklistItem,
    SuggestionRecord,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::anchor::{adjust_range, Anchor, AnchorKind, EvidenceTag, Suggestion};
use crate::chat::{ChatMessage, ChatThread};
use crate::config::Settings;
use crate::error::{DocketError, Result};
use crate::overlay::{rects_for, FrameScheduler, HighlightPaint};
use crate::patch::PatchAction;
use crate::session::InteractionMode;
use crate::text::{
    diff_text, to_offsets, to_view_range, BufferId, FlatSurface, OffsetRange, SurfaceGeometry,
    TextBuffer, TextDelta, TextSurface, ViewRange,
};

/// A document known to the workspace, for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub id: String,
    pub title: String,
}

/// Why the current highlight is on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightOrigin {
    /// Previewing one patch of an assistant action.
    PatchPreview(Uuid),
    /// Jumped to a checklist evidence span.
    Evidence(String),
    /// Jumped to a promoted chat-context span.
    Context(Uuid),
}

/// The single highlight the workspace is currently rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveHighlight {
    pub buffer: BufferId,
    pub range: OffsetRange,
    pub origin: HighlightOrigin,
}

/// Resolved geometry handed back to the host after a render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub buffer: BufferId,
    pub range: OffsetRange,
    pub paint: HighlightPaint,
    /// Vertical scroll position that centers the span, when a jump asked
    /// for it. The host applies it and reports back via `notify_scrolled`.
    pub scroll_to: Option<f32>,
}

pub struct Workspace {
    settings: Settings,
    mode: InteractionMode,
    buffers: HashMap<BufferId, TextBuffer>,
    documents: Vec<DocumentInfo>,
    active_document: Option<String>,
    summary_edit_mode: bool,
    pending_selection: Option<Anchor>,
    context_anchors: Vec<Anchor>,
    evidence_anchors: Vec<Anchor>,
    suggestions: Vec<Suggestion>,
    actions: Vec<PatchAction>,
    active_highlight: Option<ActiveHighlight>,
    scheduler: FrameScheduler,
    chat: ChatThread,
}

impl Workspace {
    pub fn new(settings: Settings) -> Self {
        let chat = ChatThread::new().with_max_messages(settings.chat.max_messages);
        Self {
            settings,
            mode: InteractionMode::default(),
            buffers: HashMap::new(),
            documents: Vec::new(),
            active_document: None,
            summary_edit_mode: false,
            pending_selection: None,
            context_anchors: Vec::new(),
            evidence_anchors: Vec::new(),
            suggestions: Vec::new(),
            actions: Vec::new(),
            active_highlight: None,
            scheduler: FrameScheduler::new(),
            chat,
        }
    }

    // ── Views & mode ──────────────────────────────────────────────────────

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
    }

    pub fn documents(&self) -> &[DocumentInfo] {
        &self.documents
    }

    pub fn active_document(&self) -> Option<&str> {
        self.active_document.as_deref()
    }

    /// Switches the active document. A highlight scoped to a different
    /// document does not survive the switch.
    pub fn set_active_document(&mut self, id: &str) -> bool {
        if !self.documents.iter().any(|doc| doc.id == id) {
            return false;
        }
        if self.active_document.as_deref() != Some(id) {
            self.active_document = Some(id.to_string());
            if self
                .active_highlight
                .as_ref()
                .and_then(|h| h.buffer.document_id())
                .is_some_and(|owner| owner != id)
            {
                self.clear_active_highlight();
            }
            self.scheduler.invalidate_geometry();
        }
        true
    }

    pub fn summary_edit_mode(&self) -> bool {
        self.summary_edit_mode
    }

    pub fn enter_summary_edit_mode(&mut self) {
        self.summary_edit_mode = true;
        self.clear_active_highlight();
    }

    pub fn exit_summary_edit_mode(&mut self) {
        self.summary_edit_mode = false;
    }

    // ── Inbound data ──────────────────────────────────────────────────────

    /// Replaces the open document set. Anchors into discarded documents die
    /// with their buffers; checklist evidence is expected to be re-fetched
    /// for the new set.
    pub fn load_documents(&mut self, records: Vec<DocumentRecord>) {
        self.buffers.retain(|id, _| *id == BufferId::Summary);
        self.documents.clear();
        for record in records {
            let id = BufferId::document(record.id.clone());
            self.buffers
                .insert(id, TextBuffer::new(BufferId::document(record.id.clone()), record.content));
            self.documents.push(DocumentInfo {
                id: record.id,
                title: record.title,
            });
        }

        let buffers = &self.buffers;
        self.context_anchors
            .retain(|anchor| buffers.contains_key(&anchor.buffer));
        self.evidence_anchors.clear();

        if let Some(pending) = &self.pending_selection {
            if !self.buffers.contains_key(&pending.buffer) {
                self.pending_selection = None;
            }
        }
        if let Some(active) = &self.active_highlight {
            if !self.buffers.contains_key(&active.buffer) {
                self.active_highlight = None;
            }
        }

        let still_open = self
            .active_document
            .as_deref()
            .is_some_and(|id| self.documents.iter().any(|doc| doc.id == id));
        if !still_open {
            self.active_document = self.documents.first().map(|doc| doc.id.clone());
        }
        self.scheduler.invalidate_geometry();
    }

    /// Rebuilds the checklist evidence anchors from a fresh fetch. Spans
    /// that do not fit their document are skipped rather than clamped.
    pub fn load_checklist(&mut self, categories: Vec<ChecklistCategory>) {
        let mut anchors = Vec::new();
        for category in &categories {
            for value in &category.values {
                let buffer_id = BufferId::document(value.document_id.clone());
                let range = OffsetRange::new(value.start_offset, value.end_offset);
                let fits = self
                    .buffers
                    .get(&buffer_id)
                    .is_some_and(|buffer| !range.is_empty() && range.end <= buffer.char_len());
                if !fits {
                    warn!(
                        value = %value.id,
                        buffer = %buffer_id,
                        "checklist evidence span does not fit its document; skipped"
                    );
                    continue;
                }
                anchors.push(Anchor::new(
                    buffer_id,
                    range,
                    AnchorKind::ChecklistEvidence(EvidenceTag {
                        value_id: value.id.clone(),
                        category_id: category.id.clone(),
                        label: category.label.clone(),
                        color: category.color.clone(),
                    }),
                ));
            }
        }
        self.evidence_anchors = anchors;
        self.scheduler.invalidate_geometry();
    }

    /// Installs freshly derived suggestions, replacing the previous set.
    pub fn load_suggestions(&mut self, records: Vec<SuggestionRecord>) {
        self.suggestions = records
            .into_iter()
            .map(|record| Suggestion::new(record.id, record.find_text, record.replacement))
            .collect();
    }

    /// Installs or regenerates the summary. Regeneration is a mutation from
    /// outside the patch stack: anchors rebase and live actions go stale.
    pub fn set_summary(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !self.buffers.contains_key(&BufferId::Summary) {
            self.buffers
                .insert(BufferId::Summary, TextBuffer::new(BufferId::Summary, text));
            return;
        }
        let _ = self.replace_buffer_text(&BufferId::Summary, text);
    }

    /// Free-form user edit of the summary (typing in edit mode).
    pub fn edit_summary(&mut self, text: impl Into<String>) -> Result<()> {
        self.replace_buffer_text(&BufferId::Summary, text.into())
    }

    pub fn summary_text(&self) -> Option<&str> {
        self.buffers.get(&BufferId::Summary).map(TextBuffer::text)
    }

    pub fn document_text(&self, id: &str) -> Option<&str> {
        self.buffers
            .get(&BufferId::document(id))
            .map(TextBuffer::text)
    }

    pub fn buffer(&self, id: &BufferId) -> Option<&TextBuffer> {
        self.buffers.get(id)
    }

    // ── Selection & promotion ─────────────────────────────────────────────

    /// Feeds a selection change from a structured (multi-run) surface.
    /// Returns whether the promote affordance should be shown for it.
    pub fn selection_changed<S: TextSurface + ?Sized>(
        &mut self,
        buffer: &BufferId,
        surface: &S,
        range: &ViewRange,
    ) -> bool {
        let offsets = to_offsets(surface, range);
        self.install_pending_selection(buffer, offsets)
    }

    /// Feeds a selection change from a flat text-entry widget, whose native
    /// selection indices are offsets directly.
    pub fn selection_changed_flat(
        &mut self,
        buffer: &BufferId,
        surface: &FlatSurface,
        sel_start: usize,
        sel_end: usize,
    ) -> bool {
        let offsets = surface.selection_offsets(sel_start, sel_end);
        self.install_pending_selection(buffer, offsets)
    }

    fn install_pending_selection(
        &mut self,
        buffer: &BufferId,
        offsets: Option<OffsetRange>,
    ) -> bool {
        let valid = offsets.filter(|range| {
            self.buffers
                .get(buffer)
                .is_some_and(|b| range.end <= b.char_len())
        });
        match valid {
            Some(range) => {
                self.pending_selection = Some(Anchor::new(
                    buffer.clone(),
                    range,
                    AnchorKind::PendingSelection,
                ));
                self.mode.allows_promotion(buffer)
            }
            None => {
                self.pending_selection = None;
                false
            }
        }
    }

    pub fn pending_selection(&self) -> Option<&Anchor> {
        self.pending_selection.as_ref()
    }

    /// Whether the current pending selection may be offered for promotion
    /// under the active interaction mode.
    pub fn promote_affordance_visible(&self) -> bool {
        self.pending_selection
            .as_ref()
            .is_some_and(|anchor| self.mode.allows_promotion(&anchor.buffer))
    }

    /// Promotes the pending selection into a durable chat-context anchor and
    /// returns the outbound span for the next chat request. `None` when the
    /// gate does not allow promotion right now.
    pub fn promote_selection(&mut self) -> Option<ContextSpan> {
        if !self.promote_affordance_visible() {
            return None;
        }
        let anchor = self.pending_selection.take()?;
        let text = self.buffers.get(&anchor.buffer)?.slice(anchor.range)?;
        if text.is_empty() {
            return None;
        }
        let source = match &anchor.buffer {
            BufferId::Summary => ContextSource::Summary,
            BufferId::Document(_) => ContextSource::Document,
        };
        let span = ContextSpan {
            source,
            document_id: anchor.buffer.document_id().map(str::to_string),
            text,
            start_offset: anchor.range.start,
            end_offset: anchor.range.end,
        };
        self.push_context_anchor(Anchor::new(
            anchor.buffer,
            anchor.range,
            AnchorKind::ChatContext { source },
        ));
        Some(span)
    }

    /// Promotes a checklist evidence span into chat context.
    pub fn promote_evidence(&mut self, value_id: &str) -> Option<ContextSpan> {
        let anchor = self.evidence_anchors.iter().find(|anchor| {
            matches!(&anchor.kind, AnchorKind::ChecklistEvidence(tag) if tag.value_id == value_id)
        })?;
        let buffer = anchor.buffer.clone();
        let range = anchor.range;
        let text = self.buffers.get(&buffer)?.slice(range)?;
        if text.is_empty() {
            return None;
        }
        let span = ContextSpan {
            source: ContextSource::ChecklistEvidence,
            document_id: buffer.document_id().map(str::to_string),
            text,
            start_offset: range.start,
            end_offset: range.end,
        };
        self.push_context_anchor(Anchor::new(
            buffer,
            range,
            AnchorKind::ChatContext {
                source: ContextSource::ChecklistEvidence,
            },
        ));
        Some(span)
    }

    fn push_context_anchor(&mut self, anchor: Anchor) {
        self.context_anchors.push(anchor);
        while self.context_anchors.len() > self.settings.context.max_spans {
            let evicted = self.context_anchors.remove(0);
            debug!(anchor = %evicted.id, "context span evicted, over max_spans");
        }
    }

    pub fn context_anchors(&self) -> &[Anchor] {
        &self.context_anchors
    }

    pub fn remove_context(&mut self, anchor_id: Uuid) -> bool {
        let before = self.context_anchors.len();
        self.context_anchors.retain(|anchor| anchor.id != anchor_id);
        if self
            .active_highlight
            .as_ref()
            .is_some_and(|h| h.origin == HighlightOrigin::Context(anchor_id))
        {
            self.clear_active_highlight();
        }
        self.context_anchors.len() < before
    }

    /// Re-slices every chat-context anchor from its live buffer. Text is
    /// never cached, so payloads always reflect the current buffers.
    pub fn context_payloads(&self) -> Vec<ContextSpan> {
        self.context_anchors
            .iter()
            .filter_map(|anchor| {
                let text = self.buffers.get(&anchor.buffer)?.slice(anchor.range)?;
                if text.is_empty() {
                    return None;
                }
                let source = match &anchor.kind {
                    AnchorKind::ChatContext { source } => *source,
                    _ => return None,
                };
                Some(ContextSpan {
                    source,
                    document_id: anchor.buffer.document_id().map(str::to_string),
                    text,
                    start_offset: anchor.range.start,
                    end_offset: anchor.range.end,
                })
            })
            .collect()
    }

    /// Builds the payload for adding the pending selection to the checklist.
    /// Only legal from the checklist view, for a document selection; the
    /// selection is consumed on success.
    pub fn checklist_item_payload(&mut self, category_id: &str) -> Option<NewChecklistItem> {
        if self.mode != InteractionMode::Checklist {
            return None;
        }
        let document_id = self
            .pending_selection
            .as_ref()
            .and_then(|anchor| anchor.buffer.document_id())?
            .to_string();
        let anchor = self.pending_selection.take()?;
        let text = self.buffers.get(&anchor.buffer)?.slice(anchor.range)?;
        if text.is_empty() {
            return None;
        }
        Some(NewChecklistItem {
            category_id: category_id.to_string(),
            text,
            document_id,
            start_offset: anchor.range.start,
            end_offset: anchor.range.end,
        })
    }

    /// Clears the pending selection (Escape).
    pub fn clear_selection(&mut self) {
        self.pending_selection = None;
    }

    /// Click outside all tracked surfaces: both the pending selection and
    /// the active highlight go away.
    pub fn click_away(&mut self) {
        self.pending_selection = None;
        self.clear_active_highlight();
    }

    // ── Chat & patches ────────────────────────────────────────────────────

    /// Records an outgoing user message with the current context spans
    /// attached, returning it for the host to ship to the backend.
    pub fn record_user_message(&mut self, content: impl Into<String>) -> ChatMessage {
        let message = ChatMessage::user(content, self.context_payloads());
        self.chat.push(message.clone());
        message
    }

    /// Consumes an assistant reply. When it carries edit instructions they
    /// are applied to the summary as a new patch action; any previous live
    /// action on the summary goes stale.
    pub fn apply_reply(&mut self, reply: ChatReply) -> Result<Option<Uuid>> {
        self.chat.push(ChatMessage::assistant(reply.message.clone()));
        if reply.edits.is_empty() {
            return Ok(None);
        }

        let (action, delta, new_len) = {
            let buffer = self
                .buffers
                .get_mut(&BufferId::Summary)
                .ok_or_else(|| DocketError::unknown_buffer(&BufferId::Summary))?;
            let before = buffer.text().to_string();
            let action = PatchAction::apply(buffer, &reply.edits)?;
            let delta = diff_text(&before, buffer.text());
            (action, delta, buffer.char_len())
        };

        if let Some(delta) = delta {
            self.rebase_anchors(&BufferId::Summary, &delta, new_len);
        }
        for prior in self
            .actions
            .iter_mut()
            .filter(|a| a.buffer == BufferId::Summary && !a.is_stale())
        {
            prior.mark_stale();
        }

        let id = action.id;
        self.actions.push(action);
        self.scheduler.invalidate_geometry();
        Ok(Some(id))
    }

    pub fn chat(&self) -> &ChatThread {
        &self.chat
    }

    pub fn actions(&self) -> &[PatchAction] {
        &self.actions
    }

    pub fn latest_action(&self) -> Option<&PatchAction> {
        self.actions.last()
    }

    pub fn action(&self, id: Uuid) -> Option<&PatchAction> {
        self.actions.iter().find(|action| action.id == id)
    }

    fn action_index_of_patch(&self, patch_id: Uuid) -> Option<usize> {
        self.actions
            .iter()
            .position(|action| action.patch(patch_id).is_some())
    }

    /// Toggles the preview highlight for one patch. Returns whether the
    /// preview is active afterwards. No-op `false` for stale actions and
    /// non-applied patches.
    pub fn preview_patch(&mut self, patch_id: Uuid) -> bool {
        if self
            .active_highlight
            .as_ref()
            .is_some_and(|h| h.origin == HighlightOrigin::PatchPreview(patch_id))
        {
            self.clear_active_highlight();
            return false;
        }
        let Some(idx) = self.action_index_of_patch(patch_id) else {
            return false;
        };
        let action = &self.actions[idx];
        if !action.can_operate(patch_id) {
            return false;
        }
        let Some(patch) = action.patch(patch_id) else {
            return false;
        };
        let buffer = action.buffer.clone();
        let range = patch.current_range();
        self.set_active_highlight(buffer, range, HighlightOrigin::PatchPreview(patch_id), true);
        true
    }

    /// Undoes exactly one patch's net edit. No-op `false` when the patch is
    /// stale, unknown, or already reverted.
    pub fn revert_patch(&mut self, patch_id: Uuid) -> bool {
        let Some(idx) = self.action_index_of_patch(patch_id) else {
            return false;
        };
        let buffer_id = self.actions[idx].buffer.clone();

        let (delta, new_len) = {
            let Some(buffer) = self.buffers.get_mut(&buffer_id) else {
                return false;
            };
            let action = &mut self.actions[idx];
            match action.revert_patch(buffer, patch_id) {
                Some(delta) => (delta, buffer.char_len()),
                None => return false,
            }
        };

        self.rebase_anchors(&buffer_id, &delta, new_len);
        let acting = self.actions[idx].id;
        for other in self
            .actions
            .iter_mut()
            .filter(|a| a.id != acting && a.buffer == buffer_id && !a.is_stale())
        {
            other.mark_stale();
        }
        if self
            .active_highlight
            .as_ref()
            .is_some_and(|h| h.origin == HighlightOrigin::PatchPreview(patch_id))
        {
            self.clear_active_highlight();
        }
        self.scheduler.invalidate_geometry();
        true
    }

    /// Reverts every applied patch of an action, most recent first.
    /// Returns how many patches were undone.
    pub fn revert_all_patches(&mut self, action_id: Uuid) -> usize {
        let ids: Vec<Uuid> = match self.action(action_id) {
            Some(action) if !action.is_stale() => action
                .patches()
                .iter()
                .rev()
                .filter(|patch| patch.is_applied())
                .map(|patch| patch.id)
                .collect(),
            _ => return 0,
        };
        ids.into_iter()
            .filter(|id| self.revert_patch(*id))
            .count()
    }

    /// Clears an action from view without touching the buffer. Its patches
    /// can no longer be previewed or reverted afterwards.
    pub fn dismiss_action(&mut self, action_id: Uuid) -> bool {
        let Some(idx) = self.actions.iter().position(|a| a.id == action_id) else {
            return false;
        };
        let removed = self.actions.remove(idx);
        if self.active_highlight.as_ref().is_some_and(|h| {
            matches!(&h.origin, HighlightOrigin::PatchPreview(patch) if removed.patch(*patch).is_some())
        }) {
            self.clear_active_highlight();
        }
        true
    }

    // ── Suggestions ───────────────────────────────────────────────────────

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Suggestions that still locate in the current summary, with their
    /// freshly resolved ranges. Unresolvable ones are skipped.
    pub fn resolved_suggestions(&self) -> Vec<(&Suggestion, OffsetRange)> {
        let Some(summary) = self.summary_text() else {
            return Vec::new();
        };
        self.suggestions
            .iter()
            .filter_map(|suggestion| {
                suggestion
                    .resolve(summary)
                    .map(|range| (suggestion, range))
            })
            .collect()
    }

    /// Applies a suggestion's replacement to the summary. This is a normal
    /// external mutation: anchors rebase and live patch actions go stale.
    pub fn accept_suggestion(&mut self, suggestion_id: Uuid) -> bool {
        let Some(idx) = self
            .suggestions
            .iter()
            .position(|suggestion| suggestion.id == suggestion_id)
        else {
            return false;
        };
        let new_text = {
            let Some(summary) = self.buffers.get(&BufferId::Summary) else {
                return false;
            };
            let Some(range) = self.suggestions[idx].resolve(summary.text()) else {
                debug!(
                    suggestion = %self.suggestions[idx].id,
                    "suggestion no longer locates in the summary; dropped"
                );
                self.suggestions.remove(idx);
                return false;
            };
            let prefix = summary.slice(OffsetRange::new(0, range.start));
            let suffix = summary.slice(OffsetRange::new(range.end, summary.char_len()));
            match (prefix, suffix) {
                (Some(prefix), Some(suffix)) => {
                    format!("{prefix}{}{suffix}", self.suggestions[idx].replacement)
                }
                _ => return false,
            }
        };
        self.suggestions.remove(idx);
        self.replace_buffer_text(&BufferId::Summary, new_text).is_ok()
    }

    pub fn dismiss_suggestion(&mut self, suggestion_id: Uuid) -> bool {
        let before = self.suggestions.len();
        self.suggestions
            .retain(|suggestion| suggestion.id != suggestion_id);
        self.suggestions.len() < before
    }

    // ── Evidence & context jumps ──────────────────────────────────────────

    pub fn evidence_anchors(&self) -> &[Anchor] {
        &self.evidence_anchors
    }

    /// Jumps to a checklist evidence span, switching the active document
    /// first when needed. Resolution happens on the next render pass.
    pub fn jump_to_evidence(&mut self, value_id: &str) -> bool {
        let found = self.evidence_anchors.iter().find(|anchor| {
            matches!(&anchor.kind, AnchorKind::ChecklistEvidence(tag) if tag.value_id == value_id)
        });
        let Some(anchor) = found else {
            return false;
        };
        let buffer = anchor.buffer.clone();
        let range = anchor.range;
        if let Some(doc) = buffer.document_id() {
            let doc = doc.to_string();
            self.set_active_document(&doc);
        }
        self.set_active_highlight(buffer, range, HighlightOrigin::Evidence(value_id.to_string()), true);
        true
    }

    /// Jumps to a promoted context span.
    pub fn jump_to_context(&mut self, anchor_id: Uuid) -> bool {
        let found = self
            .context_anchors
            .iter()
            .find(|anchor| anchor.id == anchor_id);
        let Some(anchor) = found else {
            return false;
        };
        let buffer = anchor.buffer.clone();
        let range = anchor.range;
        if let Some(doc) = buffer.document_id() {
            let doc = doc.to_string();
            self.set_active_document(&doc);
        }
        self.set_active_highlight(buffer, range, HighlightOrigin::Context(anchor_id), true);
        true
    }

    // ── Rendering protocol ────────────────────────────────────────────────

    pub fn active_highlight(&self) -> Option<&ActiveHighlight> {
        self.active_highlight.as_ref()
    }

    /// The buffer whose surface the next `on_frame` call must supply, if any
    /// work is queued.
    pub fn frame_target(&self) -> Option<&BufferId> {
        if let Some(request) = self.scheduler.pending() {
            return Some(&request.buffer);
        }
        if self.scheduler.geometry_dirty() {
            return self.active_highlight.as_ref().map(|h| &h.buffer);
        }
        None
    }

    pub fn notify_scrolled(&mut self) {
        self.scheduler.invalidate_geometry();
    }

    pub fn notify_resized(&mut self) {
        self.scheduler.invalidate_geometry();
    }

    /// Runs one render pass against the surface for [`Self::frame_target`].
    ///
    /// Resolves the latest pending highlight request (superseded ones are
    /// already gone), or refreshes the active highlight's geometry when only
    /// scroll/resize happened. Stored offsets that no longer resolve clear
    /// the highlight silently.
    pub fn on_frame(&mut self, surface: &dyn SurfaceGeometry) -> Option<FrameOutcome> {
        let (buffer, range, center) = if let Some(request) = self.scheduler.take_pending() {
            self.scheduler.mark_geometry_clean();
            (
                request.buffer,
                request.range,
                request.center && self.settings.highlight.center_on_jump,
            )
        } else if self.scheduler.geometry_dirty() {
            self.scheduler.mark_geometry_clean();
            let active = self.active_highlight.as_ref()?;
            (active.buffer.clone(), active.range, false)
        } else {
            return None;
        };

        let Some(view) = to_view_range(surface, range) else {
            debug!(%buffer, ?range, "highlight no longer resolves; cleared");
            if self
                .active_highlight
                .as_ref()
                .is_some_and(|h| h.buffer == buffer)
            {
                self.active_highlight = None;
            }
            return None;
        };

        let rects = rects_for(surface, &view);
        let scroll_to = if center {
            rects.first().map(|rect| {
                (rect.top + rect.height / 2.0 - surface.viewport_height() / 2.0).max(0.0)
            })
        } else {
            None
        };
        let paint = if self.settings.highlight.prefer_native && surface.supports_native_highlight()
        {
            HighlightPaint::Native { range }
        } else {
            HighlightPaint::Rects(rects)
        };

        Some(FrameOutcome {
            buffer,
            range,
            paint,
            scroll_to,
        })
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn set_active_highlight(
        &mut self,
        buffer: BufferId,
        range: OffsetRange,
        origin: HighlightOrigin,
        center: bool,
    ) {
        self.scheduler.request(buffer.clone(), range, center);
        self.active_highlight = Some(ActiveHighlight {
            buffer,
            range,
            origin,
        });
    }

    fn clear_active_highlight(&mut self) {
        self.active_highlight = None;
        self.scheduler.clear();
    }

    /// Replaces a buffer's text wholesale. This is the external-mutation
    /// path: the minimal delta is computed once, every anchor into the
    /// buffer is rebased (pruning the collapsed ones), and live patch
    /// actions on the buffer go stale.
    fn replace_buffer_text(&mut self, id: &BufferId, text: String) -> Result<()> {
        let (delta, new_len) = {
            let buffer = self
                .buffers
                .get_mut(id)
                .ok_or_else(|| DocketError::unknown_buffer(id))?;
            let Some(delta) = diff_text(buffer.text(), &text) else {
                return Ok(());
            };
            buffer.set_text(text);
            (delta, buffer.char_len())
        };

        self.rebase_anchors(id, &delta, new_len);
        for action in self
            .actions
            .iter_mut()
            .filter(|action| &action.buffer == id && !action.is_stale())
        {
            action.mark_stale();
        }
        self.scheduler.invalidate_geometry();
        Ok(())
    }

    /// Pushes one buffer delta through every locally adjusted anchor.
    /// Checklist evidence is deliberately left alone: it is server-sourced
    /// and replaced by the next fetch.
    fn rebase_anchors(&mut self, id: &BufferId, delta: &TextDelta, new_len: usize) {
        if let Some(pending) = self.pending_selection.take() {
            self.pending_selection = Self::rebased(pending, id, delta, new_len);
        }

        let kept: Vec<Anchor> = std::mem::take(&mut self.context_anchors)
            .into_iter()
            .filter_map(|anchor| Self::rebased(anchor, id, delta, new_len))
            .collect();
        self.context_anchors = kept;

        if let Some(active) = self.active_highlight.take() {
            self.active_highlight = if &active.buffer == id {
                let range = adjust_range(active.range, delta, new_len);
                (!range.is_empty()).then_some(ActiveHighlight { range, ..active })
            } else {
                Some(active)
            };
        }
    }

    fn rebased(
        mut anchor: Anchor,
        id: &BufferId,
        delta: &TextDelta,
        new_len: usize,
    ) -> Option<Anchor> {
        if &anchor.buffer != id {
            return Some(anchor);
        }
        anchor.range = adjust_range(anchor.range, delta, new_len);
        if anchor.range.is_empty() {
            debug!(anchor = %anchor.id, buffer = %anchor.buffer, "anchor collapsed after edit; dropped");
            return None;
        }
        Some(anchor)
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
