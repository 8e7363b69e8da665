//! Render-pass deferral for highlight and jump requests.
//!
//! Geometry can only be read after the surface has re-rendered with
//! up-to-date layout, so every highlight/jump is deferred by one frame. Only
//! the latest request survives until the frame arrives; scroll and resize
//! events coalesce into a single dirty flag instead of triggering redundant
//! geometry reads.

use tracing::debug;

use crate::text::{BufferId, OffsetRange};

/// What the next render pass should highlight, and whether to scroll there.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightRequest {
    /// Monotonic sequence number; later requests supersede earlier ones.
    pub seq: u64,
    pub buffer: BufferId,
    pub range: OffsetRange,
    /// Scroll the span into the vertical center of its container.
    pub center: bool,
}

/// Holds at most one pending highlight request plus a geometry-dirty flag.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_seq: u64,
    pending: Option<HighlightRequest>,
    geometry_dirty: bool,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a request for the next frame, superseding any pending one.
    /// Returns the sequence number assigned to the request.
    pub fn request(&mut self, buffer: BufferId, range: OffsetRange, center: bool) -> u64 {
        self.next_seq += 1;
        if let Some(stale) = self.pending.take() {
            debug!(superseded = stale.seq, by = self.next_seq, "highlight request superseded");
        }
        self.pending = Some(HighlightRequest {
            seq: self.next_seq,
            buffer,
            range,
            center,
        });
        self.next_seq
    }

    /// Marks layout inputs changed (scroll, resize, reflow). Multiple calls
    /// before the next frame coalesce.
    pub fn invalidate_geometry(&mut self) {
        self.geometry_dirty = true;
    }

    pub fn geometry_dirty(&self) -> bool {
        self.geometry_dirty
    }

    /// Takes the latest pending request, clearing the slot.
    pub fn take_pending(&mut self) -> Option<HighlightRequest> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<&HighlightRequest> {
        self.pending.as_ref()
    }

    /// Clears both the pending request and the dirty flag.
    pub fn clear(&mut self) {
        self.pending = None;
        self.geometry_dirty = false;
    }

    pub(crate) fn mark_geometry_clean(&mut self) {
        self.geometry_dirty = false;
    }

    pub fn has_work(&self) -> bool {
        self.pending.is_some() || self.geometry_dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_request_wins() {
        let mut scheduler = FrameScheduler::new();
        scheduler.request(BufferId::Summary, OffsetRange::new(0, 4), false);
        let seq = scheduler.request(BufferId::document("d1"), OffsetRange::new(8, 12), true);

        let pending = scheduler.take_pending().unwrap();
        assert_eq!(pending.seq, seq);
        assert_eq!(pending.buffer, BufferId::document("d1"));
        assert!(scheduler.take_pending().is_none());
    }

    #[test]
    fn scroll_events_coalesce() {
        let mut scheduler = FrameScheduler::new();
        scheduler.invalidate_geometry();
        scheduler.invalidate_geometry();
        scheduler.invalidate_geometry();
        assert!(scheduler.geometry_dirty());
        scheduler.mark_geometry_clean();
        assert!(!scheduler.has_work());
    }
}
