mod scheduler;

pub use scheduler::{FrameScheduler, HighlightRequest};

use crate::text::{OffsetRange, SurfaceGeometry, ViewRange};

/// A highlight box in the coordinate space of a scrollable container.
/// Derived geometry, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightRect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

/// How the host should draw the active highlight.
#[derive(Debug, Clone, PartialEq)]
pub enum HighlightPaint {
    /// Hand the range to the surface's own non-destructive highlight
    /// primitive; no overlay layer needed.
    Native { range: OffsetRange },
    /// Draw these container-local rectangles in an overlay layer above the
    /// text, without touching the text nodes themselves.
    Rects(Vec<HighlightRect>),
}

/// Re-expresses the surface's client rectangles for `range` in
/// container-local coordinates: subtract the container's viewport origin,
/// add back the current scroll offsets. Degenerate slivers produced at
/// line-wrap boundaries are dropped.
///
/// Pure and idempotent; callers re-run it after scroll, resize, or reflow.
pub fn rects_for<S: SurfaceGeometry + ?Sized>(surface: &S, range: &ViewRange) -> Vec<HighlightRect> {
    let (origin_x, origin_y) = surface.origin();
    let (scroll_x, scroll_y) = surface.scroll_offset();

    surface
        .client_rects(range)
        .into_iter()
        .filter(|rect| rect.width > 0.0 && rect.height > 0.0)
        .map(|rect| HighlightRect {
            top: rect.top - origin_y + scroll_y,
            left: rect.left - origin_x + scroll_x,
            width: rect.width,
            height: rect.height,
        })
        .collect()
}
