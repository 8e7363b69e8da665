//! Rendering-surface abstraction.
//!
//! The browser primitives the engine was designed against (DOM ranges, tree
//! walkers, `getClientRects`) are hidden behind two small traits. Any host
//! that can report the text content of a container as ordered runs, and the
//! on-screen boxes of a resolved range, can reuse the offset mapper and
//! overlay renderer unchanged. Geometry here is pure arithmetic so it can be
//! unit tested without a windowing stack.

use crate::text::OffsetRange;

/// A position on a surface: which text run, and the character offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPoint {
    pub run: usize,
    pub offset: usize,
}

/// A view-level range between two points on one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRange {
    pub start: RunPoint,
    pub end: RunPoint,
}

impl ViewRange {
    pub fn new(start: RunPoint, end: RunPoint) -> Self {
        Self { start, end }
    }

    pub fn collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Read access to the textual content of a rendering surface.
///
/// The offset mapper depends only on the concatenated run text, never on run
/// identity, so stored offsets survive a re-render that rebuilds the runs.
pub trait TextSurface {
    fn run_count(&self) -> usize;

    fn run_text(&self, run: usize) -> &str;

    /// Concatenation of every run in layout order.
    fn text(&self) -> String {
        (0..self.run_count()).map(|run| self.run_text(run)).collect()
    }
}

/// An axis-aligned box in viewport coordinates, as a surface reports it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

/// Geometry access for surfaces that can carry highlight overlays.
pub trait SurfaceGeometry: TextSurface {
    /// On-screen boxes covering `range`, in viewport coordinates, one per
    /// visual line. Degenerate boxes at wrap boundaries are reported as-is;
    /// the overlay renderer filters them.
    fn client_rects(&self, range: &ViewRange) -> Vec<SurfaceRect>;

    /// Viewport position of the scrollable container's top-left corner.
    fn origin(&self) -> (f32, f32);

    /// Current `(horizontal, vertical)` scroll offsets of the container.
    fn scroll_offset(&self) -> (f32, f32);

    /// Height of the visible viewport, used for vertical centering on jumps.
    fn viewport_height(&self) -> f32;

    /// Whether the surface offers a native non-destructive range highlight
    /// (zero extra layers, reflow-correct). Purely a rendering fast path.
    fn supports_native_highlight(&self) -> bool {
        false
    }
}

// ── Flat surface ──────────────────────────────────────────────────────────

/// A single-run surface over one string, modelling a plain text-entry widget
/// whose native selection indices are already character offsets.
#[derive(Debug, Clone, Default)]
pub struct FlatSurface {
    text: String,
}

impl FlatSurface {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Converts a native widget selection into an offset range, normalising
    /// anchor/focus order. `None` when collapsed or out of bounds.
    pub fn selection_offsets(&self, sel_start: usize, sel_end: usize) -> Option<OffsetRange> {
        let (start, end) = if sel_start <= sel_end {
            (sel_start, sel_end)
        } else {
            (sel_end, sel_start)
        };
        if start == end || end > self.text.chars().count() {
            return None;
        }
        Some(OffsetRange::new(start, end))
    }
}

impl TextSurface for FlatSurface {
    fn run_count(&self) -> usize {
        1
    }

    fn run_text(&self, run: usize) -> &str {
        debug_assert_eq!(run, 0);
        &self.text
    }
}

// ── Wrapped surface ───────────────────────────────────────────────────────

/// A monospace, fixed-width line-wrapping layout over text runs.
///
/// This is the headless stand-in for a scrollable document view: every
/// character occupies one cell, logical lines wrap at `cols`, and rects are
/// reported in viewport coordinates (content position minus scroll, plus the
/// container origin) the way a browser reports client rects.
#[derive(Debug, Clone)]
pub struct WrappedSurface {
    runs: Vec<String>,
    cols: usize,
    cell_width: f32,
    line_height: f32,
    origin: (f32, f32),
    scroll: (f32, f32),
    viewport_height: f32,
    native_highlight: bool,
}

impl WrappedSurface {
    pub fn new(text: impl Into<String>, cols: usize) -> Self {
        Self::with_runs(vec![text.into()], cols)
    }

    pub fn with_runs(runs: Vec<String>, cols: usize) -> Self {
        Self {
            runs,
            cols: cols.max(1),
            cell_width: 8.0,
            line_height: 16.0,
            origin: (0.0, 0.0),
            scroll: (0.0, 0.0),
            viewport_height: 320.0,
            native_highlight: false,
        }
    }

    pub fn cell_metrics(mut self, cell_width: f32, line_height: f32) -> Self {
        self.cell_width = cell_width;
        self.line_height = line_height;
        self
    }

    pub fn with_native_highlight(mut self) -> Self {
        self.native_highlight = true;
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.runs = vec![text.into()];
    }

    pub fn set_origin(&mut self, x: f32, y: f32) {
        self.origin = (x, y);
    }

    pub fn set_scroll(&mut self, x: f32, y: f32) {
        self.scroll = (x, y);
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height;
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Start offsets of each visual line in the concatenated text.
    fn line_starts(&self) -> Vec<usize> {
        let text = self.text();
        let mut starts = vec![0];
        let mut col = 0;
        for (idx, ch) in text.chars().enumerate() {
            if ch == '\n' {
                starts.push(idx + 1);
                col = 0;
            } else {
                col += 1;
                if col == self.cols {
                    starts.push(idx + 1);
                    col = 0;
                }
            }
        }
        starts
    }

    /// Visual `(line, column)` of a global character offset.
    fn position_of(&self, offset: usize, line_starts: &[usize]) -> (usize, usize) {
        let line = match line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        (line, offset - line_starts[line])
    }

    fn global_offset(&self, point: RunPoint) -> Option<usize> {
        if point.run >= self.runs.len() {
            return None;
        }
        let preceding: usize = self.runs[..point.run]
            .iter()
            .map(|run| run.chars().count())
            .sum();
        if point.offset > self.runs[point.run].chars().count() {
            return None;
        }
        Some(preceding + point.offset)
    }
}

impl TextSurface for WrappedSurface {
    fn run_count(&self) -> usize {
        self.runs.len()
    }

    fn run_text(&self, run: usize) -> &str {
        &self.runs[run]
    }
}

impl SurfaceGeometry for WrappedSurface {
    fn client_rects(&self, range: &ViewRange) -> Vec<SurfaceRect> {
        let (Some(start), Some(end)) = (
            self.global_offset(range.start),
            self.global_offset(range.end),
        ) else {
            return Vec::new();
        };
        let (start, end) = if start <= end { (start, end) } else { (end, start) };

        let text = self.text();
        let total = text.chars().count();
        if end > total {
            return Vec::new();
        }

        let line_starts = self.line_starts();
        let (first_line, _) = self.position_of(start, &line_starts);
        let (last_line, _) = self.position_of(end, &line_starts);

        let mut rects = Vec::with_capacity(last_line - first_line + 1);
        for line in first_line..=last_line {
            let line_start = line_starts[line];
            let line_end = line_starts
                .get(line + 1)
                .copied()
                .unwrap_or(total)
                .min(total);
            // Trailing newline cells do not render as highlight width.
            let content_end = if text
                .chars()
                .nth(line_end.saturating_sub(1))
                .is_some_and(|ch| ch == '\n')
            {
                line_end - 1
            } else {
                line_end
            };

            let seg_start = start.max(line_start);
            let seg_end = end.min(content_end);
            let cols = seg_end.saturating_sub(seg_start);

            rects.push(SurfaceRect {
                top: line as f32 * self.line_height - self.scroll.1 + self.origin.1,
                left: (seg_start - line_start) as f32 * self.cell_width - self.scroll.0
                    + self.origin.0,
                width: cols as f32 * self.cell_width,
                height: self.line_height,
            });
        }
        rects
    }

    fn origin(&self) -> (f32, f32) {
        self.origin
    }

    fn scroll_offset(&self) -> (f32, f32) {
        self.scroll
    }

    fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    fn supports_native_highlight(&self) -> bool {
        self.native_highlight
    }
}
