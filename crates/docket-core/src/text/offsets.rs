//! Bidirectional mapping between view-level ranges and buffer offsets.
//!
//! Both directions are pure functions of the surface's current text. Mapping
//! failures are expected and frequent (selections collapse, text shrinks),
//! so both return `None` instead of erroring.

use crate::text::{OffsetRange, RunPoint, TextSurface, ViewRange};

/// Converts a view-level range into character offsets into `surface`'s text.
///
/// `start` is the length of all text preceding the range's start point;
/// `end` adds the range's own textual length. Returns `None` for collapsed
/// ranges or points not contained by the surface.
pub fn to_offsets<S: TextSurface + ?Sized>(surface: &S, range: &ViewRange) -> Option<OffsetRange> {
    let start = global_offset(surface, range.start)?;
    let end = global_offset(surface, range.end)?;
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    if start == end {
        return None;
    }
    Some(OffsetRange::new(start, end))
}

/// Reconstructs the view-level range for stored offsets by walking the
/// surface's runs in order and accumulating length.
///
/// Depends only on concatenated text content, not run identity, so it is
/// stable under re-render. Returns `None` when the range is empty or the
/// surface's total text is shorter than `offsets.end`.
pub fn to_view_range<S: TextSurface + ?Sized>(
    surface: &S,
    offsets: OffsetRange,
) -> Option<ViewRange> {
    if offsets.is_empty() {
        return None;
    }
    let start = locate(surface, offsets.start)?;
    let end = locate(surface, offsets.end)?;
    Some(ViewRange::new(start, end))
}

fn global_offset<S: TextSurface + ?Sized>(surface: &S, point: RunPoint) -> Option<usize> {
    if point.run >= surface.run_count() {
        return None;
    }
    if point.offset > surface.run_text(point.run).chars().count() {
        return None;
    }
    let preceding: usize = (0..point.run)
        .map(|run| surface.run_text(run).chars().count())
        .sum();
    Some(preceding + point.offset)
}

fn locate<S: TextSurface + ?Sized>(surface: &S, global: usize) -> Option<RunPoint> {
    let mut remaining = global;
    for run in 0..surface.run_count() {
        let len = surface.run_text(run).chars().count();
        if remaining <= len {
            return Some(RunPoint {
                run,
                offset: remaining,
            });
        }
        remaining -= len;
    }
    None
}
