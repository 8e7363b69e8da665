//! Anchor rebasing after a buffer mutation.

use crate::text::{OffsetRange, TextDelta};

/// Recomputes an offset range after its buffer changed by `delta`.
///
/// An edit entirely before the anchor shifts both endpoints; an edit
/// entirely after it leaves it alone. An overlapping edit widens the anchor:
/// its start is pulled back to the edit's start when the edit begins before
/// it, and its end absorbs the net shift. Widening is intentional — evidence
/// grows to include the edit rather than shrinking to the unedited remainder.
///
/// Callers drop anchors whose adjusted range is empty; this function only
/// does the arithmetic.
pub fn adjust_range(range: OffsetRange, delta: &TextDelta, new_len: usize) -> OffsetRange {
    let change_end = delta.change_end();
    let shift = delta.shift();

    let mut start = range.start as isize;
    let mut end = range.end as isize;

    if change_end <= range.start {
        start += shift;
        end += shift;
    } else if delta.start >= range.end {
        // Edit entirely after the anchor.
    } else {
        if delta.start < range.start {
            start = delta.start as isize;
        }
        end += shift;
    }

    let start = start.max(0) as usize;
    let end = end.max(start as isize) as usize;
    let end = end.min(new_len);
    let start = start.min(end);
    OffsetRange::new(start, end)
}
