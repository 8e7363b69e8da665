//! Human-readable line diff for the patch action audit display.
//!
//! This is presentation only: the engine's own change tracking runs on the
//! minimal-region delta in [`crate::text::diff_text`]. The audit view wants
//! a conventional line diff, so it leans on `similar` instead.

use similar::{ChangeTag, TextDiff};

/// One rendered line of an audit diff.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffLine {
    pub tag: LineTag,
    pub old_line: Option<usize>,
    pub new_line: Option<usize>,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
    Context,
    Added,
    Removed,
}

/// Renders a before/after pair as tagged lines with line numbers.
pub fn diff_lines(before: &str, after: &str) -> Vec<DiffLine> {
    let diff = TextDiff::from_lines(before, after);
    let mut lines = Vec::new();
    let mut old_num = 0usize;
    let mut new_num = 0usize;

    for change in diff.iter_all_changes() {
        let tag = match change.tag() {
            ChangeTag::Delete => LineTag::Removed,
            ChangeTag::Insert => LineTag::Added,
            ChangeTag::Equal => LineTag::Context,
        };
        let old_line = if tag != LineTag::Added {
            old_num += 1;
            Some(old_num)
        } else {
            None
        };
        let new_line = if tag != LineTag::Removed {
            new_num += 1;
            Some(new_num)
        } else {
            None
        };
        lines.push(DiffLine {
            tag,
            old_line,
            new_line,
            content: change.value().trim_end_matches('\n').to_string(),
        });
    }

    lines
}
