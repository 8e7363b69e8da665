//! Promotion gating between the two top-level views.

use crate::text::BufferId;

/// Which top-level view currently owns the selection gesture.
///
/// Selections made while the other view is active are still tracked, but the
/// promote affordance stays hidden until the mode matches again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Summary + chat focus.
    #[default]
    Canvas,
    /// Document + checklist focus.
    Checklist,
}

impl InteractionMode {
    /// Whether a selection living in `buffer` may currently be offered for
    /// promotion.
    pub fn allows_promotion(self, buffer: &BufferId) -> bool {
        matches!(
            (self, buffer),
            (InteractionMode::Canvas, BufferId::Summary)
                | (InteractionMode::Checklist, BufferId::Document(_))
        )
    }
}
