pub mod anchor;
pub mod chat;
pub mod config;
pub mod error;
pub mod overlay;
pub mod patch;
pub mod session;
pub mod text;

// Re-export key types
pub use anchor::{adjust_range, Anchor, AnchorKind, EvidenceTag, Suggestion};
pub use chat::{ChatMessage, ChatRole, ChatThread};
pub use config::Settings;
pub use error::{DocketError, Result};
pub use overlay::{rects_for, FrameScheduler, HighlightPaint, HighlightRect};
pub use patch::{DiffLine, LineTag, Patch, PatchAction, PatchStatus};
pub use session::{ActiveHighlight, FrameOutcome, HighlightOrigin, InteractionMode, Workspace};
pub use text::{
    diff_text, to_offsets, to_view_range, BufferId, FlatSurface, OffsetRange, RunPoint,
    SurfaceGeometry, SurfaceRect, TextBuffer, TextDelta, TextSurface, ViewRange, WrappedSurface,
};
