mod mode;
mod workspace;

pub use mode::InteractionMode;
pub use workspace::{
    ActiveHighlight, DocumentInfo, FrameOutcome, HighlightOrigin, Workspace,
};
