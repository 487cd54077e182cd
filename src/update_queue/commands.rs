//! Command enum for the update queue actor
//!
//! Hot path commands (ticks, completions) are fire-and-forget; queries carry a
//! oneshot channel for the response.

use std::sync::Arc;
use tokio::sync::oneshot;

use crate::cursor::CursorSnapshot;
use crate::types::{CursorState, Sample};

/// Subscriber callback, called with every cursor state pushed to the renderer
pub type SubscriberFn = Arc<dyn Fn(&CursorState) + Send + Sync>;

/// Commands for the update queue actor
pub enum CursorCommand {
    // -------------------------------------------------------------------------
    // Hot path commands
    // -------------------------------------------------------------------------
    /// Process one tracking update
    Tick {
        sample: Sample,
        /// Optional response channel; `None` inside means the cursor is retired
        response: Option<oneshot::Sender<Option<CursorState>>>,
    },

    /// The renderer finished an alignment animation
    AnimationFinished {
        /// Cursor generation the animation was started for
        generation: u64,
    },

    // -------------------------------------------------------------------------
    // Lifecycle commands
    // -------------------------------------------------------------------------
    /// Discard the cursor and start a fresh one (session restart, map loaded)
    Reset,

    /// Content was placed; remove the cursor until the next reset
    Retire,

    /// Show or hide the cursor
    SetVisible { visible: bool },

    // -------------------------------------------------------------------------
    // Request-response commands
    // -------------------------------------------------------------------------
    Snapshot {
        response: oneshot::Sender<Option<CursorSnapshot>>,
    },

    Subscribe {
        listener: SubscriberFn,
        response: oneshot::Sender<usize>,
    },

    Shutdown,
}

impl std::fmt::Debug for CursorCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CursorCommand::Tick { sample, .. } => f
                .debug_struct("Tick")
                .field("has_hit", &sample.hit.is_some())
                .field("has_camera", &sample.camera.is_some())
                .field("tracking_normal", &sample.tracking_normal)
                .finish(),
            CursorCommand::AnimationFinished { generation } => f
                .debug_struct("AnimationFinished")
                .field("generation", generation)
                .finish(),
            CursorCommand::Reset => write!(f, "Reset"),
            CursorCommand::Retire => write!(f, "Retire"),
            CursorCommand::SetVisible { visible } => f
                .debug_struct("SetVisible")
                .field("visible", visible)
                .finish(),
            CursorCommand::Snapshot { .. } => write!(f, "Snapshot"),
            CursorCommand::Subscribe { .. } => write!(f, "Subscribe"),
            CursorCommand::Shutdown => write!(f, "Shutdown"),
        }
    }
}
