//! # Focus Square
//!
//! Pose stabilization and surface-alignment classification for an AR
//! placement cursor.
//!
//! The pose source delivers one [`Sample`] per tracking update: the closest
//! hit-test result under the screen center and the camera pose. The focus
//! square turns that noisy stream into a steady [`CursorState`] (position,
//! orientation, scale) for the renderer.
//!
//! ## Data Flow
//!
//! ```text
//!  pose source ──Sample──▶ FocusSquare ─┬─▶ PositionSmoother ──▶ ScaleCurve
//!                                       ├─▶ TiltBand (yaw)
//!                                       └─▶ AlignmentClassifier ──▶ orientation::resolve
//!                                                                       │
//!  renderer ◀──────────── CursorState / OrientationAnimation ◀──────────┘
//! ```
//!
//! [`UpdateQueue`] wraps a [`FocusSquare`] in a single tokio task so that
//! ticks, resets and animation completions never mutate the cursor
//! concurrently.

pub mod alignment;
pub mod config;
pub mod cursor;
pub mod logging;
pub mod orientation;
pub mod renderer;
pub mod scale;
pub mod smoothing;
pub mod types;
pub mod update_queue;

pub use alignment::{AlignmentClassifier, AlignmentVote};
pub use config::FocusSquareConfig;
pub use cursor::{CursorSnapshot, FocusSquare};
pub use logging::init_logging;
pub use orientation::{OrientationUpdate, TiltBand};
pub use renderer::{AnimationCompletion, Easing, OrientationAnimation, Renderer};
pub use scale::ScaleCurve;
pub use smoothing::PositionSmoother;
pub use types::{
    CameraPose, CursorAnchoring, CursorState, HitKind, HitResult, PlaneAlignment, PlaneAnchor,
    PlaneAnchorId, Sample, SquareStyle, TrackingPhase,
};
pub use update_queue::{UpdateQueue, UpdateQueueHandle};
