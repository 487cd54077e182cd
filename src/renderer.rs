//! Renderer seam
//!
//! The core never owns a scene graph. It hands a [`CursorState`] to the
//! renderer every tick and asks it to animate alignment changes. The renderer
//! reports the end of an animation through an [`AnimationCompletion`], which
//! may be fired from any thread.

use glam::Quat;
use std::time::Duration;

use crate::types::CursorState;

/// Timing curve of an orientation animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    EaseOut,
}

/// Request to animate the cursor orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationAnimation {
    pub target: Quat,
    pub duration: Duration,
    pub easing: Easing,
}

/// One-shot completion signal for an orientation animation
///
/// Fires on [`complete`](Self::complete) or, failing that, when dropped, so an
/// animation the renderer abandons still releases the alignment gate.
pub struct AnimationCompletion {
    callback: Option<Box<dyn FnOnce() + Send>>,
}

impl AnimationCompletion {
    pub fn new(callback: impl FnOnce() + Send + 'static) -> Self {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    /// Completion that does nothing
    pub fn noop() -> Self {
        Self { callback: None }
    }

    /// Signal that the animation has finished
    pub fn complete(mut self) {
        self.fire();
    }

    fn fire(&mut self) {
        if let Some(callback) = self.callback.take() {
            callback();
        }
    }
}

impl Drop for AnimationCompletion {
    fn drop(&mut self) {
        self.fire();
    }
}

impl std::fmt::Debug for AnimationCompletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationCompletion")
            .field("pending", &self.callback.is_some())
            .finish()
    }
}

/// Display side of the cursor
pub trait Renderer: Send + 'static {
    /// Update the displayed cursor
    ///
    /// While `state.is_animating_alignment` is set, the orientation is owned by
    /// the running animation.
    fn apply(&mut self, state: &CursorState);

    /// Animate the cursor orientation and fire `on_complete` when done
    fn animate_orientation(&mut self, animation: OrientationAnimation, on_complete: AnimationCompletion);

    /// Remove the cursor from the scene
    fn detach(&mut self) {}
}
