//! Focus square - tracking cursor pose stabilization
//!
//! Turns the noisy per-frame stream of hit-test results into a stable cursor
//! transform. Each tick runs, in order:
//!
//! 1. phase selection (initializing vs detecting) with transition side effects
//! 2. position smoothing over the last hit positions
//! 3. distance-based scale
//! 4. yaw blending from the camera pose
//! 5. alignment voting and the animate-or-snap decision
//!
//! An alignment animation in flight gates step 5 until the renderer reports
//! completion through [`FocusSquare::finish_alignment_animation`].

use glam::Vec3;
use std::collections::BTreeSet;
use tracing::{debug, trace};

use crate::alignment::AlignmentClassifier;
use crate::config::FocusSquareConfig;
use crate::orientation::{self, OrientationUpdate, TiltBand};
use crate::renderer::{Easing, OrientationAnimation};
use crate::scale::ScaleCurve;
use crate::smoothing::PositionSmoother;
use crate::types::{
    CameraPose, CursorAnchoring, CursorState, HitResult, PlaneAlignment, PlaneAnchor,
    PlaneAnchorId, Sample, SquareStyle, TrackingPhase,
};

/// Read-only view of a cursor's internals
#[derive(Debug, Clone, PartialEq)]
pub struct CursorSnapshot {
    pub phase: TrackingPhase,
    pub state: CursorState,
    pub alignment: Option<PlaneAlignment>,
    pub current_plane_anchor: Option<PlaneAnchor>,
    pub last_position: Option<Vec3>,
    pub visited_planes: Vec<PlaneAnchorId>,
    pub position_samples: usize,
    pub alignment_samples: usize,
}

/// A single tracking cursor
///
/// Owns its rolling windows and output state exclusively. Not thread-safe by
/// itself; the update queue serializes access.
#[derive(Debug, Clone)]
pub struct FocusSquare {
    config: FocusSquareConfig,
    smoother: PositionSmoother,
    classifier: AlignmentClassifier,
    tilt_band: TiltBand,
    scale_curve: ScaleCurve,
    phase: TrackingPhase,
    state: CursorState,
    animating_alignment: bool,
    pending_animation: Option<OrientationAnimation>,
    last_position: Option<Vec3>,
    current_plane_anchor: Option<PlaneAnchor>,
    visited_planes: BTreeSet<PlaneAnchorId>,
}

impl FocusSquare {
    /// Create a cursor in the initializing phase, shown as a billboard
    pub fn new(config: FocusSquareConfig) -> Self {
        Self {
            smoother: PositionSmoother::new(config.position_window),
            classifier: AlignmentClassifier::new(
                config.alignment_window,
                config.horizontal_votes,
                config.vertical_votes,
            ),
            tilt_band: TiltBand::from_config(&config),
            scale_curve: ScaleCurve::from_config(&config),
            phase: TrackingPhase::Initializing,
            state: CursorState::billboard(config.billboard_distance),
            animating_alignment: false,
            pending_animation: None,
            last_position: None,
            current_plane_anchor: None,
            visited_planes: BTreeSet::new(),
            config,
        }
    }

    /// Process one tracking update using the phase the sample implies
    pub fn on_tick(&mut self, sample: &Sample) -> CursorState {
        self.ingest(sample, sample.phase())
    }

    /// Process one tracking update in an explicit phase
    ///
    /// Never fails: a detecting tick without a hit keeps the previous output,
    /// and a tick without a camera keeps the previous orientation.
    pub fn ingest(&mut self, sample: &Sample, phase: TrackingPhase) -> CursorState {
        if phase != self.phase {
            let from = self.phase;
            self.phase = phase;
            self.on_transition(from, phase);
        }

        if phase == TrackingPhase::Detecting {
            match sample.hit {
                Some(hit) => self.detect(&hit, sample.camera.as_ref()),
                None => trace!("Detecting tick without hit, holding output"),
            }
        }

        self.state.is_animating_alignment = self.animating_alignment;
        self.state
    }

    /// Side effects of a phase change
    fn on_transition(&mut self, from: TrackingPhase, to: TrackingPhase) {
        debug!(?from, ?to, "Focus square phase transition");

        match to {
            TrackingPhase::Initializing => {
                self.smoother.clear();
                self.last_position = None;
                self.current_plane_anchor = None;
                self.display_as_billboard();
            }
            // Anchoring flips to World with the first processed hit
            TrackingPhase::Detecting => {}
        }
    }

    fn display_as_billboard(&mut self) {
        self.state = CursorState {
            is_animating_alignment: self.animating_alignment,
            ..CursorState::billboard(self.config.billboard_distance)
        };
    }

    fn detect(&mut self, hit: &HitResult, camera: Option<&CameraPose>) {
        let anchor = hit.kind.plane_anchor();
        match anchor {
            Some(anchor) => {
                if self.visited_planes.insert(anchor.id) {
                    debug!(plane = anchor.id.0, alignment = %anchor.alignment, "New plane visited");
                }
                self.current_plane_anchor = Some(anchor);
                self.state.style = SquareStyle::Closed;
            }
            None => {
                self.current_plane_anchor = None;
                self.state.style = SquareStyle::Open;
            }
        }

        let position = hit.position();
        self.last_position = Some(position);

        let smoothed = self.smoother.push(position);
        self.state.position = smoothed;
        self.state.scale = self.scale_curve.scale_for(smoothed, camera);
        self.state.anchoring = CursorAnchoring::World;

        let Some(camera) = camera else {
            return;
        };
        let yaw = self.tilt_band.yaw(camera);

        self.update_alignment(hit, anchor.is_some(), yaw);
    }

    fn update_alignment(&mut self, hit: &HitResult, on_plane_anchor: bool, yaw: f32) {
        if self.animating_alignment {
            trace!("Alignment animation in flight, dropping update");
            return;
        }

        let vote = self
            .classifier
            .observe(hit.kind.observed_alignment(), on_plane_anchor);

        match orientation::resolve(vote, yaw, hit.orientation()) {
            OrientationUpdate::Hold => {}
            OrientationUpdate::Snap(target) => {
                self.state.orientation = target;
            }
            OrientationUpdate::Animate(target) => {
                self.state.orientation = target;
                self.animating_alignment = true;
                self.pending_animation = Some(OrientationAnimation {
                    target,
                    duration: self.config.alignment_animation(),
                    easing: Easing::EaseOut,
                });
                debug!(?vote, "Alignment animation started");
            }
        }
    }

    /// Take the animation requested by the last tick, if any
    pub fn take_animation(&mut self) -> Option<OrientationAnimation> {
        self.pending_animation.take()
    }

    /// Completion of the alignment animation; re-opens alignment updates
    pub fn finish_alignment_animation(&mut self) -> CursorState {
        if self.animating_alignment {
            debug!("Alignment animation finished");
        }
        self.animating_alignment = false;
        self.state.is_animating_alignment = false;
        self.state
    }

    /// Discard everything and start over as a fresh billboard
    pub fn reset(&mut self) {
        debug!("Focus square reset");
        *self = Self::new(self.config.clone());
    }

    pub fn hide(&mut self) -> CursorState {
        self.state.visible = false;
        self.state
    }

    pub fn unhide(&mut self) -> CursorState {
        self.state.visible = true;
        self.state
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn phase(&self) -> TrackingPhase {
        self.phase
    }

    pub fn is_animating_alignment(&self) -> bool {
        self.animating_alignment
    }

    /// Committed surface alignment
    pub fn alignment(&self) -> Option<PlaneAlignment> {
        self.classifier.current()
    }

    /// Latest raw hit position; `None` while initializing
    pub fn last_position(&self) -> Option<Vec3> {
        match self.phase {
            TrackingPhase::Initializing => None,
            TrackingPhase::Detecting => self.last_position,
        }
    }

    /// Plane anchor under the cursor, if any
    pub fn current_plane_anchor(&self) -> Option<PlaneAnchor> {
        self.current_plane_anchor
    }

    /// Every plane anchor the cursor has rested on
    pub fn visited_planes(&self) -> impl Iterator<Item = PlaneAnchorId> + '_ {
        self.visited_planes.iter().copied()
    }

    pub fn config(&self) -> &FocusSquareConfig {
        &self.config
    }

    pub fn snapshot(&self) -> CursorSnapshot {
        CursorSnapshot {
            phase: self.phase,
            state: self.state,
            alignment: self.alignment(),
            current_plane_anchor: self.current_plane_anchor,
            last_position: self.last_position(),
            visited_planes: self.visited_planes().collect(),
            position_samples: self.smoother.len(),
            alignment_samples: self.classifier.window_len(),
        }
    }
}

impl Default for FocusSquare {
    fn default() -> Self {
        Self::new(FocusSquareConfig::default())
    }
}
