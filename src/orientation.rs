//! Orientation resolution
//!
//! Picks the cursor's yaw from the camera and decides whether an orientation
//! change is animated or applied immediately.
//!
//! ## Yaw blending
//!
//! Camera-relative yaw (`euler_angles.y`) is unstable when the camera looks
//! straight down, so past a tilt band the world yaw from the camera basis is
//! used instead. Inside the band the two are blended linearly:
//!
//! ```text
//!  tilt:  0 ──────────── t1 ════════════ t2 ──────────── π/2
//!  yaw:   camera-relative │  blend 0 → 1  │  world (basis columns)
//! ```
//!
//! Before blending, the camera yaw is shifted by multiples of 90° so it lands
//! within 45° of the world yaw, which keeps the square from spinning.

use glam::Quat;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::alignment::AlignmentVote;
use crate::config::FocusSquareConfig;
use crate::types::{CameraPose, PlaneAlignment};

/// Tilt band (radians) over which camera yaw hands over to world yaw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltBand {
    pub start: f32,
    pub end: f32,
}

impl TiltBand {
    pub fn from_config(config: &FocusSquareConfig) -> Self {
        Self {
            start: FRAC_PI_2 * config.tilt_blend_start,
            end: FRAC_PI_2 * config.tilt_blend_end,
        }
    }

    /// Weight of the world yaw for a given tilt: 0 below the band, 1 above it
    pub fn world_weight(&self, tilt: f32) -> f32 {
        if tilt < self.start {
            0.0
        } else if tilt < self.end {
            ((tilt - self.start) / (self.end - self.start)).abs()
        } else {
            1.0
        }
    }

    /// Target yaw for the cursor given the camera pose
    pub fn yaw(&self, camera: &CameraPose) -> f32 {
        let tilt = camera.tilt();
        let world_yaw = camera.world_yaw();
        let camera_yaw = camera.euler_angles.y;

        if tilt < self.start {
            camera_yaw
        } else if tilt < self.end {
            let weight = self.world_weight(tilt);
            let normalized = normalize_for_minimal_rotation(camera_yaw, world_yaw);
            normalized * (1.0 - weight) + world_yaw * weight
        } else {
            world_yaw
        }
    }
}

impl Default for TiltBand {
    fn default() -> Self {
        Self::from_config(&FocusSquareConfig::default())
    }
}

/// Shift `angle` by whole 90° turns so it lands within 45° of `reference`
pub fn normalize_for_minimal_rotation(angle: f32, reference: f32) -> f32 {
    if !angle.is_finite() || !reference.is_finite() {
        return angle;
    }

    let delta = angle - reference;
    if delta.abs() <= FRAC_PI_4 {
        return angle;
    }

    // Single fold into (-45°, 45°], independent of magnitude
    let mut folded = delta.rem_euclid(FRAC_PI_2);
    if folded > FRAC_PI_4 {
        folded -= FRAC_PI_2;
    }
    reference + folded
}

/// Rotation about world +Y by `yaw`
pub fn yaw_rotation(yaw: f32) -> Quat {
    Quat::from_rotation_y(yaw)
}

/// How a new orientation should reach the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrientationUpdate {
    /// Apply immediately
    Snap(Quat),
    /// Animate an alignment change
    Animate(Quat),
    /// Keep the current orientation
    Hold,
}

/// Combine the alignment vote with the yaw to produce the next orientation
///
/// Vertical surfaces take the hit surface's own orientation and are always
/// animated. Otherwise the yaw rotation is animated only when the committed
/// alignment just changed, and snapped when only the yaw moved.
pub fn resolve(vote: AlignmentVote, yaw: f32, surface_orientation: Quat) -> OrientationUpdate {
    match vote {
        AlignmentVote::Rejected => OrientationUpdate::Hold,
        AlignmentVote::Accepted {
            alignment: PlaneAlignment::Vertical,
            ..
        } => OrientationUpdate::Animate(surface_orientation),
        AlignmentVote::Accepted { changed: true, .. } => OrientationUpdate::Animate(yaw_rotation(yaw)),
        AlignmentVote::Accepted { changed: false, .. } => OrientationUpdate::Snap(yaw_rotation(yaw)),
    }
}
