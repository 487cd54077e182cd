//! Focus square type definitions
//!
//! Defines the per-tick samples produced by the pose source and the cursor
//! state handed to the renderer.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Orientation class of a detected surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaneAlignment {
    /// Floors, tables
    Horizontal,
    /// Walls, doors
    Vertical,
}

impl std::fmt::Display for PlaneAlignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaneAlignment::Horizontal => write!(f, "horizontal"),
            PlaneAlignment::Vertical => write!(f, "vertical"),
        }
    }
}

/// Identity of a plane anchor tracked by the pose source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlaneAnchorId(pub u64);

/// A persistent planar surface with a known alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaneAnchor {
    pub id: PlaneAnchorId,
    pub alignment: PlaneAlignment,
}

/// Classification of a hit-test result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// Hit an existing plane anchor (alignment is known)
    PlaneAnchor(PlaneAnchor),
    /// Hit a horizontal plane estimated from feature points
    EstimatedHorizontal,
    /// Hit a vertical plane estimated from feature points
    EstimatedVertical,
    /// Hit something without a surface classification
    Unclassified,
}

impl HitKind {
    /// Raw alignment observation carried by this hit
    ///
    /// Anchor metadata wins; otherwise the estimated plane type decides.
    pub fn observed_alignment(&self) -> Option<PlaneAlignment> {
        match self {
            HitKind::PlaneAnchor(anchor) => Some(anchor.alignment),
            HitKind::EstimatedHorizontal => Some(PlaneAlignment::Horizontal),
            HitKind::EstimatedVertical => Some(PlaneAlignment::Vertical),
            HitKind::Unclassified => None,
        }
    }

    /// The plane anchor, if the hit landed on one
    pub fn plane_anchor(&self) -> Option<PlaneAnchor> {
        match self {
            HitKind::PlaneAnchor(anchor) => Some(*anchor),
            _ => None,
        }
    }
}

/// Ray-surface intersection reported by the pose source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    /// World transform of the intersection (column-major, translation in w axis)
    pub world_transform: Mat4,
    pub kind: HitKind,
}

impl HitResult {
    pub fn new(world_transform: Mat4, kind: HitKind) -> Self {
        Self {
            world_transform,
            kind,
        }
    }

    /// Hit at a world position with an identity surface rotation
    pub fn at(position: Vec3, kind: HitKind) -> Self {
        Self::new(Mat4::from_translation(position), kind)
    }

    /// World position of the hit
    pub fn position(&self) -> Vec3 {
        self.world_transform.w_axis.truncate()
    }

    /// World orientation of the hit surface
    pub fn orientation(&self) -> Quat {
        let (_, rotation, _) = self.world_transform.to_scale_rotation_translation();
        rotation
    }
}

/// Camera pose for one tracking update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Euler angles in radians (x = pitch, y = yaw, z = roll)
    pub euler_angles: Vec3,
    /// Camera-to-world transform; its columns are the camera basis
    pub transform: Mat4,
}

impl CameraPose {
    pub fn new(euler_angles: Vec3, transform: Mat4) -> Self {
        Self {
            euler_angles,
            transform,
        }
    }

    /// Camera position in world space
    pub fn world_position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    /// Yaw of the camera about world +Y, taken from the basis columns
    pub fn world_yaw(&self) -> f32 {
        self.transform.x_axis.x.atan2(self.transform.y_axis.x)
    }

    /// Absolute pitch of the camera
    pub fn tilt(&self) -> f32 {
        self.euler_angles.x.abs()
    }
}

/// One geometric sample, produced once per tracking update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Closest surface under the screen center, if any
    pub hit: Option<HitResult>,
    pub camera: Option<CameraPose>,
    /// Whether the camera tracking state is normal
    pub tracking_normal: bool,
}

impl Sample {
    pub fn new(hit: Option<HitResult>, camera: Option<CameraPose>, tracking_normal: bool) -> Self {
        Self {
            hit,
            camera,
            tracking_normal,
        }
    }

    /// Sample carrying nothing usable (tracking lost)
    pub fn lost() -> Self {
        Self::new(None, None, false)
    }

    /// Phase the controller selects for this sample
    ///
    /// Detecting requires normal tracking, a camera and a hit.
    pub fn phase(&self) -> TrackingPhase {
        if self.tracking_normal && self.camera.is_some() && self.hit.is_some() {
            TrackingPhase::Detecting
        } else {
            TrackingPhase::Initializing
        }
    }
}

/// Top-level mode of the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingPhase {
    /// No surface yet: floating billboard in front of the camera
    #[default]
    Initializing,
    /// Following hit-test results on a surface
    Detecting,
}

/// Frame the cursor transform is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorAnchoring {
    /// Parented to the camera (billboard)
    Camera,
    /// Placed in world space
    World,
}

/// Visual style of the square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SquareStyle {
    /// Segments disconnected: still locating a surface
    Open,
    /// Segments joined: resting on a plane anchor
    Closed,
}

/// Externally visible cursor output, written once per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorState {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: f32,
    pub is_animating_alignment: bool,
    pub anchoring: CursorAnchoring,
    pub style: SquareStyle,
    pub visible: bool,
}

impl CursorState {
    /// Billboard pose facing the camera at `distance` in front of it
    pub fn billboard(distance: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -distance),
            orientation: Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
            scale: 1.0,
            is_animating_alignment: false,
            anchoring: CursorAnchoring::Camera,
            style: SquareStyle::Open,
            visible: true,
        }
    }
}
