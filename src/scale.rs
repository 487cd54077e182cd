//! Distance-based cursor scale
//!
//! Scales the cursor up when close and down when far away so its apparent size
//! changes little with distance: 1.0x at 0.7 m (looking at a table) and about
//! 1.2x at 1.5 m (looking at the floor).

use glam::Vec3;

use crate::config::FocusSquareConfig;
use crate::types::CameraPose;

/// Piecewise-linear scale curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleCurve {
    /// Below this distance the scale ramps linearly from 0 to 1
    pub near_distance: f32,
    pub far_slope: f32,
    pub far_offset: f32,
}

impl ScaleCurve {
    pub fn from_config(config: &FocusSquareConfig) -> Self {
        Self {
            near_distance: config.near_distance,
            far_slope: config.far_scale_slope,
            far_offset: config.far_scale_offset,
        }
    }

    /// Scale for a cursor `distance` meters from the camera
    pub fn scale_for_distance(&self, distance: f32) -> f32 {
        if distance < self.near_distance {
            distance / self.near_distance
        } else {
            self.far_slope * distance + self.far_offset
        }
    }

    /// Scale for a cursor at `position`; 1.0 without a camera
    pub fn scale_for(&self, position: Vec3, camera: Option<&CameraPose>) -> f32 {
        match camera {
            Some(camera) => self.scale_for_distance(position.distance(camera.world_position())),
            None => 1.0,
        }
    }
}

impl Default for ScaleCurve {
    fn default() -> Self {
        Self::from_config(&FocusSquareConfig::default())
    }
}
