//! Configuration for the focus square
//!
//! Tuning values are loaded from YAML. Every field has a default so an empty
//! document yields the stock behaviour.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::fs;

/// Focus square tuning
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FocusSquareConfig {
    /// Number of recent hit positions averaged into the cursor position
    #[serde(default = "default_position_window")]
    pub position_window: usize,

    /// Number of recent alignment observations kept for voting
    #[serde(default = "default_alignment_window")]
    pub alignment_window: usize,

    /// Horizontal commits when its vote count exceeds this
    #[serde(default = "default_horizontal_votes")]
    pub horizontal_votes: usize,

    /// Vertical commits when its vote count exceeds this
    #[serde(default = "default_vertical_votes")]
    pub vertical_votes: usize,

    /// Tilt where yaw blending starts, as a fraction of π/2
    #[serde(default = "default_tilt_blend_start")]
    pub tilt_blend_start: f32,

    /// Tilt where yaw blending ends, as a fraction of π/2
    #[serde(default = "default_tilt_blend_end")]
    pub tilt_blend_end: f32,

    /// Distance (m) below which the cursor shrinks linearly
    #[serde(default = "default_near_distance")]
    pub near_distance: f32,

    #[serde(default = "default_far_scale_slope")]
    pub far_scale_slope: f32,

    #[serde(default = "default_far_scale_offset")]
    pub far_scale_offset: f32,

    /// Duration of an alignment change animation
    #[serde(default = "default_alignment_animation_ms")]
    pub alignment_animation_ms: u64,

    /// Distance (m) of the billboard in front of the camera
    #[serde(default = "default_billboard_distance")]
    pub billboard_distance: f32,
}

impl Default for FocusSquareConfig {
    fn default() -> Self {
        Self {
            position_window: default_position_window(),
            alignment_window: default_alignment_window(),
            horizontal_votes: default_horizontal_votes(),
            vertical_votes: default_vertical_votes(),
            tilt_blend_start: default_tilt_blend_start(),
            tilt_blend_end: default_tilt_blend_end(),
            near_distance: default_near_distance(),
            far_scale_slope: default_far_scale_slope(),
            far_scale_offset: default_far_scale_offset(),
            alignment_animation_ms: default_alignment_animation_ms(),
            billboard_distance: default_billboard_distance(),
        }
    }
}

impl FocusSquareConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::from_yaml_str(&contents).with_context(|| format!("Invalid config file: {}", path))
    }

    /// Parse and validate configuration from a YAML document
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        // An empty document deserializes to unit, not a map
        let config: FocusSquareConfig = if contents.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        if self.position_window == 0 {
            anyhow::bail!("position_window must be at least 1");
        }
        if self.alignment_window == 0 {
            anyhow::bail!("alignment_window must be at least 1");
        }
        if self.horizontal_votes >= self.alignment_window {
            anyhow::bail!(
                "horizontal_votes ({}) can never be exceeded with an alignment_window of {}",
                self.horizontal_votes,
                self.alignment_window
            );
        }
        if self.vertical_votes >= self.alignment_window {
            anyhow::bail!(
                "vertical_votes ({}) can never be exceeded with an alignment_window of {}",
                self.vertical_votes,
                self.alignment_window
            );
        }
        if !(0.0..=1.0).contains(&self.tilt_blend_start) || !(0.0..=1.0).contains(&self.tilt_blend_end) {
            anyhow::bail!("tilt blend band must lie within [0, 1]");
        }
        if self.tilt_blend_start >= self.tilt_blend_end {
            anyhow::bail!(
                "tilt_blend_start ({}) must be below tilt_blend_end ({})",
                self.tilt_blend_start,
                self.tilt_blend_end
            );
        }
        if self.near_distance <= 0.0 {
            anyhow::bail!("near_distance must be positive");
        }
        if self.billboard_distance <= 0.0 {
            anyhow::bail!("billboard_distance must be positive");
        }

        Ok(())
    }

    pub fn alignment_animation(&self) -> Duration {
        Duration::from_millis(self.alignment_animation_ms)
    }
}

// Default value functions
fn default_position_window() -> usize { 10 }
fn default_alignment_window() -> usize { 20 }
fn default_horizontal_votes() -> usize { 15 }
fn default_vertical_votes() -> usize { 10 }
fn default_tilt_blend_start() -> f32 { 0.65 }
fn default_tilt_blend_end() -> f32 { 0.75 }
fn default_near_distance() -> f32 { 0.7 }
fn default_far_scale_slope() -> f32 { 0.25 }
fn default_far_scale_offset() -> f32 { 0.825 }
fn default_alignment_animation_ms() -> u64 { 500 }
fn default_billboard_distance() -> f32 { 0.8 }
