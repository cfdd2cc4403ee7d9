//! Startup configuration for the renderer.

use fogray_core::LightOrbit;
use fogray_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

use crate::{RenderError, RenderResult};

/// Which pool implementation drives the row groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    /// Long-lived workers reused every frame
    #[default]
    Persistent,
    /// One fresh thread per job, joined at the end of the round
    Spawn,
}

/// Render configuration.
///
/// Fixed for the lifetime of a [`Renderer`](crate::Renderer). Any field left
/// out of a config file takes its default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of interleaved row groups, and so the number of threads
    /// (including the calling thread) working on a frame
    pub threads: usize,
    /// Maximum reflection depth
    pub bounces: u32,
    /// Jittered samples per pixel
    pub samples: u32,
    /// Distance at which surfaces are fully replaced by fog.
    /// `f32::INFINITY` disables fog.
    pub fog_distance: f32,
    /// Fog color, also used for rays that escape the scene
    pub fog_color: Color,
    /// Ambient light level
    pub ambient: f32,
    /// World units per pixel on the image plane one unit in front of the eye
    pub projection_scale: f32,
    /// Camera position; the camera looks down +Z
    pub eye: Vec3,
    /// Path of the point light over time
    pub light_orbit: LightOrbit,
    /// Worker pool implementation
    pub pool: PoolKind,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 240,
            threads: std::thread::available_parallelism().map_or(4, |n| n.get()),
            bounces: 4,
            samples: 4,
            fog_distance: 4000.0,
            fog_color: Color::new(0.55, 0.6, 0.7),
            ambient: 0.2,
            projection_scale: 0.004,
            eye: Vec3::new(0.0, 0.0, -800.0),
            light_orbit: LightOrbit::default(),
            pool: PoolKind::Persistent,
        }
    }
}

impl RenderConfig {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, bounces: u32) -> Self {
        self.samples = samples;
        self.bounces = bounces;
        self
    }

    /// Set the number of row groups.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Select the pool implementation.
    pub fn with_pool(mut self, pool: PoolKind) -> Self {
        self.pool = pool;
        self
    }

    /// Set fog distance and color.
    pub fn with_fog(mut self, distance: f32, color: Color) -> Self {
        self.fog_distance = distance;
        self.fog_color = color;
        self
    }

    /// True if surfaces are blended toward the fog color with distance.
    pub fn fog_enabled(&self) -> bool {
        self.fog_distance.is_finite()
    }

    /// Reject settings the renderer cannot work with.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.threads == 0 {
            return Err(RenderError::InvalidConfig(
                "at least one thread is required".to_string(),
            ));
        }
        if self.samples == 0 {
            return Err(RenderError::InvalidConfig(
                "at least one sample per pixel is required".to_string(),
            ));
        }
        if self.fog_distance.is_nan() || self.fog_distance <= 0.0 {
            return Err(RenderError::InvalidConfig(format!(
                "fog distance must be positive, got {}",
                self.fog_distance
            )));
        }
        if !self.ambient.is_finite() || !self.projection_scale.is_finite() {
            return Err(RenderError::InvalidConfig(
                "ambient and projection scale must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
