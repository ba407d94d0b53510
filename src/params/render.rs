//! Viewport and projection configuration.

use super::ensure_positive;
use crate::error::ConfigError;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Viewport width (pixels)
    pub window_width: u32,

    /// Viewport height (pixels)
    pub window_height: u32,

    /// Field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    /// Covers the maximum zoom plus the terrain footprint
    pub far_plane: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 60.0,
            near_plane: 1.0,
            far_plane: 5000.0,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width.max(1) as f32 / self.window_height.max(1) as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("fov_degrees", self.fov_degrees)?;
        ensure_positive("near_plane", self.near_plane)?;
        ensure_positive("far_plane", self.far_plane - self.near_plane)?;
        Ok(())
    }
}
