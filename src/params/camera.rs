//! Camera rig configuration.

use super::{ensure_positive, ensure_range};
use crate::error::ConfigError;

/// Camera rig parameters
#[derive(Debug, Clone)]
pub struct CameraParams {
    /// Initial distance from the origin (world units)
    pub initial_zoom: f32,

    /// Zoom clamp (world units)
    pub zoom_range: (f32, f32),

    /// Zoom change per scroll unit (world units)
    pub zoom_per_scroll: f32,

    /// Camera height above the orbit plane as a fraction of zoom
    pub elevation_fraction: f32,

    /// Auto-rotation rate (radians per tick)
    pub auto_rotate_rate: f32,

    /// Yaw change per pixel of pointer drag (radians)
    pub drag_sensitivity: f32,

    /// First-order lag factor of yaw toward target yaw (per tick)
    pub yaw_follow: f32,

    /// Size of one rotate detent (radians)
    pub rotate_detent_rad: f32,

    /// Start with auto-rotation enabled
    pub auto_rotate: bool,

    /// Start with pointer control enabled
    pub pointer_control: bool,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            initial_zoom: 900.0,
            zoom_range: (300.0, 2000.0),
            zoom_per_scroll: 1.0,
            elevation_fraction: 0.4,
            auto_rotate_rate: 0.002,
            drag_sensitivity: 0.005,
            yaw_follow: 0.1,
            rotate_detent_rad: 15f32.to_radians(),
            auto_rotate: true,
            pointer_control: true,
        }
    }
}

impl CameraParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("zoom_min", self.zoom_range.0)?;
        ensure_range("zoom_max", self.zoom_range.1, self.zoom_range.0, f32::MAX)?;
        ensure_range(
            "initial_zoom",
            self.initial_zoom,
            self.zoom_range.0,
            self.zoom_range.1,
        )?;
        ensure_range("yaw_follow", self.yaw_follow, 0.0, 1.0)?;
        ensure_positive("rotate_detent_rad", self.rotate_detent_rad)?;
        Ok(())
    }
}
