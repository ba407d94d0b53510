//! Control-surface configuration and the channel-to-physics range table.

use super::{ensure_positive, ensure_range};
use crate::error::ConfigError;

/// Control surface and gesture smoothing configuration
#[derive(Debug, Clone)]
pub struct ControlConfig {
    /// Controller id bound to channel 0; channel i gets `first_controller_id + i`
    pub first_controller_id: u8,

    /// Base gesture smoothing factor (per tick)
    /// Effective rate is `factor * (1 + 2 * raw)`, so 1/3 is the largest
    /// value that cannot overshoot
    pub smoothing_factor: f32,

    /// Initial raw value of the discrete channels (0-7)
    pub discrete_default: f32,

    /// Initial raw value of the gesture channels (8-13)
    pub gesture_default: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            first_controller_id: 34,
            smoothing_factor: 0.15,
            discrete_default: 0.5,
            gesture_default: 0.0,
        }
    }
}

impl ControlConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("smoothing_factor", self.smoothing_factor)?;
        ensure_range("smoothing_factor", self.smoothing_factor, 0.0, 1.0 / 3.0)?;
        ensure_range("discrete_default", self.discrete_default, 0.0, 1.0)?;
        ensure_range("gesture_default", self.gesture_default, 0.0, 1.0)?;
        let last = self.first_controller_id as u32 + crate::control::NUM_CHANNELS as u32 - 1;
        if last > 127 {
            return Err(ConfigError::OutOfRange {
                field: "first_controller_id",
                value: self.first_controller_id as f32,
                min: 0.0,
                max: (128 - crate::control::NUM_CHANNELS) as f32,
            });
        }
        Ok(())
    }
}

/// Output ranges for the discrete channels
///
/// Each pair is `(value at 0.0, value at 1.0)`.
#[derive(Debug, Clone)]
pub struct MappingRanges {
    /// Particle size multiplier (dimensionless)
    pub size_scale: (f32, f32),

    /// Integration speed multiplier (dimensionless)
    pub speed: (f32, f32),

    /// Central gravity (velocity units per tick)
    pub gravity: (f32, f32),

    /// Velocity jitter amplitude (velocity units per tick)
    pub turbulence: (f32, f32),

    /// Randomness amount (drives jitter, impulses and noise drift)
    pub randomness: (f32, f32),

    /// Fraction of the configured population kept alive
    pub particle_density: (f32, f32),

    /// Fraction of the nearest-neighbour budget used for connections
    pub connection_density: (f32, f32),

    /// Terrain peak-to-trough height (world units)
    pub terrain_height: (f32, f32),

    /// Maximum pitch/roll from a full gesture deflection (radians)
    pub max_tilt_rad: f32,

    /// Rotate-pair deadzone before a yaw detent fires
    pub rotate_deadzone: f32,

    /// Gesture gravity added at full front+back deflection
    pub gesture_gravity_scale: f32,

    /// Vortex strength at full left+right rotate deflection
    pub vortex_scale: f32,
}

impl Default for MappingRanges {
    fn default() -> Self {
        Self {
            size_scale: (0.5, 2.0),
            speed: (0.1, 2.0),
            gravity: (0.01, 0.2),
            turbulence: (0.01, 0.3),
            randomness: (0.01, 0.2),
            particle_density: (0.2, 1.0),
            connection_density: (0.0, 1.0),
            terrain_height: (20.0, 200.0),
            max_tilt_rad: std::f32::consts::FRAC_PI_4,
            rotate_deadzone: 0.5,
            gesture_gravity_scale: 0.1,
            vortex_scale: 0.05,
        }
    }
}

impl MappingRanges {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("size_scale_min", self.size_scale.0)?;
        ensure_positive("speed_min", self.speed.0)?;
        ensure_range("particle_density_min", self.particle_density.0, 0.0, 1.0)?;
        ensure_range("particle_density_max", self.particle_density.1, 0.0, 1.0)?;
        ensure_range("connection_density_min", self.connection_density.0, 0.0, 1.0)?;
        ensure_range("connection_density_max", self.connection_density.1, 0.0, 1.0)?;
        ensure_range("terrain_height_min", self.terrain_height.0, 0.0, f32::MAX)?;
        ensure_range("max_tilt_rad", self.max_tilt_rad, 0.0, std::f32::consts::FRAC_PI_2)?;
        ensure_range("rotate_deadzone", self.rotate_deadzone, 0.0, 1.0)?;
        Ok(())
    }
}
