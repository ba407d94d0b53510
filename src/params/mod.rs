//! Parameter definitions with physical units and documented semantics.
//!
//! All tuning constants live here with:
//! - World units (terrain units, ticks, radians)
//! - Documented ranges and meanings
//! - A `validate` method per group

mod camera;
mod control;
mod particles;
mod render;
mod terrain;

// Re-export all types
pub use camera::CameraParams;
pub use control::{ControlConfig, MappingRanges};
pub use particles::{
    BoundaryPolicy, CollisionPolicy, ConnectionFloor, ConnectionParams, ParticleConfig,
    ParticlePhysics,
};
pub use render::RenderConfig;
pub use terrain::TerrainParams;

use crate::error::ConfigError;

/// Complete simulation configuration
#[derive(Debug, Clone, Default)]
pub struct SimulationConfig {
    /// Seed for the random generator and the noise generator
    pub seed: u64,
    pub control: ControlConfig,
    /// Channel-to-physics output ranges
    pub ranges: MappingRanges,
    pub terrain: TerrainParams,
    pub particles: ParticleConfig,
    pub physics: ParticlePhysics,
    pub connections: ConnectionParams,
    pub camera: CameraParams,
    pub render: RenderConfig,
}

impl SimulationConfig {
    /// Validate every parameter group
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.control.validate()?;
        self.ranges.validate()?;
        self.terrain.validate()?;
        self.particles.validate()?;
        self.physics.validate()?;
        self.connections.validate()?;
        self.camera.validate()?;
        self.render.validate()?;
        Ok(())
    }
}

pub(crate) fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

pub(crate) fn ensure_range(
    field: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
