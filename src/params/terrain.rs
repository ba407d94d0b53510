//! Terrain heightfield parameters.

use super::{ensure_positive, ensure_range};
use crate::error::ConfigError;

/// Terrain generation parameters
#[derive(Debug, Clone)]
pub struct TerrainParams {
    /// Grid resolution (points per side, e.g., 64 = 4,096 points)
    pub resolution: usize,

    /// Side length of the square terrain footprint (world units)
    pub world_size: f32,

    /// Base noise frequency (cycles per world unit)
    pub base_frequency: f32,

    /// Octave weights: base, detail (x3), micro-detail (x8), ridge
    pub octave_weights: [f32; 4],

    /// Minimum terrain-height change before the grid is rebuilt (world units)
    pub regen_hysteresis: f32,

    /// Normalised height thresholds between the five colour bands
    pub band_thresholds: [f32; 4],
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            resolution: 64,
            world_size: 1000.0,
            base_frequency: 0.003,
            octave_weights: [0.5, 0.25, 0.1, 0.15],
            regen_hysteresis: 5.0,
            band_thresholds: [0.3, 0.4, 0.55, 0.7],
        }
    }
}

impl TerrainParams {
    /// Distance between neighbouring grid points (world units)
    pub fn spacing(&self) -> f32 {
        self.world_size / (self.resolution - 1) as f32
    }

    pub fn half_size(&self) -> f32 {
        self.world_size * 0.5
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution < 2 {
            return Err(ConfigError::ResolutionTooSmall(self.resolution));
        }
        ensure_positive("world_size", self.world_size)?;
        ensure_positive("base_frequency", self.base_frequency)?;
        ensure_range("regen_hysteresis", self.regen_hysteresis, 0.0, f32::MAX)?;
        for w in self.octave_weights {
            ensure_range("octave_weights", w, 0.0, 1.0)?;
        }
        for t in self.band_thresholds {
            ensure_range("band_thresholds", t, 0.0, 1.0)?;
        }
        Ok(())
    }
}
