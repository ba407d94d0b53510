//! Procedural terrain: a noise heightfield that particles collide with.

mod grid;
mod system;

// Re-export public types
pub use grid::TerrainGrid;
pub use system::TerrainSystem;

use glam::Vec3;

/// Height band used for terrain colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBand {
    DeepWater,
    ShallowWater,
    Lowland,
    Midland,
    Highland,
}

impl ColorBand {
    /// Classify a normalised height in [0, 1]
    pub fn classify(normalized: f32, thresholds: &[f32; 4]) -> Self {
        if normalized < thresholds[0] {
            ColorBand::DeepWater
        } else if normalized < thresholds[1] {
            ColorBand::ShallowWater
        } else if normalized < thresholds[2] {
            ColorBand::Lowland
        } else if normalized < thresholds[3] {
            ColorBand::Midland
        } else {
            ColorBand::Highland
        }
    }

    pub fn rgba(self) -> [f32; 4] {
        match self {
            ColorBand::DeepWater => [0.05, 0.15, 0.45, 1.0],
            ColorBand::ShallowWater => [0.15, 0.45, 0.7, 1.0],
            ColorBand::Lowland => [0.25, 0.6, 0.25, 1.0],
            ColorBand::Midland => [0.45, 0.4, 0.25, 1.0],
            ColorBand::Highland => [0.9, 0.9, 0.95, 1.0],
        }
    }
}

/// One grid point of the heightfield
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainCell {
    pub position: Vec3,
    pub color_band: ColorBand,
}

/// Result of a terrain height query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainSample {
    pub height: f32,
    /// Unit normal of the containing quad, pointing up
    pub normal: Vec3,
}
