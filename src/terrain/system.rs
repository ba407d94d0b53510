//! Terrain lifecycle: wholesale regeneration behind a hysteresis threshold.

use log::info;

use super::grid::TerrainGrid;
use super::TerrainSample;
use crate::noise::NoiseGenerator;
use crate::params::TerrainParams;

/// Owns the current heightfield and decides when to rebuild it
#[derive(Debug, Clone)]
pub struct TerrainSystem {
    pub grid: TerrainGrid,
    pub params: TerrainParams,
    noise: NoiseGenerator,
}

impl TerrainSystem {
    pub fn new(params: TerrainParams, noise: NoiseGenerator, terrain_height: f32) -> Self {
        let grid = TerrainGrid::generate(&params, &noise, terrain_height);
        Self {
            grid,
            params,
            noise,
        }
    }

    /// Terrain height the current grid was baked with
    pub fn baked_height(&self) -> f32 {
        self.grid.terrain_height()
    }

    /// Rebuild the grid if the requested height drifted past the hysteresis
    ///
    /// Returns `true` when the grid was regenerated.
    pub fn update(&mut self, terrain_height: f32) -> bool {
        if (terrain_height - self.baked_height()).abs() <= self.params.regen_hysteresis {
            return false;
        }
        self.regenerate(terrain_height);
        true
    }

    /// Unconditionally rebuild the grid
    pub fn regenerate(&mut self, terrain_height: f32) {
        info!(
            "Regenerating terrain: height {:.1} -> {:.1}",
            self.baked_height(),
            terrain_height
        );
        self.grid = TerrainGrid::generate(&self.params, &self.noise, terrain_height);
    }

    pub fn sample(&self, x: f32, z: f32) -> Option<TerrainSample> {
        self.grid.sample(x, z)
    }

    pub fn half_size(&self) -> f32 {
        self.grid.half_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system(height: f32) -> TerrainSystem {
        let params = TerrainParams {
            resolution: 24,
            ..TerrainParams::default()
        };
        TerrainSystem::new(params, NoiseGenerator::new(42), height)
    }

    #[test]
    fn test_small_changes_skip_regeneration() {
        let mut terrain = system(100.0);
        assert!(!terrain.update(104.9));
        assert!(!terrain.update(95.0));
        assert_eq!(terrain.baked_height(), 100.0);
        assert!(terrain.update(105.5));
        assert_eq!(terrain.baked_height(), 105.5);
    }

    #[test]
    fn test_same_seed_same_heightfield() {
        let a = system(80.0);
        let mut b = system(150.0);
        b.regenerate(80.0);
        let heights_a: Vec<f32> = a.grid.cells.iter().map(|c| c.position.y).collect();
        let heights_b: Vec<f32> = b.grid.cells.iter().map(|c| c.position.y).collect();
        assert_eq!(heights_a, heights_b);
    }
}
