//! Coherent noise for terrain heights and particle drift.
//!
//! Wraps a seeded Perlin generator so every sampler in the simulation
//! shares one seed and stays reproducible.

use ::noise::{NoiseFn, Perlin};

/// Seeded noise generator
#[derive(Clone)]
pub struct NoiseGenerator {
    perlin: Perlin,
    seed: u32,
}

impl NoiseGenerator {
    /// Create new noise generator with seed
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Sample 2D noise remapped to [0, 1]
    pub fn sample_2d(&self, x: f64, z: f64) -> f32 {
        let n = self.perlin.get([x, z]) as f32;
        ((n + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Sample 3D noise
    ///
    /// Returns value in range [-1, 1]
    pub fn sample_3d(&self, x: f64, y: f64, z: f64) -> f32 {
        (self.perlin.get([x, y, z]) as f32).clamp(-1.0, 1.0)
    }
}

impl std::fmt::Debug for NoiseGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseGenerator")
            .field("seed", &self.seed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_2d_in_unit_range() {
        let noise = NoiseGenerator::new(7);
        for i in 0..200 {
            let v = noise.sample_2d(i as f64 * 0.37, i as f64 * 0.11);
            assert!((0.0..=1.0).contains(&v), "sample {} out of range", v);
        }
    }

    #[test]
    fn test_same_seed_same_values() {
        let a = NoiseGenerator::new(42);
        let b = NoiseGenerator::new(42);
        assert_eq!(a.sample_3d(1.3, 2.7, 0.5), b.sample_3d(1.3, 2.7, 0.5));
    }
}
