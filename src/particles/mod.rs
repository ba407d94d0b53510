//! Particle population with terrain collision and batched spawn/despawn.

mod forces;
mod system;

// Re-export public types
pub use forces::{resolve_terrain_collision, CollisionOutcome};
pub use system::{BatchReport, ParticleSystem};

use glam::Vec3;
use rand::Rng;

use crate::noise::NoiseGenerator;
use crate::params::ParticleConfig;
use crate::terrain::TerrainSystem;

/// A single simulated particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Anchor of the elastic restoring force
    pub original_position: Vec3,
    pub size: f32,
    pub base_size: f32,
    pub color: [f32; 4],
    /// Per-particle seed for coherent noise drift
    pub noise_phase: f32,
    pub bezier_points: [Vec3; 4],
    pub bezier_t: f32,
    /// +1 or -1
    pub bezier_direction: f32,
    pub terrain_hit_count: u32,
    pub last_collision_tick: Option<u64>,
}

impl Particle {
    /// Create a particle at a given coordinate
    pub fn at<R: Rng + ?Sized>(
        position: Vec3,
        config: &ParticleConfig,
        size_scale: f32,
        rng: &mut R,
    ) -> Self {
        let (min_size, max_size) = config.base_size_range;
        let base_size = if max_size > min_size {
            rng.gen_range(min_size..max_size)
        } else {
            min_size
        };

        let radius = config.bezier_radius;
        let bezier_points = std::array::from_fn(|_| position + random_in_sphere(rng) * radius);

        let hue: f32 = rng.gen();
        let color = [0.3 + 0.7 * hue, 0.55 + 0.2 * (1.0 - hue), 1.0 - 0.5 * hue, 0.9];

        Self {
            position,
            velocity: Vec3::ZERO,
            original_position: position,
            size: base_size * size_scale,
            base_size,
            color,
            noise_phase: rng.gen_range(0.0..1000.0),
            bezier_points,
            bezier_t: rng.gen(),
            bezier_direction: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            terrain_hit_count: 0,
            last_collision_tick: None,
        }
    }

    /// Create a particle at a random location above the terrain
    ///
    /// X/Z cover the inner 80% of the footprint; the lift above the surface
    /// comes from noise so neighbouring spawns form coherent layers.
    pub fn random<R: Rng + ?Sized>(
        terrain: &TerrainSystem,
        noise: &NoiseGenerator,
        config: &ParticleConfig,
        size_scale: f32,
        rng: &mut R,
    ) -> Self {
        let extent = terrain.half_size() * 0.8;
        let x = rng.gen_range(-extent..=extent);
        let z = rng.gen_range(-extent..=extent);
        let surface = terrain.sample(x, z).map_or(0.0, |s| s.height);
        let lift = noise.sample_2d(x as f64 * 0.01, z as f64 * 0.01) * terrain.baked_height();

        let mut particle = Self::at(Vec3::new(x, surface, z), config, size_scale, rng);
        particle.position.y = surface + particle.size + lift;
        particle.original_position = particle.position;
        particle
    }

    /// Point on this particle's cubic Bezier path at `bezier_t`
    pub fn bezier_point(&self) -> Vec3 {
        let t = self.bezier_t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let [p0, p1, p2, p3] = self.bezier_points;
        p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

/// Uniform random point inside the unit sphere
pub(crate) fn random_in_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}
