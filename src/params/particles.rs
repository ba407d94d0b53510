//! Particle population, force constants and behaviour variants.

use super::{ensure_positive, ensure_range};
use crate::error::ConfigError;

/// What happens when a particle leaves the box on X/Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Clamp to the wall and invert the violating velocity component
    #[default]
    Bounce,
    /// Re-enter from the opposite wall
    Wrap,
}

/// What happens when two particles overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Push both apart with opposing impulses
    #[default]
    Repel,
    /// Queue both for removal
    Despawn,
}

/// Rounding of the per-particle connection count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionFloor {
    /// `floor(budget * density)`, may be zero
    #[default]
    Floor,
    /// At least one connection whenever density > 0
    MinOne,
}

/// Population limits and behaviour variants
#[derive(Debug, Clone)]
pub struct ParticleConfig {
    /// Population at full particle density
    pub num_particles: usize,

    /// Population floor; falling below it triggers an immediate top-up
    pub min_particles: usize,

    /// Base particle radius range (world units, before size scaling)
    pub base_size_range: (f32, f32),

    /// Radius of the per-particle Bezier drift path (world units)
    pub bezier_radius: f32,

    pub boundary_policy: BoundaryPolicy,
    pub collision_policy: CollisionPolicy,

    /// Spawn a new particle the first time a particle hits the terrain
    pub spawn_on_first_hit: bool,

    /// Remove a particle after this many counted terrain hits
    pub despawn_hit_threshold: Option<u32>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            num_particles: 100,
            min_particles: 10,
            base_size_range: (3.0, 8.0),
            bezier_radius: 60.0,
            boundary_policy: BoundaryPolicy::Bounce,
            collision_policy: CollisionPolicy::Repel,
            spawn_on_first_hit: true,
            despawn_hit_threshold: Some(3),
        }
    }
}

impl ParticleConfig {
    /// Population ceiling for a given particle density
    ///
    /// Density is clamped to [0, 1]; the result never drops below `min_particles`.
    pub fn density_scaled_max(&self, density: f32) -> usize {
        let d = if density.is_finite() {
            density.clamp(0.0, 1.0)
        } else {
            0.0
        };
        ((self.num_particles as f32 * d).floor() as usize).max(self.min_particles)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_particles > self.num_particles {
            return Err(ConfigError::PopulationBounds {
                min: self.min_particles,
                max: self.num_particles,
            });
        }
        ensure_positive("base_size_min", self.base_size_range.0)?;
        ensure_range(
            "base_size_max",
            self.base_size_range.1,
            self.base_size_range.0,
            f32::MAX,
        )?;
        ensure_range("bezier_radius", self.bezier_radius, 0.0, f32::MAX)?;
        Ok(())
    }
}

/// Force and integration constants (per tick)
#[derive(Debug, Clone)]
pub struct ParticlePhysics {
    /// Overlap distance as a fraction of the summed radii
    pub repulsion_radius_factor: f32,

    /// Velocity impulse applied to each overlapping particle
    pub repulsion_impulse: f32,

    /// Extra weight of the vertical jitter component
    pub vertical_jitter_weight: f32,

    /// Spring coefficient pulling particles back to their anchor
    pub elastic_coefficient: f32,

    /// Chance of a dramatic impulse per unit randomness
    pub impulse_chance_scale: f32,

    /// Dramatic impulse magnitude per unit randomness
    pub impulse_magnitude_scale: f32,

    /// Velocity multiplier applied every tick
    pub damping: f32,

    /// Velocity factor applied to the component hitting a wall
    pub wall_restitution: f32,

    /// Ceiling height as a multiple of terrain height
    pub ceiling_factor: f32,

    /// Velocity factor after reflecting off the terrain
    pub bounciness: f32,

    /// Impulse along the surface normal after a terrain bounce
    pub normal_impulse: f32,

    /// Resting distance above the surface as a fraction of particle size
    pub contact_offset_factor: f32,

    /// Minimum ticks between two counted terrain hits
    pub hit_debounce_ticks: u64,

    /// Chance per tick of blending toward the Bezier path
    pub bezier_chance: f32,

    /// Bezier parameter advance per tick
    pub bezier_step: f32,

    /// Blend factor toward the Bezier point
    pub bezier_blend: f32,

    /// Noise drift scale per unit randomness (world units)
    pub noise_drift_scale: f32,

    /// Noise time scale (noise units per tick)
    pub noise_time_scale: f32,
}

impl Default for ParticlePhysics {
    fn default() -> Self {
        Self {
            repulsion_radius_factor: 0.8,
            repulsion_impulse: 0.05,
            vertical_jitter_weight: 2.0,
            elastic_coefficient: 0.01,
            impulse_chance_scale: 0.1,
            impulse_magnitude_scale: 20.0,
            damping: 0.98,
            wall_restitution: -0.8,
            ceiling_factor: 6.0,
            bounciness: 0.7,
            normal_impulse: 0.5,
            contact_offset_factor: 0.8,
            hit_debounce_ticks: 10,
            bezier_chance: 0.05,
            bezier_step: 0.005,
            bezier_blend: 0.02,
            noise_drift_scale: 0.5,
            noise_time_scale: 0.01,
        }
    }
}

impl ParticlePhysics {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_range("damping", self.damping, 0.0, 1.0)?;
        ensure_range("wall_restitution", self.wall_restitution, -1.0, 0.0)?;
        ensure_range("bounciness", self.bounciness, 0.0, 1.0)?;
        ensure_range("bezier_chance", self.bezier_chance, 0.0, 1.0)?;
        ensure_range("bezier_step", self.bezier_step, 0.0, 1.0)?;
        ensure_range("bezier_blend", self.bezier_blend, 0.0, 1.0)?;
        ensure_range("elastic_coefficient", self.elastic_coefficient, 0.0, 1.0)?;
        ensure_positive("ceiling_factor", self.ceiling_factor)?;
        ensure_range("normal_impulse", self.normal_impulse, 0.0, f32::MAX)?;
        Ok(())
    }
}

/// Connection graph parameters
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    /// Upper bound on nearest neighbours per particle
    pub max_neighbors: usize,

    /// Rest length as a multiple of the distance at creation
    pub rest_length_factor: f32,

    /// Fraction of the excess stretch corrected per tick
    pub correction_strength: f32,

    pub floor: ConnectionFloor,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            max_neighbors: 5,
            rest_length_factor: 1.5,
            correction_strength: 0.1,
            floor: ConnectionFloor::Floor,
        }
    }
}

impl ConnectionParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_range("rest_length_factor", self.rest_length_factor, 1.0, f32::MAX)?;
        // Strictly inside (0, 1)
        if !(self.correction_strength > 0.0 && self.correction_strength < 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "correction_strength",
                value: self.correction_strength,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_scaled_max_respects_floor() {
        let config = ParticleConfig::default();
        assert_eq!(config.density_scaled_max(1.0), 100);
        assert_eq!(config.density_scaled_max(0.5), 50);
        assert_eq!(config.density_scaled_max(0.0), config.min_particles);
        assert_eq!(config.density_scaled_max(f32::NAN), config.min_particles);
        assert_eq!(config.density_scaled_max(3.0), 100);
    }

    #[test]
    fn test_population_bounds_validation() {
        let config = ParticleConfig {
            min_particles: 200,
            ..ParticleConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PopulationBounds { .. })
        ));
    }
}
