//! Per-particle force and constraint steps, applied in tick order.

use glam::Vec3;
use rand::Rng;

use super::{random_in_sphere, Particle};
use crate::noise::NoiseGenerator;
use crate::params::{BoundaryPolicy, ParticlePhysics};
use crate::terrain::TerrainSystem;

/// Uniform velocity jitter, weighted toward the vertical axis
pub(crate) fn apply_jitter<R: Rng + ?Sized>(
    p: &mut Particle,
    turbulence: f32,
    randomness: f32,
    vertical_weight: f32,
    rng: &mut R,
) {
    let amount = turbulence + randomness;
    p.velocity += Vec3::new(
        rng.gen_range(-1.0..=1.0) * amount,
        rng.gen_range(-1.0..=1.0) * amount * vertical_weight,
        rng.gen_range(-1.0..=1.0) * amount,
    );
}

/// Pull toward the world origin
pub(crate) fn apply_central_gravity(p: &mut Particle, strength: f32) {
    p.velocity += (-p.position).normalize_or_zero() * strength;
}

/// Tangential push around the vertical axis
pub(crate) fn apply_vortex(p: &mut Particle, strength: f32) {
    if strength <= 0.0 {
        return;
    }
    let tangent = Vec3::new(-p.position.z, 0.0, p.position.x).normalize_or_zero();
    p.velocity += tangent * strength;
}

/// Spring back toward the spawn anchor
pub(crate) fn apply_elastic(p: &mut Particle, coefficient: f32) {
    p.velocity += (p.original_position - p.position) * coefficient;
}

/// Occasional large random-direction kick
pub(crate) fn apply_random_impulse<R: Rng + ?Sized>(
    p: &mut Particle,
    randomness: f32,
    physics: &ParticlePhysics,
    rng: &mut R,
) {
    let chance = (randomness * physics.impulse_chance_scale).clamp(0.0, 1.0);
    if rng.gen::<f32>() < chance {
        let direction = random_in_sphere(rng).normalize_or_zero();
        p.velocity += direction * randomness * physics.impulse_magnitude_scale;
    }
}

/// Damp then advance position
pub(crate) fn integrate(p: &mut Particle, damping: f32, speed: f32) {
    p.velocity *= damping;
    p.position += p.velocity * speed;
}

/// Keep the particle inside the world box
pub(crate) fn apply_boundary(
    p: &mut Particle,
    policy: BoundaryPolicy,
    half_size: f32,
    ceiling: f32,
    restitution: f32,
) {
    match policy {
        BoundaryPolicy::Bounce => {
            bounce_axis(&mut p.position.x, &mut p.velocity.x, half_size, restitution);
            bounce_axis(&mut p.position.z, &mut p.velocity.z, half_size, restitution);
        }
        BoundaryPolicy::Wrap => {
            let span = half_size * 2.0;
            if p.position.x.abs() > half_size {
                p.position.x = (p.position.x + half_size).rem_euclid(span) - half_size;
            }
            if p.position.z.abs() > half_size {
                p.position.z = (p.position.z + half_size).rem_euclid(span) - half_size;
            }
        }
    }

    if p.position.y > ceiling {
        p.position.y = ceiling;
        if p.velocity.y > 0.0 {
            p.velocity.y *= restitution;
        }
    }
}

fn bounce_axis(position: &mut f32, velocity: &mut f32, half_size: f32, restitution: f32) {
    if *position > half_size {
        *position = half_size;
        if *velocity > 0.0 {
            *velocity *= restitution;
        }
    } else if *position < -half_size {
        *position = -half_size;
        if *velocity < 0.0 {
            *velocity *= restitution;
        }
    }
}

/// Result of one terrain collision check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    /// The particle was below the surface and got pushed out
    pub collided: bool,
    /// The collision counted as a (debounced) terrain hit
    pub hit_counted: bool,
}

/// Push a penetrating particle back above the terrain and bounce it
///
/// Outside the terrain footprint only the `-terrain_height` floor applies.
pub fn resolve_terrain_collision(
    p: &mut Particle,
    terrain: &TerrainSystem,
    physics: &ParticlePhysics,
    tick: u64,
) -> CollisionOutcome {
    let floor = -terrain.baked_height();
    let (surface, normal) = match terrain.sample(p.position.x, p.position.z) {
        Some(sample) => (sample.height.max(floor), sample.normal),
        None => (floor, Vec3::Y),
    };

    if p.position.y >= surface {
        return CollisionOutcome::default();
    }

    p.position.y = surface + p.size * physics.contact_offset_factor;

    let into_surface = p.velocity.dot(normal);
    if into_surface < 0.0 {
        p.velocity -= 2.0 * into_surface * normal;
    }
    p.velocity *= physics.bounciness;
    p.velocity += normal * physics.normal_impulse;

    let hit_counted = match p.last_collision_tick {
        Some(last) => tick.saturating_sub(last) >= physics.hit_debounce_ticks,
        None => true,
    };
    if hit_counted {
        p.terrain_hit_count += 1;
        p.last_collision_tick = Some(tick);
    }

    CollisionOutcome {
        collided: true,
        hit_counted,
    }
}

/// Occasionally blend toward the particle's Bezier path
pub(crate) fn apply_bezier_drift<R: Rng + ?Sized>(
    p: &mut Particle,
    physics: &ParticlePhysics,
    rng: &mut R,
) {
    if rng.gen::<f32>() >= physics.bezier_chance {
        return;
    }

    p.bezier_t += physics.bezier_step * p.bezier_direction;
    if p.bezier_t >= 1.0 {
        p.bezier_t = 1.0;
        p.bezier_direction = -1.0;
    } else if p.bezier_t <= 0.0 {
        p.bezier_t = 0.0;
        p.bezier_direction = 1.0;
    }

    let target = p.bezier_point();
    p.position = p.position.lerp(target, physics.bezier_blend);
}

/// Small coherent offset sampled at (seed, time)
pub(crate) fn apply_noise_drift(
    p: &mut Particle,
    noise: &NoiseGenerator,
    time: f64,
    randomness: f32,
    physics: &ParticlePhysics,
) {
    let seed = p.noise_phase as f64;
    let offset = Vec3::new(
        noise.sample_3d(seed, time, 0.0),
        noise.sample_3d(seed + 101.3, time, 0.0),
        noise.sample_3d(seed + 211.7, time, 0.0),
    );
    p.position += offset * randomness * physics.noise_drift_scale;
}
