//! Particle population: per-tick physics plus the queue-then-apply
//! spawn/despawn discipline.

use glam::Vec3;
use log::debug;
use rand::Rng;

use super::forces::{
    apply_bezier_drift, apply_boundary, apply_central_gravity, apply_elastic, apply_jitter,
    apply_noise_drift, apply_random_impulse, apply_vortex, integrate, resolve_terrain_collision,
};
use super::Particle;
use crate::mapping::MappedParams;
use crate::noise::NoiseGenerator;
use crate::params::{CollisionPolicy, ParticleConfig, ParticlePhysics};
use crate::terrain::TerrainSystem;

/// Population changes applied at the end of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub spawned: usize,
    pub removed: usize,
    /// Particles added synchronously to restore the population floor
    pub topped_up: usize,
}

impl BatchReport {
    /// Whether particle indices may have shifted
    pub fn changed(&self) -> bool {
        self.spawned + self.removed + self.topped_up > 0
    }
}

/// Owns all particles and their lifecycle
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
    pub config: ParticleConfig,
    pub physics: ParticlePhysics,
    target_max: usize,
    pending_adds: Vec<Particle>,
    pending_removals: Vec<usize>,
}

impl ParticleSystem {
    pub fn new(config: ParticleConfig, physics: ParticlePhysics) -> Self {
        let target_max = config.num_particles;
        Self {
            particles: Vec::new(),
            config,
            physics,
            target_max,
            pending_adds: Vec::new(),
            pending_removals: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Current population ceiling
    pub fn target_max(&self) -> usize {
        self.target_max
    }

    /// Replace the whole population with `floor(num_particles * density)` fresh particles
    pub fn reinitialize<R: Rng + ?Sized>(
        &mut self,
        density: f32,
        size_scale: f32,
        terrain: &TerrainSystem,
        noise: &NoiseGenerator,
        rng: &mut R,
    ) {
        self.target_max = self.config.density_scaled_max(density);
        self.pending_adds.clear();
        self.pending_removals.clear();
        self.particles = (0..self.target_max)
            .map(|_| Particle::random(terrain, noise, &self.config, size_scale, rng))
            .collect();
        debug!("Reinitialized {} particles", self.particles.len());
    }

    /// Queue a particle to be added at the end of the tick
    pub(crate) fn queue_add(&mut self, particle: Particle) {
        self.pending_adds.push(particle);
    }

    /// Queue a particle index for removal at the end of the tick
    pub(crate) fn queue_removal(&mut self, index: usize) {
        self.pending_removals.push(index);
    }

    /// Advance every particle by one tick and apply the queued batch
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        params: &MappedParams,
        terrain: &TerrainSystem,
        noise: &NoiseGenerator,
        rng: &mut R,
        tick: u64,
    ) -> BatchReport {
        for p in &mut self.particles {
            p.size = p.base_size * params.size_scale;
        }

        self.apply_pairwise_collisions();

        let physics = &self.physics;
        let half_size = terrain.half_size();
        let ceiling = terrain.baked_height() * physics.ceiling_factor;
        let gravity = params.gravity + params.gesture_gravity;
        let time = tick as f64 * physics.noise_time_scale as f64;

        let mut spawns = Vec::new();
        let mut expired = Vec::new();
        for (index, p) in self.particles.iter_mut().enumerate() {
            apply_jitter(
                p,
                params.turbulence,
                params.randomness,
                physics.vertical_jitter_weight,
                rng,
            );
            apply_central_gravity(p, gravity);
            apply_vortex(p, params.vortex_strength);
            apply_elastic(p, physics.elastic_coefficient);
            apply_random_impulse(p, params.randomness, physics, rng);
            integrate(p, physics.damping, params.speed);
            apply_boundary(
                p,
                self.config.boundary_policy,
                half_size,
                ceiling,
                physics.wall_restitution,
            );

            let outcome = resolve_terrain_collision(p, terrain, physics, tick);
            if outcome.hit_counted {
                if p.terrain_hit_count == 1 && self.config.spawn_on_first_hit {
                    let spawn_at = p.position + Vec3::Y * p.size * 2.0;
                    spawns.push(Particle::at(
                        spawn_at,
                        &self.config,
                        params.size_scale,
                        rng,
                    ));
                }
                if let Some(threshold) = self.config.despawn_hit_threshold {
                    if p.terrain_hit_count >= threshold {
                        expired.push(index);
                    }
                }
            }

            apply_bezier_drift(p, physics, rng);
            apply_noise_drift(p, noise, time, params.randomness, physics);
        }
        for particle in spawns {
            self.queue_add(particle);
        }
        for index in expired {
            self.queue_removal(index);
        }

        let mut report = self.apply_batch();
        report.topped_up = self.top_up(params.size_scale, terrain, noise, rng);
        if report.changed() {
            debug!(
                "Tick {}: +{} -{} topped up {} -> {} particles",
                tick,
                report.spawned,
                report.removed,
                report.topped_up,
                self.particles.len()
            );
        }
        report
    }

    /// Repel (or queue for removal) every overlapping pair
    fn apply_pairwise_collisions(&mut self) {
        let n = self.particles.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (&self.particles[i], &self.particles[j]);
                let min_dist = self.physics.repulsion_radius_factor * (a.size + b.size);
                let delta = a.position - b.position;
                if delta.length_squared() >= min_dist * min_dist {
                    continue;
                }

                match self.config.collision_policy {
                    CollisionPolicy::Repel => {
                        let mut axis = delta.normalize_or_zero();
                        if axis == Vec3::ZERO {
                            axis = Vec3::Y;
                        }
                        let impulse = axis * self.physics.repulsion_impulse;
                        self.particles[i].velocity += impulse;
                        self.particles[j].velocity -= impulse;
                    }
                    CollisionPolicy::Despawn => {
                        self.queue_removal(i);
                        self.queue_removal(j);
                    }
                }
            }
        }
    }

    /// Apply queued adds (capped at the target) then removals, highest index first
    fn apply_batch(&mut self) -> BatchReport {
        let room = self.target_max.saturating_sub(self.particles.len());
        let adds: Vec<Particle> = self.pending_adds.drain(..).take(room).collect();
        let spawned = adds.len();
        // Adds append, so queued removal indices stay valid
        self.particles.extend(adds);

        let mut removals = std::mem::take(&mut self.pending_removals);
        removals.sort_unstable_by(|a, b| b.cmp(a));
        removals.dedup();
        let mut removed = 0;
        for index in removals {
            if index < self.particles.len() {
                self.particles.remove(index);
                removed += 1;
            }
        }

        BatchReport {
            spawned,
            removed,
            topped_up: 0,
        }
    }

    /// Synchronously restore the population floor
    fn top_up<R: Rng + ?Sized>(
        &mut self,
        size_scale: f32,
        terrain: &TerrainSystem,
        noise: &NoiseGenerator,
        rng: &mut R,
    ) -> usize {
        let missing = self.config.min_particles.saturating_sub(self.particles.len());
        for _ in 0..missing {
            self.particles.push(Particle::random(
                terrain,
                noise,
                &self.config,
                size_scale,
                rng,
            ));
        }
        missing
    }
}
