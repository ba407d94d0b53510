//! Proximity graph over the particles: nearest-neighbour links that are
//! drawn as a mesh and act as stretch-only springs.

use std::collections::HashSet;

use log::debug;

use crate::params::{ConnectionFloor, ConnectionParams};
use crate::particles::Particle;

/// Soft distance constraint between two particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub from_index: usize,
    pub to_index: usize,
    /// Length beyond which the link pulls its endpoints together
    pub rest_length: f32,
    pub correction_strength: f32,
}

/// Derived connection set, valid only for the particle array it was built from
#[derive(Debug, Clone)]
pub struct ConnectionGraph {
    pub connections: Vec<Connection>,
    params: ConnectionParams,
    built_for: usize,
}

impl ConnectionGraph {
    pub fn new(params: ConnectionParams) -> Self {
        Self {
            connections: Vec::new(),
            params,
            built_for: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Neighbours per particle for a population of `n`
    pub fn neighbor_count(&self, n: usize, density: f32) -> usize {
        if n < 2 || density.is_nan() || density <= 0.0 {
            return 0;
        }
        let budget = self.params.max_neighbors.min(n - 1);
        let k = (budget as f32 * density.min(1.0)).floor() as usize;
        match self.params.floor {
            ConnectionFloor::Floor => k,
            ConnectionFloor::MinOne => k.max(1),
        }
    }

    pub fn clear(&mut self) {
        self.connections.clear();
        self.built_for = 0;
    }

    /// Whether every connection indexes into an array of length `n`
    pub fn is_valid_for(&self, n: usize) -> bool {
        self.connections
            .iter()
            .all(|c| c.from_index < n && c.to_index < n && c.from_index != c.to_index)
    }

    /// Rebuild from scratch; O(N^2 log N)
    pub fn rebuild(&mut self, particles: &[Particle], density: f32) {
        self.connections.clear();
        self.built_for = particles.len();

        let k = self.neighbor_count(particles.len(), density);
        if k == 0 {
            return;
        }

        let mut seen = HashSet::new();
        let mut distances: Vec<(f32, usize)> = Vec::with_capacity(particles.len());
        for (i, a) in particles.iter().enumerate() {
            distances.clear();
            distances.extend(
                particles
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(j, b)| (a.position.distance(b.position), j)),
            );
            distances.sort_by(|x, y| x.0.total_cmp(&y.0));

            for &(distance, j) in distances.iter().take(k) {
                if !seen.insert((i.min(j), i.max(j))) {
                    continue;
                }
                self.connections.push(Connection {
                    from_index: i,
                    to_index: j,
                    rest_length: distance * self.params.rest_length_factor,
                    correction_strength: self.params.correction_strength,
                });
            }
        }

        debug!(
            "Rebuilt {} connections over {} particles (k = {})",
            self.connections.len(),
            particles.len(),
            k
        );
    }

    /// Pull stretched pairs back toward their rest length
    pub fn apply(&self, particles: &mut [Particle]) {
        debug_assert!(
            self.connections.is_empty() || self.built_for == particles.len(),
            "stale connection graph"
        );
        for c in &self.connections {
            if c.from_index >= particles.len() || c.to_index >= particles.len() {
                continue;
            }
            let delta = particles[c.to_index].position - particles[c.from_index].position;
            let distance = delta.length();
            if distance <= c.rest_length || distance <= f32::EPSILON {
                continue;
            }
            let excess = distance - c.rest_length;
            let correction = delta / distance * excess * c.correction_strength * 0.5;
            particles[c.from_index].position += correction;
            particles[c.to_index].position -= correction;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParticleConfig;
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn line_of_particles(n: usize) -> Vec<Particle> {
        let mut rng = StdRng::seed_from_u64(4);
        let config = ParticleConfig::default();
        (0..n)
            .map(|i| Particle::at(Vec3::new(i as f32 * 10.0, 0.0, 0.0), &config, 1.0, &mut rng))
            .collect()
    }

    #[test]
    fn test_neighbor_count_policies() {
        let floor = ConnectionGraph::new(ConnectionParams::default());
        assert_eq!(floor.neighbor_count(100, 1.0), 5);
        assert_eq!(floor.neighbor_count(3, 1.0), 2);
        assert_eq!(floor.neighbor_count(100, 0.1), 0);
        assert_eq!(floor.neighbor_count(100, 0.0), 0);
        assert_eq!(floor.neighbor_count(1, 1.0), 0);
        assert_eq!(floor.neighbor_count(100, f32::NAN), 0);

        let min_one = ConnectionGraph::new(ConnectionParams {
            floor: ConnectionFloor::MinOne,
            ..ConnectionParams::default()
        });
        assert_eq!(min_one.neighbor_count(100, 0.1), 1);
        assert_eq!(min_one.neighbor_count(100, 0.0), 0);
        assert_eq!(min_one.neighbor_count(100, f32::NAN), 0);
    }

    #[test]
    fn test_rebuild_links_nearest_with_rest_length() {
        let particles = line_of_particles(4);
        let mut graph = ConnectionGraph::new(ConnectionParams::default());
        // min(5, 3) * 0.34 = 1.02 -> one neighbour each
        graph.rebuild(&particles, 0.34);

        assert!(graph.is_valid_for(particles.len()));
        assert!(!graph.is_empty());
        for c in &graph.connections {
            assert!((c.rest_length - 15.0).abs() < 1e-4);
        }
        // No duplicate undirected pairs
        let pairs: HashSet<_> = graph
            .connections
            .iter()
            .map(|c| (c.from_index.min(c.to_index), c.from_index.max(c.to_index)))
            .collect();
        assert_eq!(pairs.len(), graph.len());
    }

    #[test]
    fn test_apply_only_corrects_stretched_links() {
        let mut particles = line_of_particles(2);
        let mut graph = ConnectionGraph::new(ConnectionParams::default());
        graph.rebuild(&particles, 1.0);
        assert_eq!(graph.len(), 1);

        // Within rest length (10 < 15): untouched
        let before = particles.clone();
        graph.apply(&mut particles);
        assert_eq!(particles, before);

        // Stretched to 35: excess 20, each end moves 20 * 0.1 / 2 = 1
        particles[1].position.x = 35.0;
        graph.apply(&mut particles);
        assert!((particles[0].position.x - 1.0).abs() < 1e-4);
        assert!((particles[1].position.x - 34.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_density_builds_nothing() {
        let particles = line_of_particles(10);
        let mut graph = ConnectionGraph::new(ConnectionParams::default());
        graph.rebuild(&particles, 0.0);
        assert!(graph.is_empty());
    }
}
