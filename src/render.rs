//! Renderer contract: what the simulation hands to whatever draws it.
//!
//! The core does not draw anything. A renderer receives a [`FrameView`]
//! each frame and can pack it into GPU-ready instance buffers with the
//! `Pod` types below.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::camera::CameraState;
use crate::connections::Connection;
use crate::particles::Particle;
use crate::terrain::TerrainGrid;

/// Per-particle instance data (sphere centre, radius, colour)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
}

/// Terrain vertex (position + band colour)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// One endpoint of a connection line segment
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    /// Stretch relative to the rest length (0 = slack, 1 = at rest length)
    pub tension: f32,
}

/// Read-only snapshot of one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub particles: &'a [Particle],
    pub terrain: &'a TerrainGrid,
    pub connections: &'a [Connection],
    pub camera: &'a CameraState,
    pub view_proj: Mat4,
    pub eye: Vec3,
}

impl FrameView<'_> {
    pub fn particle_instances(&self) -> Vec<ParticleInstance> {
        self.particles
            .iter()
            .map(|p| ParticleInstance {
                position: p.position.to_array(),
                size: p.size,
                color: p.color,
            })
            .collect()
    }

    pub fn terrain_vertices(&self) -> Vec<TerrainVertex> {
        self.terrain
            .cells
            .iter()
            .map(|c| TerrainVertex {
                position: c.position.to_array(),
                color: c.color_band.rgba(),
            })
            .collect()
    }

    /// Two vertices per connection; stale indices are skipped
    pub fn line_vertices(&self) -> Vec<LineVertex> {
        let mut vertices = Vec::with_capacity(self.connections.len() * 2);
        for c in self.connections {
            let (Some(a), Some(b)) = (
                self.particles.get(c.from_index),
                self.particles.get(c.to_index),
            ) else {
                continue;
            };
            let tension = if c.rest_length > 0.0 {
                (a.position.distance(b.position) / c.rest_length).min(1.0)
            } else {
                0.0
            };
            vertices.push(LineVertex {
                position: a.position.to_array(),
                tension,
            });
            vertices.push(LineVertex {
                position: b.position.to_array(),
                tension,
            });
        }
        vertices
    }
}

/// Anything that can draw a frame
pub trait Renderer {
    fn draw(&mut self, frame: &FrameView<'_>);
}
