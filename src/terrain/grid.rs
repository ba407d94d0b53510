//! Heightfield grid built from layered noise, with bilinear height queries.

use glam::Vec3;

use super::{ColorBand, TerrainCell, TerrainSample};
use crate::noise::NoiseGenerator;
use crate::params::TerrainParams;

/// Frequency multipliers of the detail and micro-detail octaves
const DETAIL_OCTAVE: f64 = 3.0;
const MICRO_OCTAVE: f64 = 8.0;

/// Offsets keeping the octaves from sampling the same lattice points
const DETAIL_OFFSET: f64 = 31.7;
const MICRO_OFFSET: f64 = 73.1;

/// Square heightfield centred on the origin
#[derive(Debug, Clone)]
pub struct TerrainGrid {
    /// Row-major grid points (z rows of x columns)
    pub cells: Vec<TerrainCell>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
    resolution: usize,
    spacing: f32,
    half_size: f32,
    terrain_height: f32,
}

impl TerrainGrid {
    /// Generate a full heightfield for the given peak-to-trough height
    pub fn generate(params: &TerrainParams, noise: &NoiseGenerator, terrain_height: f32) -> Self {
        let resolution = params.resolution;
        let spacing = params.spacing();
        let half_size = params.half_size();

        let mut cells = Vec::with_capacity(resolution * resolution);
        for z in 0..resolution {
            for x in 0..resolution {
                let x_pos = x as f32 * spacing - half_size;
                let z_pos = z as f32 * spacing - half_size;

                let normalized = normalized_height(params, noise, x_pos, z_pos);
                cells.push(TerrainCell {
                    position: Vec3::new(x_pos, (normalized - 0.5) * terrain_height, z_pos),
                    color_band: ColorBand::classify(normalized, &params.band_thresholds),
                });
            }
        }

        let mut indices = Vec::with_capacity((resolution - 1).pow(2) * 6);
        for z in 0..resolution - 1 {
            for x in 0..resolution - 1 {
                let top_left = (z * resolution + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * resolution + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Self {
            cells,
            indices,
            resolution,
            spacing,
            half_size,
            terrain_height,
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn half_size(&self) -> f32 {
        self.half_size
    }

    /// Peak-to-trough height this grid was baked with
    pub fn terrain_height(&self) -> f32 {
        self.terrain_height
    }

    fn point(&self, x: usize, z: usize) -> Vec3 {
        self.cells[z * self.resolution + x].position
    }

    /// Query interpolated height and surface normal at world (x, z)
    ///
    /// Returns `None` outside the grid footprint.
    pub fn sample(&self, x: f32, z: f32) -> Option<TerrainSample> {
        // Written so NaN falls through to None
        if !(x.abs() <= self.half_size && z.abs() <= self.half_size) {
            return None;
        }
        let max = (self.resolution - 1) as f32;
        let gx = ((x + self.half_size) / self.spacing).clamp(0.0, max);
        let gz = ((z + self.half_size) / self.spacing).clamp(0.0, max);

        let ix = (gx.floor() as usize).min(self.resolution - 2);
        let iz = (gz.floor() as usize).min(self.resolution - 2);
        let tx = gx - ix as f32;
        let tz = gz - iz as f32;

        let p00 = self.point(ix, iz);
        let p10 = self.point(ix + 1, iz);
        let p01 = self.point(ix, iz + 1);
        let p11 = self.point(ix + 1, iz + 1);

        let h0 = p00.y + (p10.y - p00.y) * tx;
        let h1 = p01.y + (p11.y - p01.y) * tx;
        let height = h0 + (h1 - h0) * tz;

        let edge_x = p10 - p00;
        let edge_z = p01 - p00;
        let mut normal = edge_z.cross(edge_x).normalize_or_zero();
        if normal == Vec3::ZERO {
            normal = Vec3::Y;
        } else if normal.y < 0.0 {
            normal = -normal;
        }

        Some(TerrainSample { height, normal })
    }
}

/// Layered noise height in [0, 1] at world (x, z)
fn normalized_height(params: &TerrainParams, noise: &NoiseGenerator, x: f32, z: f32) -> f32 {
    let f = params.base_frequency as f64;
    let (x, z) = (x as f64, z as f64);
    let [w_base, w_detail, w_micro, w_ridge] = params.octave_weights;

    let base = noise.sample_2d(x * f, z * f);
    let detail = noise.sample_2d(
        x * f * DETAIL_OCTAVE + DETAIL_OFFSET,
        z * f * DETAIL_OCTAVE + DETAIL_OFFSET,
    );
    let micro = noise.sample_2d(
        x * f * MICRO_OCTAVE + MICRO_OFFSET,
        z * f * MICRO_OCTAVE + MICRO_OFFSET,
    );
    // Ridge term folded back into [0, 1]
    let ridge = (base - 0.5).abs() * 2.0;

    (base * w_base + detail * w_detail + micro * w_micro + ridge * w_ridge).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> TerrainParams {
        TerrainParams {
            resolution: 16,
            ..TerrainParams::default()
        }
    }

    #[test]
    fn test_grid_creation() {
        let params = small_params();
        let grid = TerrainGrid::generate(&params, &NoiseGenerator::new(1), 100.0);

        // Check point count: resolution^2
        assert_eq!(grid.cells.len(), params.resolution.pow(2));

        // Check triangle count: (resolution - 1)^2 * 2 triangles * 3 indices
        assert_eq!(grid.indices.len(), (params.resolution - 1).pow(2) * 6);
    }

    #[test]
    fn test_heights_within_half_terrain_height() {
        let grid = TerrainGrid::generate(&small_params(), &NoiseGenerator::new(9), 120.0);
        for cell in &grid.cells {
            assert!(cell.position.y.abs() <= 60.0 + 1e-3);
        }
    }

    #[test]
    fn test_sample_matches_grid_points() {
        let grid = TerrainGrid::generate(&small_params(), &NoiseGenerator::new(3), 80.0);
        let cell = grid.cells[5 * grid.resolution() + 7];
        let sample = grid.sample(cell.position.x, cell.position.z).unwrap();
        assert!((sample.height - cell.position.y).abs() < 1e-3);
        assert!(sample.normal.y > 0.0);
        assert!((sample.normal.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_sample_outside_footprint_is_none() {
        let grid = TerrainGrid::generate(&small_params(), &NoiseGenerator::new(3), 80.0);
        let edge = grid.half_size() + 1.0;
        assert!(grid.sample(edge, 0.0).is_none());
        assert!(grid.sample(0.0, -edge).is_none());
        assert!(grid.sample(f32::NAN, 0.0).is_none());
        assert!(grid.sample(grid.half_size(), grid.half_size()).is_some());
    }

    #[test]
    fn test_flat_terrain_normal_is_up() {
        let grid = TerrainGrid::generate(&small_params(), &NoiseGenerator::new(3), 0.0);
        let sample = grid.sample(10.0, -20.0).unwrap();
        assert_eq!(sample.height, 0.0);
        assert!((sample.normal - Vec3::Y).length() < 1e-6);
    }
}
