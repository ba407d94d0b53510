//! Parameter mapper: smoothed channel values to physical parameters.
//!
//! Pure and total. Inputs are clamped to [0, 1] before mapping so no
//! output can leave its configured range.

use crate::control::{Channel, NUM_CHANNELS};
use crate::params::MappingRanges;

/// Physical parameters derived from one control snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappedParams {
    pub size_scale: f32,
    pub speed: f32,
    pub gravity: f32,
    pub turbulence: f32,
    pub randomness: f32,
    pub particle_density: f32,
    pub connection_density: f32,
    pub terrain_height: f32,

    /// Pitch from the front/back tilt pair (radians)
    pub tilt: f32,

    /// Roll from the left/right lift pair (radians)
    pub lift: f32,

    /// Requested yaw detent direction: -1, 0 or +1
    pub rotate_step: i32,

    /// Extra central gravity from the tilt pair
    pub gesture_gravity: f32,

    /// Tangential force around the vertical axis from the rotate pair
    pub vortex_strength: f32,
}

/// Linear map of `t` in [0, 1] onto `range`
pub fn lerp_range(t: f32, range: (f32, f32)) -> f32 {
    let t = clamp_unit(t);
    range.0 + (range.1 - range.0) * t
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Map a full control snapshot
pub fn map_controls(values: &[f32; NUM_CHANNELS], ranges: &MappingRanges) -> MappedParams {
    let v = |c: Channel| clamp_unit(values[c.index()]);

    let tilt_diff = v(Channel::TiltFront) - v(Channel::TiltBack);
    let lift_diff = v(Channel::LiftRight) - v(Channel::LiftLeft);
    let rotate_diff = v(Channel::RotateRight) - v(Channel::RotateLeft);

    // Detent: only a deflection past the deadzone requests a step
    let rotate_step = if rotate_diff.abs() > ranges.rotate_deadzone {
        rotate_diff.signum() as i32
    } else {
        0
    };

    MappedParams {
        size_scale: lerp_range(v(Channel::Size), ranges.size_scale),
        speed: lerp_range(v(Channel::Speed), ranges.speed),
        gravity: lerp_range(v(Channel::Gravity), ranges.gravity),
        turbulence: lerp_range(v(Channel::Turbulence), ranges.turbulence),
        randomness: lerp_range(v(Channel::Randomness), ranges.randomness),
        particle_density: lerp_range(v(Channel::ParticleDensity), ranges.particle_density),
        connection_density: lerp_range(v(Channel::ConnectionDensity), ranges.connection_density),
        terrain_height: lerp_range(v(Channel::TerrainHeight), ranges.terrain_height),
        tilt: tilt_diff * ranges.max_tilt_rad,
        lift: lift_diff * ranges.max_tilt_rad,
        rotate_step,
        gesture_gravity: (v(Channel::TiltFront) + v(Channel::TiltBack)) * 0.5
            * ranges.gesture_gravity_scale,
        vortex_strength: (v(Channel::RotateLeft) + v(Channel::RotateRight)) * 0.5
            * ranges.vortex_scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    fn within(value: f32, range: (f32, f32)) -> bool {
        value >= range.0.min(range.1) - 1e-6 && value <= range.0.max(range.1) + 1e-6
    }

    #[test]
    fn test_outputs_stay_in_range() {
        let ranges = MappingRanges::default();
        for step in 0..=20 {
            let t = step as f32 / 20.0;
            let p = map_controls(&[t; NUM_CHANNELS], &ranges);
            assert!(within(p.size_scale, ranges.size_scale));
            assert!(within(p.speed, ranges.speed));
            assert!(within(p.gravity, ranges.gravity));
            assert!(within(p.turbulence, ranges.turbulence));
            assert!(within(p.randomness, ranges.randomness));
            assert!(within(p.particle_density, ranges.particle_density));
            assert!(within(p.connection_density, ranges.connection_density));
            assert!(within(p.terrain_height, ranges.terrain_height));
            assert!(within(p.gesture_gravity, (0.0, ranges.gesture_gravity_scale)));
            assert!(within(p.vortex_strength, (0.0, ranges.vortex_scale)));
        }
    }

    #[test]
    fn test_out_of_range_inputs_do_not_extrapolate() {
        let ranges = MappingRanges::default();
        let p = map_controls(&[5.0; NUM_CHANNELS], &ranges);
        assert_eq!(p.terrain_height, 200.0);
        let p = map_controls(&[-5.0; NUM_CHANNELS], &ranges);
        assert_eq!(p.terrain_height, 20.0);
        let p = map_controls(&[f32::NAN; NUM_CHANNELS], &ranges);
        assert_eq!(p.speed, 0.1);
    }

    #[test]
    fn test_tilt_and_lift_span_quarter_pi() {
        let ranges = MappingRanges::default();
        let mut values = [0.0; NUM_CHANNELS];
        values[Channel::TiltFront.index()] = 1.0;
        values[Channel::LiftLeft.index()] = 1.0;
        let p = map_controls(&values, &ranges);
        assert!((p.tilt - FRAC_PI_4).abs() < 1e-6);
        assert!((p.lift + FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_detent_deadzone() {
        let ranges = MappingRanges::default();
        let mut values = [0.0; NUM_CHANNELS];
        values[Channel::RotateRight.index()] = 0.5;
        assert_eq!(map_controls(&values, &ranges).rotate_step, 0);
        values[Channel::RotateRight.index()] = 0.8;
        assert_eq!(map_controls(&values, &ranges).rotate_step, 1);
        values[Channel::RotateLeft.index()] = 0.8;
        values[Channel::RotateRight.index()] = 0.1;
        assert_eq!(map_controls(&values, &ranges).rotate_step, -1);
    }
}
