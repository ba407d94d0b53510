//! Adaptive exponential smoothing for the gesture channels.

use super::{ControlState, FIRST_GESTURE_CHANNEL, NUM_CHANNELS};

/// Per-tick smoother for the control state
#[derive(Debug, Clone, Copy)]
pub struct GestureSmoother {
    factor: f32,
}

impl GestureSmoother {
    pub fn new(factor: f32) -> Self {
        Self { factor }
    }

    /// Effective rate for a raw value, capped at 1 so a step never overshoots
    pub fn rate(&self, raw: f32) -> f32 {
        (self.factor * (1.0 + raw * 2.0)).clamp(0.0, 1.0)
    }

    /// Advance one smoothed value toward its raw target
    pub fn step(&self, smoothed: f32, raw: f32) -> f32 {
        let next = smoothed + (raw - smoothed) * self.rate(raw);
        next.clamp(0.0, 1.0)
    }

    /// Smooth all channels: discrete pass through, gestures lag
    pub fn apply(&self, channels: &mut [ControlState; NUM_CHANNELS]) {
        sync_discrete(channels);
        for state in &mut channels[FIRST_GESTURE_CHANNEL..] {
            state.smoothed_value = self.step(state.smoothed_value, state.raw_value);
        }
    }
}

/// Copy raw to smoothed on the discrete channels only; gestures are left as is
pub fn sync_discrete(channels: &mut [ControlState; NUM_CHANNELS]) {
    for state in &mut channels[..FIRST_GESTURE_CHANNEL] {
        state.smoothed_value = state.raw_value;
    }
}

impl Default for GestureSmoother {
    fn default() -> Self {
        Self::new(0.15)
    }
}
