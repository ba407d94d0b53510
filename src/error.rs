//! Error types for the binding boundary and configuration validation.

use thiserror::Error;

/// Rejected control-surface binding requests.
///
/// A rejected request never changes the binding table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    #[error("channel index {0} out of range (expected < {})", crate::control::NUM_CHANNELS)]
    ChannelOutOfRange(usize),

    #[error("controller id {0} out of range (expected 0..=127)")]
    ControllerIdOutOfRange(u32),

    #[error("controller id '{0}' is not a number")]
    InvalidControllerId(String),

    #[error("controller id {controller_id} already bound to channel {channel}")]
    DuplicateBinding { controller_id: u8, channel: usize },
}

/// Invalid tuning parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be > 0, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("terrain resolution must be at least 2, got {0}")]
    ResolutionTooSmall(usize),

    #[error("min_particles ({min}) exceeds max_particles ({max})")]
    PopulationBounds { min: usize, max: usize },
}
