//! Control surface adapter: 14 normalised channels fed by hardware
//! controller events or manual slider input.
//!
//! The adapter only writes `raw_value`; smoothing runs once per tick in
//! [`smoother`]. Every accepted write emits a [`ParameterChanged`] event to
//! the subscribed listeners.

pub mod smoother;

use log::{info, trace, warn};

use crate::error::ControlError;
use crate::params::ControlConfig;

pub use smoother::GestureSmoother;

/// Number of control channels
pub const NUM_CHANNELS: usize = 14;

/// Channels below this index pass through unsmoothed
pub const FIRST_GESTURE_CHANNEL: usize = 8;

/// Highest valid controller id
pub const MAX_CONTROLLER_ID: u8 = 127;

/// Named channel slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Size = 0,
    Speed = 1,
    Gravity = 2,
    Turbulence = 3,
    Randomness = 4,
    ParticleDensity = 5,
    ConnectionDensity = 6,
    TerrainHeight = 7,
    TiltFront = 8,
    TiltBack = 9,
    LiftLeft = 10,
    LiftRight = 11,
    RotateLeft = 12,
    RotateRight = 13,
}

impl Channel {
    pub const ALL: [Channel; NUM_CHANNELS] = [
        Channel::Size,
        Channel::Speed,
        Channel::Gravity,
        Channel::Turbulence,
        Channel::Randomness,
        Channel::ParticleDensity,
        Channel::ConnectionDensity,
        Channel::TerrainHeight,
        Channel::TiltFront,
        Channel::TiltBack,
        Channel::LiftLeft,
        Channel::LiftRight,
        Channel::RotateLeft,
        Channel::RotateRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Size => "size",
            Channel::Speed => "speed",
            Channel::Gravity => "gravity",
            Channel::Turbulence => "turbulence",
            Channel::Randomness => "randomness",
            Channel::ParticleDensity => "particle_density",
            Channel::ConnectionDensity => "connection_density",
            Channel::TerrainHeight => "terrain_height",
            Channel::TiltFront => "tilt_front",
            Channel::TiltBack => "tilt_back",
            Channel::LiftLeft => "lift_left",
            Channel::LiftRight => "lift_right",
            Channel::RotateLeft => "rotate_left",
            Channel::RotateRight => "rotate_right",
        }
    }

    /// Gesture channels are smoothed, discrete channels are not
    pub fn is_gesture(self) -> bool {
        self.index() >= FIRST_GESTURE_CHANNEL
    }
}

/// Where control values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Hardware controller events routed through the binding table
    Controller,
    /// On-screen slider fallback addressed by channel index
    Manual,
}

/// Per-channel control state
#[derive(Debug, Clone)]
pub struct ControlState {
    pub raw_value: f32,
    pub smoothed_value: f32,
    pub cc_binding: u8,
    pub name: &'static str,
}

/// Notification emitted whenever a channel's raw value is written
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterChanged {
    pub channel: usize,
    pub value: f32,
}

type Listener = Box<dyn FnMut(&ParameterChanged)>;

/// Binding table plus the 14 channel values
pub struct ControlSurface {
    channels: [ControlState; NUM_CHANNELS],
    listeners: Vec<Listener>,
    mode: InputMode,
}

impl ControlSurface {
    /// Create a surface with default bindings and initial values
    pub fn new(config: &ControlConfig, controller_detected: bool) -> Self {
        let channels = std::array::from_fn(|i| {
            let channel = Channel::ALL[i];
            let initial = if channel.is_gesture() {
                config.gesture_default
            } else {
                config.discrete_default
            }
            .clamp(0.0, 1.0);
            ControlState {
                raw_value: initial,
                smoothed_value: initial,
                cc_binding: config.first_controller_id.saturating_add(i as u8),
                name: channel.name(),
            }
        });

        let mode = if controller_detected {
            info!("Control surface detected, listening for controller events");
            InputMode::Controller
        } else {
            info!("No control surface detected, using manual input");
            InputMode::Manual
        };

        Self {
            channels,
            listeners: Vec::new(),
            mode,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn channels(&self) -> &[ControlState; NUM_CHANNELS] {
        &self.channels
    }

    pub(crate) fn channels_mut(&mut self) -> &mut [ControlState; NUM_CHANNELS] {
        &mut self.channels
    }

    pub fn raw(&self, channel: Channel) -> f32 {
        self.channels[channel.index()].raw_value
    }

    pub fn smoothed(&self, channel: Channel) -> f32 {
        self.channels[channel.index()].smoothed_value
    }

    /// Snapshot of all smoothed values, indexed by channel
    pub fn smoothed_values(&self) -> [f32; NUM_CHANNELS] {
        std::array::from_fn(|i| self.channels[i].smoothed_value)
    }

    /// Register a presentation-layer listener for parameter changes
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&ParameterChanged) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Bind a channel to a controller id
    ///
    /// Rejected requests leave the previous binding untouched.
    pub fn bind_channel(&mut self, index: usize, controller_id: u32) -> Result<(), ControlError> {
        if index >= NUM_CHANNELS {
            return Err(ControlError::ChannelOutOfRange(index));
        }
        if controller_id > MAX_CONTROLLER_ID as u32 {
            return Err(ControlError::ControllerIdOutOfRange(controller_id));
        }
        let controller_id = controller_id as u8;
        if let Some(other) = self.channel_for_controller(controller_id) {
            if other != index {
                return Err(ControlError::DuplicateBinding {
                    controller_id,
                    channel: other,
                });
            }
        }
        let state = &mut self.channels[index];
        info!(
            "Bound channel {} ({}) to controller {} (was {})",
            index, state.name, controller_id, state.cc_binding
        );
        state.cc_binding = controller_id;
        Ok(())
    }

    /// Bind a channel from user-entered text
    pub fn bind_channel_str(&mut self, index: usize, text: &str) -> Result<(), ControlError> {
        let controller_id = text
            .trim()
            .parse::<u32>()
            .map_err(|_| ControlError::InvalidControllerId(text.to_string()))?;
        self.bind_channel(index, controller_id).inspect_err(|e| {
            warn!("Rejected binding for channel {}: {}", index, e);
        })
    }

    fn channel_for_controller(&self, controller_id: u8) -> Option<usize> {
        self.channels
            .iter()
            .position(|c| c.cc_binding == controller_id)
    }

    /// Handle a controller event; unbound ids are ignored
    pub fn on_control_event(&mut self, controller_id: u8, value: f32) -> Option<ParameterChanged> {
        let Some(index) = self.channel_for_controller(controller_id) else {
            trace!("Ignoring event from unbound controller {}", controller_id);
            return None;
        };
        self.write(index, value)
    }

    /// Handle a manual slider change addressed by channel index
    pub fn on_manual_input(&mut self, index: usize, value: f32) -> Option<ParameterChanged> {
        if index >= NUM_CHANNELS {
            trace!("Ignoring manual input for channel {}", index);
            return None;
        }
        self.write(index, value)
    }

    fn write(&mut self, index: usize, value: f32) -> Option<ParameterChanged> {
        if !value.is_finite() {
            trace!("Ignoring non-finite value for channel {}", index);
            return None;
        }
        let value = value.clamp(0.0, 1.0);
        self.channels[index].raw_value = value;

        let event = ParameterChanged {
            channel: index,
            value,
        };
        for listener in &mut self.listeners {
            listener(&event);
        }
        Some(event)
    }
}

impl std::fmt::Debug for ControlSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlSurface")
            .field("channels", &self.channels)
            .field("listeners", &self.listeners.len())
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn surface() -> ControlSurface {
        ControlSurface::new(&ControlConfig::default(), true)
    }

    #[test]
    fn test_default_bindings_are_sequential() {
        let surface = surface();
        for (i, state) in surface.channels().iter().enumerate() {
            assert_eq!(state.cc_binding as usize, 34 + i);
        }
    }

    #[test]
    fn test_event_sets_raw_and_notifies() {
        let mut surface = surface();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        surface.subscribe(move |e| sink.borrow_mut().push(*e));

        let event = surface.on_control_event(36, 0.9);
        assert_eq!(
            event,
            Some(ParameterChanged {
                channel: 2,
                value: 0.9
            })
        );
        assert_eq!(surface.raw(Channel::Gravity), 0.9);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_listeners_notified_in_subscription_order() {
        let mut surface = surface();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in 0..3 {
            let sink = Rc::clone(&log);
            surface.subscribe(move |e| sink.borrow_mut().push((tag, e.channel)));
        }

        surface.on_manual_input(Channel::Speed.index(), 0.4);
        surface.on_control_event(47, 0.6);

        assert_eq!(
            *log.borrow(),
            vec![(0, 1), (1, 1), (2, 1), (0, 13), (1, 13), (2, 13)]
        );
    }

    #[test]
    fn test_unbound_controller_ignored() {
        let mut surface = surface();
        let before = surface.smoothed_values();
        assert_eq!(surface.on_control_event(5, 1.0), None);
        assert_eq!(surface.smoothed_values(), before);
    }

    #[test]
    fn test_values_clamped_and_nan_rejected() {
        let mut surface = surface();
        surface.on_manual_input(0, 3.0);
        assert_eq!(surface.raw(Channel::Size), 1.0);
        surface.on_manual_input(0, -1.0);
        assert_eq!(surface.raw(Channel::Size), 0.0);
        assert_eq!(surface.on_manual_input(0, f32::NAN), None);
        assert_eq!(surface.raw(Channel::Size), 0.0);
    }

    #[test]
    fn test_rebinding_at_runtime() {
        let mut surface = surface();
        surface.bind_channel(0, 100).unwrap();
        assert_eq!(surface.on_control_event(34, 0.2), None);
        assert!(surface.on_control_event(100, 0.2).is_some());
        assert_eq!(surface.raw(Channel::Size), 0.2);
    }

    #[test]
    fn test_rejected_bindings_keep_previous() {
        let mut surface = surface();
        assert_eq!(
            surface.bind_channel_str(3, "abc"),
            Err(ControlError::InvalidControllerId("abc".to_string()))
        );
        assert_eq!(
            surface.bind_channel(3, 200),
            Err(ControlError::ControllerIdOutOfRange(200))
        );
        assert_eq!(
            surface.bind_channel(3, 34),
            Err(ControlError::DuplicateBinding {
                controller_id: 34,
                channel: 0
            })
        );
        assert_eq!(
            surface.bind_channel(14, 1),
            Err(ControlError::ChannelOutOfRange(14))
        );
        assert_eq!(surface.channels()[3].cc_binding, 37);
        assert!(surface.bind_channel_str(3, " 90 ").is_ok());
        assert_eq!(surface.channels()[3].cc_binding, 90);
    }

    #[test]
    fn test_manual_mode_without_controller() {
        let surface = ControlSurface::new(&ControlConfig::default(), false);
        assert_eq!(surface.mode(), InputMode::Manual);
    }
}
