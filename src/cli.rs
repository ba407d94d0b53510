//! Command-line argument parsing.

use clap::{Parser, ValueEnum};
use log::warn;

use crate::control::Channel;
use crate::params::{BoundaryPolicy, CollisionPolicy, ConnectionFloor, SimulationConfig};

/// Wall behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BoundaryArg {
    Bounce,
    Wrap,
}

/// Particle-particle contact behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CollisionArg {
    Repel,
    Despawn,
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "knobfield")]
#[command(about = "Knob-driven particle field over procedural terrain", long_about = None)]
pub struct Args {
    /// Seed for particle randomness and terrain noise
    #[arg(long, default_value_t = 7)]
    pub seed: u64,

    /// Number of frames to simulate
    #[arg(long, value_name = "TICKS", default_value_t = 600)]
    pub ticks: u64,

    /// What particles do at the walls
    #[arg(long, value_enum, default_value = "bounce")]
    pub boundary: BoundaryArg,

    /// What particles do when they touch each other
    #[arg(long, value_enum, default_value = "repel")]
    pub collision: CollisionArg,

    /// Keep at least one neighbour per particle at any positive connection density
    #[arg(long)]
    pub min_one_connection: bool,

    /// Start in controller mode instead of manual sliders
    #[arg(long)]
    pub controller: bool,

    /// Initial channel value, e.g. `--set particle_density=0.8` or `--set 5=0.8`
    #[arg(long = "set", value_name = "CHANNEL=VALUE", value_parser = parse_channel_value)]
    pub set: Vec<(Channel, f32)>,

    /// Controller id override, e.g. `--bind size=20`
    #[arg(long = "bind", value_name = "CHANNEL=ID", value_parser = parse_binding)]
    pub bind: Vec<(Channel, String)>,

    /// Log a frame summary every N ticks
    #[arg(long, value_name = "TICKS", default_value_t = 60)]
    pub report_every: u64,
}

impl Args {
    /// Build the simulation configuration from defaults plus overrides
    pub fn simulation_config(&self) -> SimulationConfig {
        let mut config = SimulationConfig {
            seed: self.seed,
            ..SimulationConfig::default()
        };
        config.particles.boundary_policy = match self.boundary {
            BoundaryArg::Bounce => BoundaryPolicy::Bounce,
            BoundaryArg::Wrap => BoundaryPolicy::Wrap,
        };
        config.particles.collision_policy = match self.collision {
            CollisionArg::Repel => CollisionPolicy::Repel,
            CollisionArg::Despawn => CollisionPolicy::Despawn,
        };
        if self.min_one_connection {
            config.connections.floor = ConnectionFloor::MinOne;
        }
        if self.seed > u64::from(u32::MAX) {
            warn!("Seed {} truncated to 32 bits for terrain noise", self.seed);
        }
        config
    }
}

/// Channel by snake_case name or numeric index
pub fn parse_channel(text: &str) -> Result<Channel, String> {
    let text = text.trim();
    if let Ok(index) = text.parse::<usize>() {
        return Channel::from_index(index).ok_or_else(|| format!("no channel with index {index}"));
    }
    Channel::ALL
        .iter()
        .copied()
        .find(|c| c.name() == text)
        .ok_or_else(|| format!("unknown channel '{text}'"))
}

fn split_assignment(text: &str) -> Result<(&str, &str), String> {
    text.split_once('=')
        .ok_or_else(|| format!("expected CHANNEL=VALUE, got '{text}'"))
}

fn parse_channel_value(text: &str) -> Result<(Channel, f32), String> {
    let (channel, value) = split_assignment(text)?;
    let value: f32 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value '{value}': {e}"))?;
    Ok((parse_channel(channel)?, value))
}

// The id stays text so the control surface reports malformed ids itself
fn parse_binding(text: &str) -> Result<(Channel, String), String> {
    let (channel, id) = split_assignment(text)?;
    Ok((parse_channel(channel)?, id.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_channel_by_name_and_index() {
        assert_eq!(parse_channel("terrain_height"), Ok(Channel::TerrainHeight));
        assert_eq!(parse_channel("13"), Ok(Channel::RotateRight));
        assert!(parse_channel("14").is_err());
        assert!(parse_channel("volume").is_err());
    }

    #[test]
    fn test_args_build_config() {
        let args = Args::parse_from([
            "knobfield",
            "--seed",
            "11",
            "--boundary",
            "wrap",
            "--collision",
            "despawn",
            "--min-one-connection",
            "--set",
            "speed=0.9",
            "--bind",
            "size=abc",
        ]);
        assert_eq!(args.set, vec![(Channel::Speed, 0.9)]);
        assert_eq!(args.bind, vec![(Channel::Size, "abc".to_string())]);

        let config = args.simulation_config();
        assert_eq!(config.seed, 11);
        assert_eq!(config.particles.boundary_policy, BoundaryPolicy::Wrap);
        assert_eq!(config.particles.collision_policy, CollisionPolicy::Despawn);
        assert_eq!(config.connections.floor, ConnectionFloor::MinOne);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_malformed_set_is_rejected() {
        assert!(Args::try_parse_from(["knobfield", "--set", "speed"]).is_err());
        assert!(Args::try_parse_from(["knobfield", "--set", "speed=fast"]).is_err());
    }
}
