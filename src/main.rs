//! Knobfield - a particle field played like an instrument
//!
//! Fourteen knobs and gesture pads steer gravity, turbulence, density and
//! the camera while particles bounce over a procedural landscape. This
//! binary runs the simulation headless and logs what a renderer would draw.

use clap::Parser;
use log::{error, info, warn};

use knobfield::cli::Args;
use knobfield::render::{FrameView, Renderer};
use knobfield::simulation::Simulation;

/// Renderer that summarises frames to the log
struct LogRenderer {
    every: u64,
    frames: u64,
}

impl Renderer for LogRenderer {
    fn draw(&mut self, frame: &FrameView<'_>) {
        self.frames += 1;
        if self.every == 0 || self.frames % self.every != 0 {
            return;
        }
        let instances = frame.particle_instances();
        let lines = frame.line_vertices();
        let mean_height = if instances.is_empty() {
            0.0
        } else {
            instances.iter().map(|p| p.position[1]).sum::<f32>() / instances.len() as f32
        };
        info!(
            "Frame {}: {} particles (mean y {:.1}), {} line segments, yaw {:.2}, zoom {:.0}",
            self.frames,
            instances.len(),
            mean_height,
            lines.len() / 2,
            frame.camera.yaw,
            frame.camera.zoom_radius
        );
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("Knobfield - seed {}, {} ticks", args.seed, args.ticks);

    let mut sim = match Simulation::new(args.simulation_config(), args.controller) {
        Ok(sim) => sim,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    for (channel, text) in &args.bind {
        if let Err(e) = sim.controls.bind_channel_str(channel.index(), text) {
            warn!("Keeping default binding for {}: {}", channel.name(), e);
        }
    }
    for &(channel, value) in &args.set {
        sim.controls.on_manual_input(channel.index(), value);
    }

    let mut renderer = LogRenderer {
        every: args.report_every,
        frames: 0,
    };
    let mut regenerations = 0;
    for _ in 0..args.ticks {
        let report = sim.tick();
        if report.terrain_regenerated {
            regenerations += 1;
        }
        renderer.draw(&sim.frame());
    }

    info!(
        "Done: {} ticks, {} particles, {} connections, {} terrain regenerations",
        sim.tick_count(),
        sim.particles.len(),
        sim.connections.len(),
        regenerations
    );
}
