//! Simulation controller: owns every subsystem and runs the per-frame
//! pipeline controls -> smoothing -> mapping -> terrain/particles/
//! connections/camera.

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::CameraRig;
use crate::connections::ConnectionGraph;
use crate::control::{smoother, ControlSurface, GestureSmoother};
use crate::error::ConfigError;
use crate::mapping::{map_controls, MappedParams};
use crate::noise::NoiseGenerator;
use crate::params::{RenderConfig, SimulationConfig};
use crate::particles::ParticleSystem;
use crate::render::FrameView;
use crate::terrain::TerrainSystem;

/// Whether ticks advance the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
}

/// Externally triggered mode transitions (keyboard, pointer, viewport)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    ToggleSettings,
    Reset,
    TogglePause,
    TogglePointerControl,
    ToggleSliders,
    ToggleAutoRotate,
    PointerDown,
    PointerUp,
    PointerDrag { dx: f32 },
    Scroll { delta: f32 },
    Resize { width: u32, height: u32 },
}

/// Presentation flags the core keeps for the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewFlags {
    pub settings_visible: bool,
    pub sliders_visible: bool,
}

/// Summary of one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub population: usize,
    pub spawned: usize,
    pub removed: usize,
    pub topped_up: usize,
    pub reinitialized: bool,
    pub terrain_regenerated: bool,
    pub connections: usize,
}

/// Complete simulation state with a single owner
pub struct Simulation {
    pub controls: ControlSurface,
    pub terrain: TerrainSystem,
    pub particles: ParticleSystem,
    pub connections: ConnectionGraph,
    pub camera: CameraRig,
    pub render_config: RenderConfig,
    config: SimulationConfig,
    smoother: GestureSmoother,
    noise: NoiseGenerator,
    rng: StdRng,
    mapped: MappedParams,
    run_state: RunState,
    flags: ViewFlags,
    tick: u64,
    skipped_frames: u64,
    /// Connection density the current graph was built with
    built_density: f32,
}

impl Simulation {
    /// Build a simulation from a validated configuration
    pub fn new(config: SimulationConfig, controller_detected: bool) -> Result<Self, ConfigError> {
        config.validate()?;

        let controls = ControlSurface::new(&config.control, controller_detected);
        let smoother = GestureSmoother::new(config.control.smoothing_factor);
        let mapped = map_controls(&controls.smoothed_values(), &config.ranges);

        let noise = NoiseGenerator::new(config.seed as u32);
        let terrain = TerrainSystem::new(config.terrain.clone(), noise.clone(), mapped.terrain_height);
        let particles = ParticleSystem::new(config.particles.clone(), config.physics.clone());
        let connections = ConnectionGraph::new(config.connections.clone());
        let camera = CameraRig::new(config.camera.clone());

        let mut sim = Self {
            controls,
            terrain,
            particles,
            connections,
            camera,
            render_config: config.render.clone(),
            smoother,
            noise,
            rng: StdRng::seed_from_u64(config.seed),
            mapped,
            run_state: RunState::Running,
            flags: ViewFlags {
                settings_visible: false,
                sliders_visible: true,
            },
            tick: 0,
            skipped_frames: 0,
            built_density: 0.0,
            config,
        };
        sim.reset();
        Ok(sim)
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn flags(&self) -> ViewFlags {
        self.flags
    }

    /// Parameters mapped on the most recent tick
    pub fn mapped(&self) -> &MappedParams {
        &self.mapped
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn skipped_frames(&self) -> u64 {
        self.skipped_frames
    }

    /// Rebuild terrain and particles from the current controls and resume
    pub fn reset(&mut self) {
        smoother::sync_discrete(self.controls.channels_mut());
        self.mapped = map_controls(&self.controls.smoothed_values(), &self.config.ranges);

        self.terrain.regenerate(self.mapped.terrain_height);
        self.particles.reinitialize(
            self.mapped.particle_density,
            self.mapped.size_scale,
            &self.terrain,
            &self.noise,
            &mut self.rng,
        );
        self.rebuild_connections();
        self.run_state = RunState::Running;
        info!(
            "Simulation reset: {} particles, terrain height {:.1}",
            self.particles.len(),
            self.terrain.baked_height()
        );
    }

    /// Apply one externally triggered command
    pub fn apply_command(&mut self, command: Command) {
        match command {
            Command::ToggleSettings => {
                self.flags.settings_visible = !self.flags.settings_visible;
            }
            Command::Reset => self.reset(),
            Command::TogglePause => {
                self.run_state = match self.run_state {
                    RunState::Running => RunState::Paused,
                    RunState::Paused => RunState::Running,
                };
                info!("Simulation {:?}", self.run_state);
            }
            Command::TogglePointerControl => {
                let enabled = self.camera.toggle_pointer_control();
                info!("Pointer camera control {}", on_off(enabled));
            }
            Command::ToggleSliders => {
                self.flags.sliders_visible = !self.flags.sliders_visible;
            }
            Command::ToggleAutoRotate => {
                let enabled = self.camera.toggle_auto_rotate();
                info!("Auto-rotate {}", on_off(enabled));
            }
            Command::PointerDown => self.camera.pointer_down(),
            Command::PointerUp => self.camera.pointer_up(),
            Command::PointerDrag { dx } => self.camera.pointer_drag(dx),
            Command::Scroll { delta } => self.camera.scroll(delta),
            Command::Resize { width, height } => {
                self.render_config.window_width = width.max(1);
                self.render_config.window_height = height.max(1);
            }
        }
    }

    /// Run one frame of the pipeline
    pub fn tick(&mut self) -> TickReport {
        if self.run_state == RunState::Paused {
            self.skipped_frames += 1;
            return self.report(TickReport::default());
        }

        self.smoother.apply(self.controls.channels_mut());
        self.mapped = map_controls(&self.controls.smoothed_values(), &self.config.ranges);
        let mapped = self.mapped;

        let mut report = TickReport {
            terrain_regenerated: self.terrain.update(mapped.terrain_height),
            ..TickReport::default()
        };

        let target = self
            .config
            .particles
            .density_scaled_max(mapped.particle_density);
        let mut graph_stale = false;
        if target != self.particles.target_max() {
            self.particles.reinitialize(
                mapped.particle_density,
                mapped.size_scale,
                &self.terrain,
                &self.noise,
                &mut self.rng,
            );
            report.reinitialized = true;
            graph_stale = true;
        }

        let batch = self
            .particles
            .tick(&mapped, &self.terrain, &self.noise, &mut self.rng, self.tick);
        report.spawned = batch.spawned;
        report.removed = batch.removed;
        report.topped_up = batch.topped_up;
        graph_stale |= batch.changed();

        if graph_stale || mapped.connection_density != self.built_density {
            self.rebuild_connections();
        }
        self.connections.apply(&mut self.particles.particles);

        self.camera.update(&mapped);

        self.tick += 1;
        self.report(report)
    }

    /// Rebuild the graph for the current population, or clear it at zero density
    fn rebuild_connections(&mut self) {
        let density = self.mapped.connection_density;
        if density <= 0.0 {
            self.connections.clear();
        } else {
            self.connections.rebuild(&self.particles.particles, density);
        }
        self.built_density = density;
    }

    fn report(&self, partial: TickReport) -> TickReport {
        TickReport {
            tick: self.tick,
            population: self.particles.len(),
            connections: self.connections.len(),
            ..partial
        }
    }

    /// Read-only view of everything the renderer draws
    pub fn frame(&self) -> FrameView<'_> {
        let (view_proj, eye) = self.camera.view_proj(&self.render_config);
        FrameView {
            particles: &self.particles.particles,
            terrain: &self.terrain.grid,
            connections: &self.connections.connections,
            camera: &self.camera.state,
            view_proj,
            eye,
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Channel;
    use crate::params::TerrainParams;

    fn simulation() -> Simulation {
        let config = SimulationConfig {
            seed: 3,
            terrain: TerrainParams {
                resolution: 24,
                ..TerrainParams::default()
            },
            ..SimulationConfig::default()
        };
        Simulation::new(config, false).unwrap()
    }

    #[test]
    fn test_pause_freezes_particles() {
        let mut sim = simulation();
        sim.apply_command(Command::TogglePause);
        assert_eq!(sim.run_state(), RunState::Paused);

        let before = sim.particles.particles.clone();
        sim.tick();
        sim.tick();
        assert_eq!(sim.particles.particles, before);
        assert_eq!(sim.skipped_frames(), 2);
        assert_eq!(sim.tick_count(), 0);

        sim.apply_command(Command::TogglePause);
        sim.tick();
        assert_eq!(sim.tick_count(), 1);
    }

    #[test]
    fn test_reset_resumes_running() {
        let mut sim = simulation();
        sim.apply_command(Command::TogglePause);
        sim.apply_command(Command::Reset);
        assert_eq!(sim.run_state(), RunState::Running);
        assert_eq!(
            sim.particles.len(),
            sim.particles.config.density_scaled_max(sim.mapped().particle_density)
        );
    }

    #[test]
    fn test_reset_does_not_step_gestures() {
        let mut sim = simulation();
        sim.controls.on_manual_input(Channel::TiltFront.index(), 1.0);
        sim.tick();
        let tilt = sim.controls.smoothed(Channel::TiltFront);
        assert!(tilt > 0.0 && tilt < 1.0);

        // Discrete knobs are picked up immediately, gestures stay put
        sim.controls
            .on_manual_input(Channel::ParticleDensity.index(), 1.0);
        sim.apply_command(Command::Reset);
        sim.apply_command(Command::Reset);
        assert_eq!(sim.controls.smoothed(Channel::TiltFront), tilt);
        assert_eq!(sim.particles.len(), 100);
    }

    #[test]
    fn test_view_toggles_and_resize() {
        let mut sim = simulation();
        let flags = sim.flags();
        sim.apply_command(Command::ToggleSettings);
        sim.apply_command(Command::ToggleSliders);
        assert_ne!(sim.flags().settings_visible, flags.settings_visible);
        assert_ne!(sim.flags().sliders_visible, flags.sliders_visible);

        sim.apply_command(Command::Resize {
            width: 800,
            height: 600,
        });
        sim.apply_command(Command::Resize {
            width: 800,
            height: 600,
        });
        assert_eq!(sim.render_config.window_width, 800);
        assert_eq!(sim.render_config.window_height, 600);

        let enabled = sim.camera.state.pointer_control_enabled;
        sim.apply_command(Command::TogglePointerControl);
        assert_ne!(sim.camera.state.pointer_control_enabled, enabled);
    }

    #[test]
    fn test_density_change_reinitializes_population() {
        let mut sim = simulation();
        sim.controls
            .on_manual_input(Channel::ParticleDensity.index(), 1.0);
        let report = sim.tick();
        assert!(report.reinitialized);
        // floor(100 * 1.0), then at most spawn/removal churn within the tick
        assert!(report.population <= 100);
        assert!(report.population >= sim.particles.config.min_particles);
    }

    #[test]
    fn test_zero_connection_density_clears_graph() {
        let mut sim = simulation();
        sim.controls
            .on_manual_input(Channel::ConnectionDensity.index(), 0.0);
        sim.tick();
        assert!(sim.connections.is_empty());

        sim.controls
            .on_manual_input(Channel::ConnectionDensity.index(), 1.0);
        sim.tick();
        assert!(!sim.connections.is_empty());
        assert!(sim.connections.is_valid_for(sim.particles.len()));
    }

    #[test]
    fn test_terrain_height_change_regenerates() {
        let mut sim = simulation();
        sim.controls
            .on_manual_input(Channel::TerrainHeight.index(), 0.51);
        assert!(!sim.tick().terrain_regenerated);
        sim.controls
            .on_manual_input(Channel::TerrainHeight.index(), 1.0);
        assert!(sim.tick().terrain_regenerated);
        assert_eq!(sim.terrain.baked_height(), 200.0);
    }
}
