//! Knobfield library - knob-driven particle field over procedural terrain

pub mod camera;
pub mod cli;
pub mod connections;
pub mod control;
pub mod error;
pub mod mapping;
pub mod noise;
pub mod params;
pub mod particles;
pub mod render;
pub mod simulation;
pub mod terrain;
