//! LEO Monitor - Orbital Scene & Event Simulation Engine
//!
//! A library crate providing the globe scene: geographic projection,
//! hazard feed aggregation, procedural orbital swarms, risk halos and the
//! opportunity stream, as Bevy plugins.

pub mod camera;
pub mod catalog;
pub mod config;
pub mod events;
pub mod geo;
pub mod opportunity;
pub mod render;
pub mod risk;
pub mod scene;
pub mod selection;
pub mod swarm;
pub mod time;
pub mod types;
pub mod ui;

#[cfg(test)]
mod proptest_scene;

pub use scene::{ScenePlugin, SceneSet, SimulationPlugin};
