//! Scene composition and per-frame ordering.
//!
//! [`SimulationPlugin`] holds everything that runs without a GPU and is what
//! the headless tests mount; [`ScenePlugin`] adds the camera, meshes and UI
//! on top.

use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::camera::CameraPlugin;
use crate::catalog::CatalogPlugin;
use crate::config::SceneConfig;
use crate::events::EventsPlugin;
use crate::opportunity::{OpportunityPlugin, OpportunityStream, OpportunityTimer};
use crate::render::RenderPlugin;
use crate::risk::RiskPlugin;
use crate::selection::SelectionPlugin;
use crate::swarm::{SwarmPlugin, SwarmSpecs};
use crate::time::TimePlugin;
use crate::types::SceneClock;
use crate::ui::UiPlugin;

/// Default globe spin in radians per scene second.
pub const GLOBE_SPIN_SPEED: f32 = 0.04;

/// Frame phases, run in declaration order every `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneSet {
    /// Advance the scene clock.
    Clock,
    /// Advance swarms and halos.
    Simulate,
    /// Append opportunity markers.
    Stream,
    /// Request and collect hazard feed refreshes.
    Ingest,
    /// Sync scene entities from the current snapshots.
    Project,
    /// Route pointer clicks into the selection.
    Select,
}

/// Rotation of the globe group about the polar axis.
///
/// Hazard and opportunity markers ride on the globe; the swarms and halos do
/// not.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct GlobeSpin {
    /// Current angle in radians, kept in [0, 2π).
    pub angle: f32,
    /// Radians per scene second.
    pub speed: f32,
}

impl Default for GlobeSpin {
    fn default() -> Self {
        Self {
            angle: 0.0,
            speed: GLOBE_SPIN_SPEED,
        }
    }
}

impl GlobeSpin {
    pub fn advance(&mut self, delta: f32) {
        self.angle = (self.angle + self.speed * delta).rem_euclid(TAU);
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.angle)
    }

    /// Express a world-space point in the globe's rotating frame.
    pub fn to_globe_frame(&self, world: Vec3) -> Vec3 {
        self.rotation().inverse() * world
    }
}

/// Headless part of the scene.
///
/// If a [`SceneConfig`] is present when the plugin is added, it seeds the
/// swarm specs, the opportunity window and timer unless those resources were
/// inserted explicitly.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                SceneSet::Clock,
                SceneSet::Simulate,
                SceneSet::Stream,
                SceneSet::Ingest,
                SceneSet::Project,
                SceneSet::Select,
            )
                .chain(),
        );

        if let Some(config) = app.world().get_resource::<SceneConfig>().cloned() {
            let world = app.world_mut();
            if !world.contains_resource::<SwarmSpecs>() {
                world.insert_resource(config.swarm_specs());
            }
            if !world.contains_resource::<OpportunityStream>() {
                world.insert_resource(config.opportunity_stream());
            }
            if !world.contains_resource::<OpportunityTimer>() {
                world.insert_resource(config.opportunity_timer());
            }
            if !world.contains_resource::<GlobeSpin>() {
                world.insert_resource(GlobeSpin {
                    speed: config.globe_spin_speed,
                    ..default()
                });
            }
        }

        app.init_resource::<GlobeSpin>()
            .add_systems(Update, spin_globe.in_set(SceneSet::Simulate));

        app.add_plugins((
            TimePlugin,
            SwarmPlugin,
            RiskPlugin,
            OpportunityPlugin,
            EventsPlugin,
            CatalogPlugin,
            SelectionPlugin,
        ));
    }
}

/// Turn the globe by the scene delta.
pub fn spin_globe(mut spin: ResMut<GlobeSpin>, clock: Res<SceneClock>) {
    spin.advance(clock.delta);
}

/// The full interactive scene.
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((SimulationPlugin, CameraPlugin, RenderPlugin, UiPlugin));
    }
}
