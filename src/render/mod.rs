//! Rendering systems for the globe scene.
//!
//! This module turns the simulation resources into meshes: the globe, its
//! surface markers, the swarm bodies, the risk halos, and the background.

mod background;
pub mod globe;
pub mod halos;
pub mod highlight;
pub mod markers;
mod swarm;

use bevy::prelude::*;

use self::background::BackgroundPlugin;
use self::globe::{GlobePlugin, sync_globe_rotation};
use self::halos::{rebuild_halos, sync_halos};
use self::highlight::draw_selection_highlight;
use self::markers::{
    MarkerPlugin, pulse_hazard_markers, rebuild_hazard_markers, rebuild_opportunity_markers,
};
use self::swarm::attach_swarm_meshes;
use crate::scene::SceneSet;

pub use self::globe::GlobeRoot;
pub use self::markers::{HazardMarker, OpportunityPin};

/// Plugin aggregating all rendering functionality.
pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((GlobePlugin, MarkerPlugin, BackgroundPlugin))
            // Projection order within the frame:
            // 1. globe rotation, so parented markers inherit this frame's spin
            // 2. rebuild entities for changed snapshots
            // 3. per-frame animation of what exists
            .add_systems(
                Update,
                (
                    sync_globe_rotation,
                    (
                        rebuild_hazard_markers,
                        rebuild_opportunity_markers,
                        rebuild_halos,
                        attach_swarm_meshes,
                    ),
                    (pulse_hazard_markers, sync_halos),
                )
                    .chain()
                    .in_set(SceneSet::Project),
            )
            .add_systems(PostUpdate, draw_selection_highlight);
    }
}
