//! Hazard and opportunity markers on the globe surface.
//!
//! Markers are rebuilt wholesale whenever their snapshot changes, matching
//! how the snapshots themselves are replaced rather than patched.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::events::HazardEvents;
use crate::geo::project;
use crate::opportunity::OpportunityStream;
use crate::render::globe::GlobeRoot;
use crate::selection::{PickTarget, Pickable};
use crate::types::{ATMOSPHERE_RADIUS, OPPORTUNITY_RADIUS, Rgb, SceneClock};

/// Rendered radius of a hazard marker.
pub const EVENT_MARKER_SIZE: f32 = 0.035;

/// Rendered radius of an opportunity marker.
pub const OPPORTUNITY_MARKER_SIZE: f32 = 0.04;

/// Colour of opportunity markers.
pub const OPPORTUNITY_COLOR: Rgb = Rgb::hex(0x3cffa5);

/// Relative scale swing of the hazard marker pulse.
pub const EVENT_PULSE_SWING: f32 = 0.08;

/// Marks a hazard marker entity.
#[derive(Component)]
pub struct HazardMarker;

/// Marks an opportunity marker entity.
#[derive(Component)]
pub struct OpportunityPin;

/// Scale of hazard markers at scene time `t`.
pub fn event_pulse(t: f32) -> f32 {
    1.0 + (t * 2.0).sin() * EVENT_PULSE_SWING
}

/// Shared marker meshes plus one unlit material per colour.
#[derive(Resource, Default)]
pub struct MarkerAssets {
    event_mesh: Option<Handle<Mesh>>,
    opportunity_mesh: Option<Handle<Mesh>>,
    materials: HashMap<Rgb, Handle<StandardMaterial>>,
}

impl MarkerAssets {
    fn material(
        &mut self,
        color: Rgb,
        materials: &mut Assets<StandardMaterial>,
    ) -> Handle<StandardMaterial> {
        self.materials
            .entry(color)
            .or_insert_with(|| {
                materials.add(StandardMaterial {
                    base_color: color.to_color(),
                    unlit: true,
                    ..default()
                })
            })
            .clone()
    }

    fn event_mesh(&mut self, meshes: &mut Assets<Mesh>) -> Handle<Mesh> {
        self.event_mesh
            .get_or_insert_with(|| meshes.add(Sphere::new(EVENT_MARKER_SIZE).mesh().uv(8, 8)))
            .clone()
    }

    fn opportunity_mesh(&mut self, meshes: &mut Assets<Mesh>) -> Handle<Mesh> {
        self.opportunity_mesh
            .get_or_insert_with(|| {
                meshes.add(Sphere::new(OPPORTUNITY_MARKER_SIZE).mesh().uv(12, 8))
            })
            .clone()
    }
}

/// Plugin rebuilding and animating the surface markers.
pub struct MarkerPlugin;

impl Plugin for MarkerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MarkerAssets>();
    }
}

/// Replace the hazard markers after a new snapshot is published.
pub fn rebuild_hazard_markers(
    mut commands: Commands,
    hazards: Res<HazardEvents>,
    globe: Query<Entity, With<GlobeRoot>>,
    existing: Query<Entity, With<HazardMarker>>,
    mut assets: ResMut<MarkerAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !hazards.is_changed() {
        return;
    }
    let Ok(root) = globe.single() else {
        return;
    };

    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let mesh = assets.event_mesh(&mut meshes);
    for event in &hazards.events {
        let material = assets.material(event.color, &mut materials);
        commands.spawn((
            HazardMarker,
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material),
            Transform::from_translation(project(event.geo, ATMOSPHERE_RADIUS)),
            Pickable::new(PickTarget::Event(event.clone()), EVENT_MARKER_SIZE),
            ChildOf(root),
        ));
    }

    debug!("Rebuilt {} hazard markers", hazards.events.len());
}

/// Replace the opportunity markers after the window changes.
pub fn rebuild_opportunity_markers(
    mut commands: Commands,
    stream: Res<OpportunityStream>,
    globe: Query<Entity, With<GlobeRoot>>,
    existing: Query<Entity, With<OpportunityPin>>,
    mut assets: ResMut<MarkerAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !stream.is_changed() {
        return;
    }
    let Ok(root) = globe.single() else {
        return;
    };

    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let mesh = assets.opportunity_mesh(&mut meshes);
    let material = assets.material(OPPORTUNITY_COLOR, &mut materials);
    for marker in stream.visible() {
        commands.spawn((
            OpportunityPin,
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(project(marker.geo, OPPORTUNITY_RADIUS)),
            Pickable::new(PickTarget::Opportunity(marker.clone()), OPPORTUNITY_MARKER_SIZE),
            ChildOf(root),
        ));
    }
}

/// Breathe the hazard markers.
pub fn pulse_hazard_markers(
    clock: Res<SceneClock>,
    mut markers: Query<&mut Transform, With<HazardMarker>>,
) {
    let scale = Vec3::splat(event_pulse(clock.animation_time()));
    for mut transform in &mut markers {
        transform.scale = scale;
    }
}
