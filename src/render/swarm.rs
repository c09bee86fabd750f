//! Meshes for swarm bodies.

use bevy::prelude::*;

use crate::selection::{PickTarget, Pickable};
use crate::swarm::{SwarmMember, Swarms};

/// Give every newly spawned swarm entity a mesh, material and pick sphere.
///
/// One mesh and one material are shared per population.
pub fn attach_swarm_meshes(
    mut commands: Commands,
    swarms: Res<Swarms>,
    new_members: Query<(Entity, &SwarmMember), Without<Mesh3d>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut cache: Local<Vec<(Handle<Mesh>, Handle<StandardMaterial>)>>,
) {
    if new_members.is_empty() {
        return;
    }

    if cache.len() != swarms.populations.len() {
        *cache = swarms
            .populations
            .iter()
            .map(|swarm| {
                let mesh = meshes.add(Sphere::new(swarm.spec.marker_size).mesh().uv(6, 6));
                let material = materials.add(StandardMaterial {
                    base_color: swarm.spec.color.to_color(),
                    unlit: true,
                    ..default()
                });
                (mesh, material)
            })
            .collect();
    }

    for (entity, member) in &new_members {
        let (Some((mesh, material)), Some(swarm)) =
            (cache.get(member.swarm), swarms.populations.get(member.swarm))
        else {
            continue;
        };
        commands.entity(entity).insert((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Visibility::default(),
            Pickable::new(PickTarget::Body(*member), swarm.spec.marker_size),
        ));
    }
}
