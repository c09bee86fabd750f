//! Translucent risk halo shells.

use bevy::prelude::*;

use crate::risk::RiskHalos;
use crate::types::Rgb;

/// A halo shell; `index` points into [`RiskHalos::visuals`].
#[derive(Component)]
pub struct HaloShell {
    pub index: usize,
}

/// Respawn the shells whenever a new zone snapshot is loaded.
pub fn rebuild_halos(
    mut commands: Commands,
    halos: Res<RiskHalos>,
    existing: Query<Entity, With<HaloShell>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut built: Local<Option<Vec<(f32, Rgb)>>>,
) {
    // Ticking touches the visuals every frame; only new radii or colours
    // need new entities.
    let shells: Vec<(f32, Rgb)> = halos.visuals().iter().map(|v| (v.radius, v.color)).collect();
    if built.as_ref() == Some(&shells) {
        return;
    }
    *built = Some(shells);

    for entity in &existing {
        commands.entity(entity).despawn();
    }

    for (index, visual) in halos.visuals().iter().enumerate() {
        let mesh = meshes.add(Sphere::new(visual.radius).mesh().uv(64, 32));
        let material = materials.add(StandardMaterial {
            base_color: visual.color.to_color().with_alpha(visual.opacity),
            alpha_mode: AlphaMode::Add,
            unlit: true,
            double_sided: true,
            cull_mode: None,
            ..default()
        });
        commands.spawn((
            HaloShell { index },
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_scale(Vec3::splat(visual.scale)),
        ));
    }

    if !halos.is_empty() {
        info!("Spawned {} risk halos", halos.len());
    }
}

/// Push the pulse state into the shells' transforms and materials.
pub fn sync_halos(
    halos: Res<RiskHalos>,
    mut shells: Query<(&HaloShell, &mut Transform, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (shell, mut transform, material) in &mut shells {
        let Some(visual) = halos.visuals().get(shell.index) else {
            continue;
        };
        transform.scale = Vec3::splat(visual.scale);
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = visual.color.to_color().with_alpha(visual.opacity);
        }
    }
}
