//! Background rendering for the globe scene.
//!
//! Provides starfield and lighting systems.

use bevy::prelude::*;
use rand::Rng;

/// Number of background stars.
pub const STAR_COUNT: usize = 600;

/// Stars sit on a shell between these radii, well outside the orbits.
const STAR_SHELL: (f32, f32) = (40.0, 60.0);

/// Plugin providing background visual elements.
pub struct BackgroundPlugin;

impl Plugin for BackgroundPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb(0.01, 0.02, 0.05)))
            .add_systems(Startup, (spawn_starfield, spawn_lighting));
    }
}

/// Spawn a starfield of small unlit spheres around the scene.
fn spawn_starfield(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let star_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        emissive: LinearRgba::WHITE * 0.5,
        unlit: true,
        ..default()
    });
    let star_mesh = meshes.add(Sphere::new(0.06).mesh().uv(4, 4));

    let mut rng = rand::thread_rng();
    for _ in 0..STAR_COUNT {
        let direction = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        )
        .normalize_or(Vec3::Z);
        let distance = rng.gen_range(STAR_SHELL.0..STAR_SHELL.1);
        let scale = rng.gen_range(0.5..1.5);

        commands.spawn((
            Mesh3d(star_mesh.clone()),
            MeshMaterial3d(star_material.clone()),
            Transform::from_translation(direction * distance).with_scale(Vec3::splat(scale)),
        ));
    }

    info!("Spawned {STAR_COUNT} background stars");
}

/// Key light from the upper right, fill light from below left.
fn spawn_lighting(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(5.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        PointLight {
            intensity: 800_000.0,
            range: 30.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-6.0, -6.0, 2.0),
    ));

    info!("Scene lighting initialized");
}
