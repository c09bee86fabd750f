//! Textured globe and atmosphere shell.
//!
//! Both meshes hang off a [`GlobeRoot`] entity whose rotation follows
//! [`GlobeSpin`]; hazard and opportunity markers are parented to the same
//! root so they turn with the surface.

use bevy::prelude::*;

use crate::config::SceneConfig;
use crate::scene::GlobeSpin;
use crate::types::{ATMOSPHERE_RADIUS, GLOBE_RADIUS, Rgb};

/// Atmosphere tint.
pub const ATMOSPHERE_COLOR: Rgb = Rgb::hex(0x21e6c1);

/// Atmosphere opacity before additive blending.
pub const ATMOSPHERE_OPACITY: f32 = 0.06;

/// Sphere tessellation (sectors, stacks).
const GLOBE_RESOLUTION: (u32, u32) = (128, 64);

/// Root of the rotating globe group.
#[derive(Component)]
pub struct GlobeRoot;

/// Plugin spawning the globe and keeping its rotation in sync.
pub struct GlobePlugin;

impl Plugin for GlobePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_globe);
    }
}

fn spawn_globe(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    config: Option<Res<SceneConfig>>,
) {
    let texture_path = config
        .map(|c| c.earth_texture.clone())
        .unwrap_or_else(|| SceneConfig::default().earth_texture);

    let (sectors, stacks) = GLOBE_RESOLUTION;
    let earth_mesh = meshes.add(Sphere::new(GLOBE_RADIUS).mesh().uv(sectors, stacks));
    let earth_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        base_color_texture: Some(asset_server.load(texture_path)),
        perceptual_roughness: 1.0,
        metallic: 0.0,
        ..default()
    });

    let atmosphere_mesh = meshes.add(Sphere::new(ATMOSPHERE_RADIUS).mesh().uv(sectors, stacks));
    let atmosphere_material = materials.add(StandardMaterial {
        base_color: ATMOSPHERE_COLOR.to_color().with_alpha(ATMOSPHERE_OPACITY),
        alpha_mode: AlphaMode::Add,
        unlit: true,
        ..default()
    });

    commands
        .spawn((GlobeRoot, Transform::default(), Visibility::default()))
        .with_children(|globe| {
            globe.spawn((Mesh3d(earth_mesh), MeshMaterial3d(earth_material)));
            globe.spawn((Mesh3d(atmosphere_mesh), MeshMaterial3d(atmosphere_material)));
        });

    info!("Globe spawned");
}

/// Copy the spin angle into the globe root.
pub fn sync_globe_rotation(spin: Res<GlobeSpin>, mut globe: Query<&mut Transform, With<GlobeRoot>>) {
    for mut transform in &mut globe {
        transform.rotation = spin.rotation();
    }
}
