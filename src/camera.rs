//! Orbit camera and click detection.
//!
//! Left-drag orbits the camera around the globe at a fixed distance; there
//! is no pan or zoom. A press and release that moves less than
//! [`CLICK_DRAG_THRESHOLD`] pixels counts as a click and is turned into a
//! world-space ray for the selection systems.

use bevy::{input::mouse::AccumulatedMouseMotion, prelude::*, window::PrimaryWindow};
use bevy_egui::EguiContexts;

use crate::scene::SceneSet;
use crate::selection::PointerClick;

/// Distance from the camera to the globe centre.
pub const CAMERA_DISTANCE: f32 = 5.5;

/// Vertical field of view in degrees.
pub const FIELD_OF_VIEW_DEG: f32 = 45.0;

/// Radians of orbit per pixel dragged.
pub const ORBIT_SPEED: f32 = 0.005;

/// Pitch limit, short of the poles so the up vector stays valid.
pub const MAX_PITCH: f32 = 1.45;

/// Pointer travel in pixels below which a press/release is a click.
pub const CLICK_DRAG_THRESHOLD: f32 = 4.0;

/// Marker component for the main camera.
#[derive(Component)]
pub struct MainCamera;

/// Orbit angles of the camera around the origin.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct OrbitState {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl Default for OrbitState {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: CAMERA_DISTANCE,
        }
    }
}

impl OrbitState {
    /// Apply a pointer drag in pixels.
    pub fn drag(&mut self, delta: Vec2) {
        self.yaw -= delta.x * ORBIT_SPEED;
        self.pitch = (self.pitch + delta.y * ORBIT_SPEED).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Camera transform looking at the origin.
    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, -self.pitch, 0.0);
        let position = rotation * Vec3::new(0.0, 0.0, self.distance);
        Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y)
    }
}

/// Tracks the current left-button press.
#[derive(Resource, Default, Debug)]
pub struct PointerDrag {
    /// Whether the press started over the scene rather than the UI.
    pub active: bool,
    /// Pixels travelled since the press.
    pub travelled: f32,
}

impl PointerDrag {
    pub fn is_click(&self) -> bool {
        self.travelled < CLICK_DRAG_THRESHOLD
    }
}

/// Plugin providing the orbit camera.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitState>()
            .init_resource::<PointerDrag>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (camera_orbit, emit_clicks).chain().before(SceneSet::Select),
            );
    }
}

/// Spawn the perspective camera with its ambient light.
fn setup_camera(mut commands: Commands, orbit: Res<OrbitState>) {
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: FIELD_OF_VIEW_DEG.to_radians(),
            ..default()
        }),
        orbit.transform(),
        AmbientLight {
            color: Color::WHITE,
            brightness: 700.0,
            ..default()
        },
        MainCamera,
    ));
}

/// Orbit while the left button is held, starting only off the UI.
fn camera_orbit(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mut contexts: EguiContexts,
    mut drag: ResMut<PointerDrag>,
    mut orbit: ResMut<OrbitState>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    if mouse_buttons.just_pressed(MouseButton::Left) {
        let over_ui = contexts
            .ctx_mut()
            .map(|ctx| ctx.wants_pointer_input())
            .unwrap_or(false);
        drag.active = !over_ui;
        drag.travelled = 0.0;
    }

    if !drag.active || !mouse_buttons.pressed(MouseButton::Left) {
        return;
    }
    if mouse_motion.delta == Vec2::ZERO {
        return;
    }

    drag.travelled += mouse_motion.delta.length();
    orbit.drag(mouse_motion.delta);

    if let Ok(mut transform) = camera_query.single_mut() {
        *transform = orbit.transform();
    }
}

/// Turn a short press/release into a [`PointerClick`].
fn emit_clicks(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut drag: ResMut<PointerDrag>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut clicks: MessageWriter<PointerClick>,
) {
    if !mouse_buttons.just_released(MouseButton::Left) || !drag.active {
        return;
    }
    drag.active = false;
    if !drag.is_click() {
        return;
    }

    let Ok(window) = window_query.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };

    clicks.write(PointerClick { ray });
}
