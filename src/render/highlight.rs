//! Selection highlighting.
//!
//! Draws a ring of gizmo lines around whatever fills a selection slot,
//! facing the camera.

use bevy::prelude::*;

use crate::camera::MainCamera;
use crate::selection::{PickTarget, Pickable, Selection};

/// Highlight ring colour.
const HIGHLIGHT_COLOR: Color = Color::srgba(0.0, 1.0, 1.0, 0.8);

/// Whether a pickable is the current content of one of the slots.
pub fn is_selected(selection: &Selection, target: &PickTarget) -> bool {
    match target {
        PickTarget::Event(event) => selection.event.as_ref() == Some(event),
        PickTarget::Opportunity(marker) => selection.opportunity.as_ref() == Some(marker),
        PickTarget::Body(member) => selection.body.as_ref().is_some_and(|b| b.member == *member),
    }
}

/// Draw a camera-facing ring around every selected pickable.
pub fn draw_selection_highlight(
    mut gizmos: Gizmos,
    selection: Res<Selection>,
    pickables: Query<(&Pickable, &GlobalTransform)>,
    camera: Query<&GlobalTransform, With<MainCamera>>,
) {
    if selection.is_empty() {
        return;
    }
    let Ok(camera_transform) = camera.single() else {
        return;
    };

    for (pickable, transform) in &pickables {
        if !is_selected(&selection, &pickable.target) {
            continue;
        }
        let center = transform.translation();
        let facing = Dir3::new(camera_transform.translation() - center).unwrap_or(Dir3::Z);
        let rotation = Quat::from_rotation_arc(Vec3::Z, *facing);
        gizmos.circle(
            Isometry3d::new(center, rotation),
            pickable.radius,
            HIGHLIGHT_COLOR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::BodySelection;
    use crate::swarm::{BodyKind, SwarmMember};

    #[test]
    fn test_body_highlight_matches_member() {
        let member = SwarmMember { swarm: 1, index: 7 };
        let selection = Selection {
            body: Some(BodySelection {
                member,
                kind: BodyKind::Debris,
                radius: 2.2,
                geo: None,
                nearest: None,
            }),
            ..default()
        };
        assert!(is_selected(&selection, &PickTarget::Body(member)));
        assert!(!is_selected(
            &selection,
            &PickTarget::Body(SwarmMember { swarm: 0, index: 7 })
        ));
    }
}
