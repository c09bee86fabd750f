//! Scene clock advancement.
//!
//! Converts Bevy's real frame delta into scene time, honouring scale and
//! pause state, before any animation reads it.

use bevy::prelude::*;

use crate::scene::SceneSet;
use crate::types::SceneClock;

/// Plugin providing scene clock advancement.
pub struct TimePlugin;

impl Plugin for TimePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneClock>()
            .add_systems(Update, advance_clock.in_set(SceneSet::Clock));
    }
}

/// Advance scene time by this frame's real delta.
fn advance_clock(mut clock: ResMut<SceneClock>, time: Res<Time>) {
    clock.advance(time.delta_secs());
}
