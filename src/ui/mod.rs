//! UI module providing the egui-based interface.
//!
//! A side panel with metrics and controls, plus one floating card per
//! selection slot.

pub mod detail_cards;
pub mod icons;
mod monitor_panel;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

/// Shared UI palette.
mod colors {
    use bevy_egui::egui::Color32;

    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(10, 16, 28, 235);
    pub const CARD_BG: Color32 = Color32::from_rgba_premultiplied(14, 22, 36, 245);
    pub const CARD_BORDER: Color32 = Color32::from_rgb(33, 230, 193);
    pub const ACCENT: Color32 = Color32::from_rgb(33, 230, 193);
    pub const TEXT_WEAK: Color32 = Color32::from_rgb(150, 160, 175);
}

/// Plugin that adds all UI systems.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<icons::FontsInitialized>()
            // Font initialization MUST run before any UI systems that use icons
            .add_systems(EguiPrimaryContextPass, icons::setup_fonts)
            .add_systems(
                EguiPrimaryContextPass,
                (
                    monitor_panel::monitor_panel_system,
                    detail_cards::detail_cards_system,
                )
                    .chain()
                    .after(icons::setup_fonts)
                    .run_if(|init: Res<icons::FontsInitialized>| init.0),
            );
    }
}
