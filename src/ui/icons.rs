//! Phosphor icon definitions for the UI.
//!
//! Icons are registered with egui by `setup_fonts` on the first UI pass.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

/// Resource to track if fonts have been initialized.
#[derive(Resource, Default)]
pub struct FontsInitialized(pub bool);

/// System to initialize Phosphor icon fonts.
/// Runs in EguiPrimaryContextPass where the egui context is guaranteed to be ready.
pub fn setup_fonts(mut contexts: EguiContexts, mut initialized: ResMut<FontsInitialized>) {
    if initialized.0 {
        return;
    }

    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    ctx.set_fonts(fonts);
    initialized.0 = true;

    info!("Phosphor icon fonts initialized");
}

// Browse all icons at https://phosphoricons.com/

pub const CLOSE: &str = egui_phosphor::regular::X;
pub const PLAY: &str = egui_phosphor::regular::PLAY;
pub const PAUSE: &str = egui_phosphor::regular::PAUSE;
/// Refresh feeds
pub const REFRESH: &str = egui_phosphor::regular::ARROW_CLOCKWISE;
/// Link to an external source
pub const EXTERNAL: &str = egui_phosphor::regular::ARROW_SQUARE_OUT;
/// Insurance action
pub const SECURE: &str = egui_phosphor::regular::SHIELD_CHECK;
pub const GLOBE: &str = egui_phosphor::regular::GLOBE;
pub const PIN: &str = egui_phosphor::regular::MAP_PIN;
pub const WARNING: &str = egui_phosphor::regular::WARNING;
pub const VALUE: &str = egui_phosphor::regular::CURRENCY_DOLLAR;
/// Orbiting body
pub const ORBIT: &str = egui_phosphor::regular::PLANET;

// Hazard categories
pub const WILDFIRE: &str = egui_phosphor::regular::FIRE;
pub const STORM: &str = egui_phosphor::regular::CLOUD_LIGHTNING;
pub const VOLCANO: &str = egui_phosphor::regular::MOUNTAINS;
pub const FLOOD: &str = egui_phosphor::regular::DROP;

/// Icon for a hazard category, by EONET title or GDACS code.
pub fn hazard_icon(category: &str) -> &'static str {
    match category {
        "Wildfires" | "WF" => WILDFIRE,
        "Severe Storms" | "TC" => STORM,
        "Volcanoes" | "VO" => VOLCANO,
        "Floods" | "FL" => FLOOD,
        _ => WARNING,
    }
}
