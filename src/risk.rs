//! Collision-risk halos.
//!
//! Each risk zone becomes a translucent sphere at the radius its altitude
//! maps to, pulsing in scale and opacity. The pulse phase is offset by the
//! zone's index in the input list, so reordering the list changes the
//! pattern.

use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geo::{AltitudeBand, altitude_to_radius};
use crate::scene::SceneSet;
use crate::types::{Rgb, SceneClock};

/// Baseline opacity of a halo at the trough of its pulse.
pub const HALO_BASE_OPACITY: f32 = 0.10;

/// Half the opacity swing; the peak is `HALO_BASE_OPACITY + 2 * HALO_OPACITY_SWING`.
pub const HALO_OPACITY_SWING: f32 = 0.08;

/// Relative scale swing of the breathing pulse.
pub const HALO_SCALE_SWING: f32 = 0.03;

/// Severity label of a risk zone.
///
/// Accepts English and Spanish labels in any case, as found in the
/// collision-monitor documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn color(&self) -> Rgb {
        match self {
            Severity::High => Rgb::hex(0xff4444),
            Severity::Medium => Rgb::hex(0xffbb33),
            Severity::Low => Rgb::hex(0x44ccff),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "high" | "alta" | "alto" => Ok(Severity::High),
            "medium" | "media" | "medio" => Ok(Severity::Medium),
            "low" | "baja" | "bajo" => Ok(Severity::Low),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        };
        f.write_str(label)
    }
}

/// A density shell reported by the collision-metrics collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskZone {
    #[serde(alias = "altitude")]
    pub altitude_km: f32,
    pub severity: Severity,
    /// Objects per km³.
    #[serde(default)]
    pub density: f32,
}

/// Breathing scale of the halo at scene time `t`.
pub fn pulse_scale(t: f32, index: usize) -> f32 {
    1.0 + (t * 1.4 + index as f32).sin() * HALO_SCALE_SWING
}

/// Opacity of the halo at scene time `t`, always within [0.10, 0.26].
pub fn halo_opacity(t: f32, index: usize) -> f32 {
    HALO_BASE_OPACITY + ((t * 2.0 + index as f32).sin() + 1.0) * HALO_OPACITY_SWING
}

/// Derived, per-frame visual state of one halo.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HaloVisual {
    pub radius: f32,
    pub color: Rgb,
    pub scale: f32,
    pub opacity: f32,
}

/// Halo state for the current zone snapshot.
#[derive(Resource, Clone, Debug, Default)]
pub struct RiskHalos {
    zones: Vec<RiskZone>,
    visuals: Vec<HaloVisual>,
}

impl RiskHalos {
    /// Derive halos for a zone snapshot, initialised at `t = 0`.
    pub fn from_zones(zones: Vec<RiskZone>, band: &AltitudeBand) -> Self {
        let visuals = zones
            .iter()
            .enumerate()
            .map(|(i, zone)| HaloVisual {
                radius: altitude_to_radius(zone.altitude_km, band),
                color: zone.severity.color(),
                scale: pulse_scale(0.0, i),
                opacity: halo_opacity(0.0, i),
            })
            .collect();
        Self { zones, visuals }
    }

    /// Update the pulse of every halo for scene time `t`.
    pub fn tick(&mut self, t: f32) {
        for (i, visual) in self.visuals.iter_mut().enumerate() {
            visual.scale = pulse_scale(t, i);
            visual.opacity = halo_opacity(t, i);
        }
    }

    pub fn zones(&self) -> &[RiskZone] {
        &self.zones
    }

    pub fn visuals(&self) -> &[HaloVisual] {
        &self.visuals
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }
}

/// Plugin animating the risk halos.
pub struct RiskPlugin;

impl Plugin for RiskPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RiskHalos>()
            .add_systems(Update, tick_halos.in_set(SceneSet::Simulate));
    }
}

/// Advance the halo pulse to the current scene time.
pub fn tick_halos(mut halos: ResMut<RiskHalos>, clock: Res<SceneClock>) {
    if halos.is_empty() {
        return;
    }
    halos.tick(clock.animation_time());
}
