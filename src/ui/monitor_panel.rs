//! Side panel with collision metrics, feed controls and the scene clock.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::colors;
use super::detail_cards::group_thousands;
use super::icons;
use crate::catalog::CollisionMetrics;
use crate::events::{EventAggregator, HazardEvents, RefreshEvents};
use crate::opportunity::OpportunityStream;
use crate::risk::Severity;
use crate::swarm::Swarms;
use crate::types::SceneClock;

/// Placeholder for missing figures.
const MISSING: &str = "—";

fn severity_color(severity: Severity) -> egui::Color32 {
    let rgb = severity.color();
    egui::Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

/// Average density line, or the placeholder.
pub fn density_label(metrics: &CollisionMetrics) -> String {
    metrics
        .average_density()
        .map(|d| format!("{d:.3} objects/km³"))
        .unwrap_or_else(|| MISSING.to_string())
}

fn count_label(value: Option<u64>) -> String {
    value.map(group_thousands).unwrap_or_else(|| MISSING.to_string())
}

#[allow(clippy::too_many_arguments)]
pub fn monitor_panel_system(
    mut contexts: EguiContexts,
    metrics: Res<CollisionMetrics>,
    hazards: Res<HazardEvents>,
    mut aggregator: ResMut<EventAggregator>,
    mut refresh: MessageWriter<RefreshEvents>,
    stream: Res<OpportunityStream>,
    swarms: Res<Swarms>,
    mut clock: ResMut<SceneClock>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::SidePanel::left("monitor_panel")
        .resizable(false)
        .exact_width(260.0)
        .frame(
            egui::Frame::new()
                .fill(colors::PANEL_BG)
                .inner_margin(egui::Margin::same(14)),
        )
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(format!("{} Collision Monitor", icons::GLOBE))
                    .strong()
                    .size(18.0)
                    .color(colors::ACCENT),
            );
            ui.add_space(6.0);

            egui::Grid::new("kpis").num_columns(2).show(ui, |ui| {
                ui.label("Debris fragments");
                ui.strong(count_label(metrics.fragments));
                ui.end_row();
                ui.label("Active satellites");
                ui.strong(count_label(metrics.satellites));
                ui.end_row();
                ui.label("Average LEO density");
                ui.strong(density_label(&metrics));
                ui.end_row();
                ui.label("Simulated bodies");
                ui.strong(swarms.total_bodies().to_string());
                ui.end_row();
            });

            ui.separator();
            ui.label(egui::RichText::new("Risk zones").strong());
            if metrics.risk_zones.is_empty() {
                ui.label(egui::RichText::new("No zones loaded").color(colors::TEXT_WEAK));
            }
            for zone in &metrics.risk_zones {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(zone.severity.to_string())
                            .strong()
                            .color(severity_color(zone.severity)),
                    );
                    ui.label(format!("{:.0} km", zone.altitude_km));
                });
                ui.label(
                    egui::RichText::new(format!("density: {} obj/km³", zone.density))
                        .size(12.0)
                        .color(colors::TEXT_WEAK),
                );
            }

            if !metrics.alerts.is_empty() {
                ui.separator();
                ui.label(egui::RichText::new(format!("{} Alerts", icons::WARNING)).strong());
                for alert in &metrics.alerts {
                    ui.label(egui::RichText::new(alert).size(12.0));
                }
            }

            ui.separator();
            ui.label(egui::RichText::new("Hazard events").strong());
            ui.label(format!("{} events on the globe", hazards.events.len()));
            ui.checkbox(&mut aggregator.only_with_image, "Only illustrated categories");
            if ui.button(format!("{} Refresh feeds", icons::REFRESH)).clicked() {
                refresh.write(RefreshEvents);
            }

            ui.separator();
            ui.label(egui::RichText::new("Opportunities").strong());
            ui.label(format!("{} / {} visible", stream.len(), stream.capacity()));

            ui.separator();
            let (icon, label) = if clock.paused {
                (icons::PLAY, "Resume")
            } else {
                (icons::PAUSE, "Pause")
            };
            if ui.button(format!("{icon} {label} orbits")).clicked() {
                clock.paused = !clock.paused;
                info!("Scene {}", if clock.paused { "paused" } else { "running" });
            }
        });
}
