//! Detail cards for the selection slots.
//!
//! Each non-empty slot gets its own floating card; closing a card clears
//! only that slot.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::colors;
use super::icons;
use crate::events::SceneEvent;
use crate::opportunity::OpportunityMarker;
use crate::selection::{BodySelection, NavigationRequest, Selection};
use crate::types::GeoPoint;

/// `12.35° N, 45.10° W`
pub fn format_geo(geo: &GeoPoint) -> String {
    let ns = if geo.lat() >= 0.0 { 'N' } else { 'S' };
    let ew = if geo.lon() >= 0.0 { 'E' } else { 'W' };
    format!(
        "{:.2}° {ns}, {:.2}° {ew}",
        geo.lat().abs(),
        geo.lon().abs()
    )
}

/// Digits grouped in thousands: `36,500`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Whole-unit amount with its currency: `USD 12,000`.
pub fn format_value(value: f64, currency: &str) -> String {
    let whole = if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    };
    format!("{currency} {}", group_thousands(whole))
}

fn card_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::CARD_BG)
        .inner_margin(egui::Margin::same(12))
        .stroke(egui::Stroke::new(1.0, colors::CARD_BORDER))
        .corner_radius(4)
}

/// Title row with a close button; returns true when close was clicked.
fn header(ui: &mut egui::Ui, icon: &str, title: &str) -> bool {
    let mut close = false;
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(icon).size(16.0));
        ui.label(egui::RichText::new(title).strong().size(16.0));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            close = ui.button(icons::CLOSE).on_hover_text("Close").clicked();
        });
    });
    ui.separator();
    close
}

/// Render all open cards.
pub fn detail_cards_system(
    mut contexts: EguiContexts,
    mut selection: ResMut<Selection>,
    mut navigation: MessageWriter<NavigationRequest>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    if let Some(event) = &selection.event
        && event_card(ctx, event)
    {
        selection.event = None;
    }

    if let Some(marker) = &selection.opportunity {
        let action = opportunity_card(ctx, marker);
        if action.secure {
            info!("Securing opportunity {}", marker.id);
            navigation.write(NavigationRequest::insurance());
        }
        if action.close {
            selection.opportunity = None;
        }
    }

    if let Some(body) = &selection.body
        && body_card(ctx, body)
    {
        selection.body = None;
    }
}

fn event_card(ctx: &egui::Context, event: &SceneEvent) -> bool {
    let mut close = false;
    egui::Window::new("Hazard event")
        .title_bar(false)
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
        .frame(card_frame())
        .show(ctx, |ui| {
            ui.set_max_width(260.0);
            close = header(ui, icons::hazard_icon(&event.category), &event.title);

            let [r, g, b] = [event.color.r, event.color.g, event.color.b];
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("●").color(egui::Color32::from_rgb(r, g, b)));
                ui.label(format!("Source: {} | Category: {}", event.source, event.category));
            });
            ui.label(
                egui::RichText::new(format!("{} {}", icons::PIN, format_geo(&event.geo)))
                    .color(colors::TEXT_WEAK),
            );
            ui.add_space(6.0);
            ui.hyperlink_to(format!("{} View official source", icons::EXTERNAL), &event.link);
        });
    close
}

struct OpportunityAction {
    close: bool,
    secure: bool,
}

fn opportunity_card(ctx: &egui::Context, marker: &OpportunityMarker) -> OpportunityAction {
    let mut action = OpportunityAction {
        close: false,
        secure: false,
    };
    egui::Window::new("Opportunity")
        .title_bar(false)
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::RIGHT_CENTER, egui::vec2(-16.0, 0.0))
        .frame(card_frame())
        .show(ctx, |ui| {
            ui.set_max_width(260.0);
            action.close = header(ui, icons::VALUE, &marker.title);

            if !marker.category.is_empty() {
                ui.label(egui::RichText::new(&marker.category).color(colors::TEXT_WEAK));
            }
            if !marker.partner.is_empty() {
                ui.label(format!("Partner: {}", marker.partner));
            }
            ui.label(format!(
                "Value: {}",
                format_value(marker.potential_value, &marker.currency)
            ));
            if !marker.risk_level.is_empty() {
                ui.label(format!("Risk: {}", marker.risk_level));
            }
            ui.label(
                egui::RichText::new(format!("{} {}", icons::PIN, format_geo(&marker.geo)))
                    .color(colors::TEXT_WEAK),
            );
            if !marker.description.is_empty() {
                ui.add_space(4.0);
                ui.label(egui::RichText::new(&marker.description).size(12.0));
            }
            ui.add_space(6.0);
            action.secure = ui
                .button(
                    egui::RichText::new(format!("{} Secure", icons::SECURE))
                        .color(colors::ACCENT),
                )
                .clicked();
        });
    action
}

fn body_card(ctx: &egui::Context, body: &BodySelection) -> bool {
    let mut close = false;
    egui::Window::new("Orbital body")
        .title_bar(false)
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
        .frame(card_frame())
        .show(ctx, |ui| {
            ui.set_max_width(240.0);
            let title = format!("{} #{}", body.kind.label(), body.member.index + 1);
            close = header(ui, icons::ORBIT, &title);

            ui.label(format!("Orbit radius: {:.3} scene units", body.radius));
            match &body.geo {
                Some(geo) => ui.label(format!("Over {}", format_geo(geo))),
                None => ui.label("Over: unknown"),
            };
            match &body.nearest {
                Some(nearest) => ui.label(format!("Nearest opportunity: {}", nearest.title)),
                None => ui.label(egui::RichText::new("No opportunity nearby").color(colors::TEXT_WEAK)),
            };
        });
    close
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(36500), "36,500");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(1200.4, "USD"), "USD 1,200");
        assert_eq!(format_value(f64::NAN, "EUR"), "EUR 0");
    }

    #[test]
    fn test_format_geo_hemispheres() {
        let geo = GeoPoint::new(-12.347, 45.1).unwrap();
        assert_eq!(format_geo(&geo), "12.35° S, 45.10° E");
        let geo = GeoPoint::new(0.0, -0.5).unwrap();
        assert_eq!(format_geo(&geo), "0.00° N, 0.50° W");
    }
}
