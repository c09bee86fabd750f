//! LEO Monitor - Orbital Scene & Event Simulation Engine
//!
//! A desktop globe of low-Earth orbit with live hazard events, simulated
//! satellite and debris swarms, and collision-risk halos.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use leo_monitor::ScenePlugin;
use leo_monitor::catalog::{Catalog, JsonCatalog};
use leo_monitor::config::{CONFIG_ENV, SceneConfig};
use leo_monitor::selection::NavigationRequest;

fn main() {
    let (config, config_error) = match SceneConfig::from_env() {
        Ok(config) => (config, None),
        Err(err) => (SceneConfig::default(), Some(err)),
    };
    let catalog = JsonCatalog::new(&config.data_dir);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "LEO Monitor".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        // Insert resources before plugins that depend on them
        .insert_resource(config.event_aggregator())
        .insert_resource(Catalog(Box::new(catalog)))
        .insert_resource(config)
        .add_plugins(ScenePlugin)
        // Logging is only up once the app runs
        .add_systems(Startup, move || {
            if let Some(err) = &config_error {
                warn!("Ignoring {CONFIG_ENV}: {err}; using defaults");
            }
        })
        .add_systems(Update, log_navigation)
        .run();
}

/// The host shell owns routing; here a deep link is only reported.
fn log_navigation(mut requests: MessageReader<NavigationRequest>) {
    for request in requests.read() {
        info!("Navigation requested: {}", request.url());
    }
}
