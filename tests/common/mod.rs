//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use leo_monitor::SimulationPlugin;
use leo_monitor::events::{EventSource, FeedError, HazardEvents, HazardFeed, SceneEvent};
use leo_monitor::opportunity::OpportunityTemplate;
use leo_monitor::types::GeoPoint;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Frame step used by headless apps. Below Bevy's virtual-time clamp.
pub const FRAME: Duration = Duration::from_millis(200);

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(0x1e0)
}

pub fn geo(lat: f64, lon: f64) -> GeoPoint {
    GeoPoint::new(lat, lon).expect("test coordinate in range")
}

pub fn event(source: EventSource, category: &str, lat: f64, lon: f64) -> SceneEvent {
    SceneEvent::styled(
        source,
        format!("{category} at {lat},{lon}"),
        category.to_string(),
        geo(lat, lon),
        source.home_url().to_string(),
    )
}

pub fn template(id: &str, at: Option<(f64, f64)>) -> OpportunityTemplate {
    OpportunityTemplate {
        id: id.to_string(),
        title: format!("Offer {id}"),
        lat: at.map(|(lat, _)| lat),
        lon: at.map(|(_, lon)| lon),
        risk_level: "Low".to_string(),
        category: "Insurance".to_string(),
        potential_value: 1000.0,
        currency: "USD".to_string(),
        partner: "Orbital Mutual".to_string(),
        description: String::new(),
        image: None,
    }
}

/// A feed returning canned events, or failing.
pub struct StaticFeed {
    source: EventSource,
    outcome: Result<Vec<SceneEvent>, String>,
    calls: AtomicUsize,
}

impl StaticFeed {
    pub fn ok(source: EventSource, events: Vec<SceneEvent>) -> Self {
        Self {
            source,
            outcome: Ok(events),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(source: EventSource) -> Self {
        Self {
            source,
            outcome: Err("connection refused".to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HazardFeed for StaticFeed {
    fn source(&self) -> EventSource {
        self.source
    }

    fn fetch(&self) -> Result<Vec<SceneEvent>, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map_err(FeedError::Unavailable)
    }
}

/// A feed whose first call is slow and whose later calls are instant, each
/// call returning one event tagged with the call number in its title.
pub struct SlowFirstFeed {
    pub first_delay: Duration,
    calls: AtomicUsize,
}

impl SlowFirstFeed {
    pub fn new(first_delay: Duration) -> Self {
        Self {
            first_delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HazardFeed for SlowFirstFeed {
    fn source(&self) -> EventSource {
        EventSource::Eonet
    }

    fn fetch(&self) -> Result<Vec<SceneEvent>, FeedError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == 1 {
            thread::sleep(self.first_delay);
        }
        let mut e = event(EventSource::Eonet, "Wildfires", 10.0, 20.0);
        e.title = format!("call {call}");
        Ok(vec![e])
    }
}

pub fn shared<F: HazardFeed + 'static>(feed: F) -> Arc<F> {
    Arc::new(feed)
}

/// Headless app with fixed frame steps. Resources inserted by `setup` take
/// precedence over the plugin defaults.
pub fn simulation_app(setup: impl FnOnce(&mut App)) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    setup(&mut app);
    app.add_plugins(SimulationPlugin);
    app
}

/// Update until `done` holds or the timeout passes; returns whether it held.
pub fn update_until(app: &mut App, timeout: Duration, done: impl Fn(&App) -> bool) -> bool {
    let start = Instant::now();
    loop {
        app.update();
        if done(app) {
            return true;
        }
        if start.elapsed() > timeout {
            return false;
        }
        thread::sleep(Duration::from_millis(5));
    }
}

pub fn published_generation(app: &App) -> u64 {
    app.world().resource::<HazardEvents>().generation
}
