//! Hazard event aggregation.
//!
//! Several independent feeds are fetched concurrently, each normalised into
//! [`SceneEvent`]s, then merged and filtered into one snapshot. A failing
//! feed contributes nothing and never blocks or empties the others. The
//! merged snapshot replaces the previous one wholesale, so consumers always
//! see a complete refresh.

pub mod eonet;
pub mod gdacs;
pub mod http;
pub mod style;

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use bevy::prelude::*;

use crate::scene::SceneSet;
use crate::types::{GeoPoint, Rgb};

pub use self::http::{EONET_URL, GDACS_URL, HttpFeed};

/// Where a hazard event came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventSource {
    /// NASA Earth Observatory Natural Event Tracker.
    Eonet,
    /// Global Disaster Alert and Coordination System.
    Gdacs,
}

impl EventSource {
    pub fn label(&self) -> &'static str {
        match self {
            EventSource::Eonet => "EONET",
            EventSource::Gdacs => "GDACS",
        }
    }

    /// Colour for categories missing from the presentation table.
    pub fn fallback_color(&self) -> Rgb {
        match self {
            EventSource::Eonet => Rgb::hex(0xffaa00),
            EventSource::Gdacs => Rgb::hex(0x00ffc8),
        }
    }

    /// Link used when a record carries none.
    pub fn home_url(&self) -> &'static str {
        match self {
            EventSource::Eonet => "https://eonet.gsfc.nasa.gov",
            EventSource::Gdacs => "https://www.gdacs.org/",
        }
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A natural-hazard event in the unified point model.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneEvent {
    pub source: EventSource,
    pub title: String,
    pub category: String,
    pub geo: GeoPoint,
    pub link: String,
    /// Category illustration, if the category is mapped.
    pub image: Option<&'static str>,
    pub color: Rgb,
}

impl SceneEvent {
    /// Build an event, taking image and colour from the presentation table.
    pub fn styled(
        source: EventSource,
        title: String,
        category: String,
        geo: GeoPoint,
        link: String,
    ) -> Self {
        let presentation = style::presentation(&category);
        Self {
            source,
            image: presentation.map(|p| p.image),
            color: presentation.map_or(source.fallback_color(), |p| p.color),
            title,
            category,
            geo,
            link,
        }
    }
}

/// Errors fetching or decoding one feed.
#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("feed unavailable: {0}")]
    Unavailable(String),
}

/// A read-only source of hazard events.
///
/// `fetch` may block; the aggregator always calls it off the frame loop.
pub trait HazardFeed: Send + Sync {
    fn source(&self) -> EventSource;

    fn fetch(&self) -> Result<Vec<SceneEvent>, FeedError>;
}

/// Fetch every feed concurrently and merge the results in feed order.
///
/// Returns only after every feed has settled. Failed or panicking feeds
/// contribute an empty batch. With `only_with_image`, events whose category
/// has no illustration are dropped.
pub fn aggregate(feeds: &[Arc<dyn HazardFeed>], only_with_image: bool) -> Vec<SceneEvent> {
    let batches: Vec<Vec<SceneEvent>> = thread::scope(|scope| {
        let handles: Vec<_> = feeds
            .iter()
            .map(|feed| (feed.source(), scope.spawn(move || feed.fetch())))
            .collect();

        handles
            .into_iter()
            .map(|(source, handle)| match handle.join() {
                Ok(Ok(events)) => {
                    debug!("{source} returned {} events", events.len());
                    events
                }
                Ok(Err(err)) => {
                    warn!("{source} feed failed, ignoring it: {err}");
                    Vec::new()
                }
                Err(_) => {
                    warn!("{source} feed panicked, ignoring it");
                    Vec::new()
                }
            })
            .collect()
    });

    let merged = batches.into_iter().flatten();
    if only_with_image {
        merged.filter(|event| event.image.is_some()).collect()
    } else {
        merged.collect()
    }
}

/// Result of one background refresh.
#[derive(Debug)]
pub struct RefreshResult {
    pub generation: u64,
    pub events: Vec<SceneEvent>,
}

/// Owns the feeds and the in-flight refreshes.
#[derive(Resource)]
pub struct EventAggregator {
    feeds: Arc<[Arc<dyn HazardFeed>]>,
    /// Keep only events whose category has an illustration.
    pub only_with_image: bool,
    /// Filter value used by the latest request; `None` before the first one.
    requested_filter: Option<bool>,
    generation: u64,
    sender: Sender<RefreshResult>,
    receiver: Mutex<Receiver<RefreshResult>>,
}

impl EventAggregator {
    pub fn new(feeds: Vec<Arc<dyn HazardFeed>>, only_with_image: bool) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            feeds: feeds.into(),
            only_with_image,
            requested_filter: None,
            generation: 0,
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    /// Aggregator with no feeds; every refresh publishes an empty snapshot.
    pub fn offline() -> Self {
        Self::new(Vec::new(), true)
    }

    /// Generation of the latest requested refresh.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn feed_count(&self) -> usize {
        self.feeds.len()
    }

    /// Whether the filter changed since the last request (or none was made).
    pub fn needs_refresh(&self) -> bool {
        self.requested_filter != Some(self.only_with_image)
    }

    /// Start a new generation and return it. Results of older generations
    /// are discarded when they arrive.
    pub fn begin_refresh(&mut self) -> u64 {
        self.generation += 1;
        self.requested_filter = Some(self.only_with_image);
        self.generation
    }

    /// Run a refresh for the latest generation on a background thread.
    pub fn spawn_refresh(&mut self) {
        let generation = self.begin_refresh();
        let feeds = Arc::clone(&self.feeds);
        let only_with_image = self.only_with_image;
        let sender = self.sender.clone();

        let spawned = thread::Builder::new()
            .name(format!("hazard-refresh-{generation}"))
            .spawn(move || {
                let events = aggregate(&feeds, only_with_image);
                // The receiver is gone only if the app shut down.
                let _ = sender.send(RefreshResult { generation, events });
            });

        if let Err(err) = spawned {
            warn!("Could not start hazard refresh: {err}");
        }
    }

    /// Keep a result only if it belongs to the latest generation.
    pub fn accept(&self, result: RefreshResult) -> Option<Vec<SceneEvent>> {
        if result.generation == self.generation {
            Some(result.events)
        } else {
            debug!(
                "Discarding stale hazard refresh {} (latest {})",
                result.generation, self.generation
            );
            None
        }
    }

    /// Drain finished refreshes without blocking; returns the newest
    /// current-generation result, if any.
    pub fn poll(&self) -> Option<(u64, Vec<SceneEvent>)> {
        let receiver = self.receiver.try_lock().ok()?;
        let mut latest = None;
        while let Ok(result) = receiver.try_recv() {
            let generation = result.generation;
            if let Some(events) = self.accept(result) {
                latest = Some((generation, events));
            }
        }
        latest
    }
}

/// The published hazard snapshot. Replaced as a whole, never patched.
#[derive(Resource, Default, Debug, Clone)]
pub struct HazardEvents {
    pub events: Vec<SceneEvent>,
    /// Generation that produced `events`; 0 until the first publish.
    pub generation: u64,
}

impl HazardEvents {
    pub fn publish(&mut self, generation: u64, events: Vec<SceneEvent>) {
        self.events = events;
        self.generation = generation;
    }
}

/// Request an immediate refresh of all feeds.
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct RefreshEvents;

/// Plugin aggregating hazard feeds.
///
/// Uses an [`EventAggregator`] inserted before it, or an offline one.
pub struct EventsPlugin;

impl Plugin for EventsPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<EventAggregator>() {
            app.insert_resource(EventAggregator::offline());
        }
        app.init_resource::<HazardEvents>()
            .add_message::<RefreshEvents>()
            .add_systems(
                Update,
                (request_refresh, collect_refresh)
                    .chain()
                    .in_set(SceneSet::Ingest),
            );
    }
}

/// Start a refresh on the first frame, when the image filter flips, or when
/// asked to.
pub fn request_refresh(
    mut aggregator: ResMut<EventAggregator>,
    mut requests: MessageReader<RefreshEvents>,
) {
    let asked = requests.read().count() > 0;
    if asked || aggregator.needs_refresh() {
        aggregator.spawn_refresh();
    }
}

/// Publish the latest finished refresh, if it is still current.
pub fn collect_refresh(aggregator: Res<EventAggregator>, mut hazards: ResMut<HazardEvents>) {
    if let Some((generation, events)) = aggregator.poll() {
        info!(
            "Published {} hazard events from {} feeds",
            events.len(),
            aggregator.feed_count()
        );
        hazards.publish(generation, events);
    }
}
