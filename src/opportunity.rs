//! Live stream of synthetic opportunity markers.
//!
//! A fixed-capacity FIFO window is refilled from a catalogue of templates at
//! a fixed interval, simulating market activity over the globe. Markers are
//! never edited: the window only appends at the back and evicts at the front.

use std::collections::VecDeque;

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::scene::SceneSet;
use crate::types::GeoPoint;

/// Maximum number of markers visible at once.
pub const DEFAULT_CAPACITY: usize = 30;

/// Seconds between two appended markers.
pub const TICK_INTERVAL_SECS: f32 = 2.5;

/// A catalogue record markers are drawn from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityTemplate {
    pub id: String,
    pub title: String,
    /// Fixed coordinates; when either is absent each drawn marker gets
    /// random ones.
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default, alias = "serviceType")]
    pub category: String,
    #[serde(default, alias = "priceUsd")]
    pub potential_value: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, alias = "provider")]
    pub partner: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl OpportunityTemplate {
    /// The template's own coordinates, if both are present and in range.
    pub fn geo(&self) -> Option<GeoPoint> {
        GeoPoint::new(self.lat?, self.lon?)
    }
}

/// A marker currently displayed on the globe.
#[derive(Clone, Debug, PartialEq)]
pub struct OpportunityMarker {
    pub id: String,
    pub geo: GeoPoint,
    pub title: String,
    pub risk_level: String,
    pub category: String,
    pub potential_value: f64,
    pub currency: String,
    pub partner: String,
    pub description: String,
    pub image: Option<String>,
}

impl OpportunityMarker {
    /// Instantiate a template, synthesising coordinates if it has none.
    pub fn from_template(template: &OpportunityTemplate, rng: &mut impl Rng) -> Self {
        Self {
            id: template.id.clone(),
            geo: template.geo().unwrap_or_else(|| GeoPoint::random(rng)),
            title: template.title.clone(),
            risk_level: template.risk_level.clone(),
            category: template.category.clone(),
            potential_value: template.potential_value,
            currency: template.currency.clone(),
            partner: template.partner.clone(),
            description: template.description.clone(),
            image: template.image.clone(),
        }
    }
}

/// Template catalogue plus the bounded window of visible markers.
#[derive(Resource, Debug)]
pub struct OpportunityStream {
    templates: Vec<OpportunityTemplate>,
    visible: VecDeque<OpportunityMarker>,
    capacity: usize,
    /// Total markers ever appended; lets observers detect changes cheaply.
    appended: u64,
}

impl Default for OpportunityStream {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl OpportunityStream {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            templates: Vec::new(),
            visible: VecDeque::with_capacity(capacity + 1),
            capacity,
            appended: 0,
        }
    }

    /// Replace the template catalogue. Visible markers are kept.
    pub fn load_templates(&mut self, templates: Vec<OpportunityTemplate>) {
        self.templates = templates;
    }

    /// Append one marker drawn uniformly from the templates.
    ///
    /// Returns the appended marker, or `None` when there are no templates.
    pub fn tick(&mut self, rng: &mut impl Rng) -> Option<&OpportunityMarker> {
        if self.templates.is_empty() {
            return None;
        }

        let template = &self.templates[rng.gen_range(0..self.templates.len())];
        let marker = OpportunityMarker::from_template(template, rng);
        self.push(marker);
        self.visible.back()
    }

    fn push(&mut self, marker: OpportunityMarker) {
        self.visible.push_back(marker);
        self.appended += 1;
        if self.visible.len() > self.capacity {
            self.visible.pop_front();
        }
    }

    /// Visible marker closest to `geo` in planar degree space.
    ///
    /// Uses [`GeoPoint::planar_distance`], an approximation that is good
    /// enough for a sparse marker set but wrong near the antimeridian.
    pub fn nearest_to(&self, geo: &GeoPoint) -> Option<&OpportunityMarker> {
        self.visible.iter().min_by(|a, b| {
            a.geo
                .planar_distance(geo)
                .total_cmp(&b.geo.planar_distance(geo))
        })
    }

    /// Visible markers, oldest first.
    pub fn visible(&self) -> impl ExactSizeIterator<Item = &OpportunityMarker> + '_ {
        self.visible.iter()
    }

    pub fn templates(&self) -> &[OpportunityTemplate] {
        &self.templates
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn appended(&self) -> u64 {
        self.appended
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

/// Repeating timer driving [`OpportunityStream::tick`].
#[derive(Resource, Debug)]
pub struct OpportunityTimer(pub Timer);

impl OpportunityTimer {
    pub fn from_seconds(seconds: f32) -> Self {
        Self(Timer::from_seconds(seconds.max(0.01), TimerMode::Repeating))
    }
}

impl Default for OpportunityTimer {
    fn default() -> Self {
        Self::from_seconds(TICK_INTERVAL_SECS)
    }
}

/// Plugin streaming opportunity markers.
pub struct OpportunityPlugin;

impl Plugin for OpportunityPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OpportunityStream>()
            .init_resource::<OpportunityTimer>()
            .add_systems(Update, stream_opportunities.in_set(SceneSet::Stream));
    }
}

/// Append markers as the interval elapses. Uses real time, not scene time,
/// so pausing the animation does not freeze the market.
pub fn stream_opportunities(
    mut stream: ResMut<OpportunityStream>,
    mut timer: ResMut<OpportunityTimer>,
    time: Res<Time>,
) {
    if stream.templates().is_empty() {
        return;
    }

    timer.0.tick(time.delta());
    let due = timer.0.times_finished_this_tick();
    if due == 0 {
        return;
    }

    let mut rng = rand::thread_rng();
    for _ in 0..due {
        if let Some(marker) = stream.tick(&mut rng) {
            debug!("Opportunity {} at {:?}", marker.id, marker.geo);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn template(id: &str, geo: Option<GeoPoint>) -> OpportunityTemplate {
        OpportunityTemplate {
            id: id.to_string(),
            title: format!("Offer {id}"),
            lat: geo.map(|g| g.lat()),
            lon: geo.map(|g| g.lon()),
            risk_level: "Low".to_string(),
            category: "Refuelling".to_string(),
            potential_value: 1000.0,
            currency: "USD".to_string(),
            partner: "Orbital Co".to_string(),
            description: String::new(),
            image: None,
        }
    }

    fn marker_at(id: &str, lat: f64, lon: f64) -> OpportunityMarker {
        OpportunityMarker::from_template(
            &template(id, GeoPoint::new(lat, lon)),
            &mut StdRng::seed_from_u64(0),
        )
    }

    #[test]
    fn test_tick_without_templates_is_noop() {
        let mut stream = OpportunityStream::default();
        assert!(stream.tick(&mut StdRng::seed_from_u64(1)).is_none());
        assert!(stream.is_empty());
    }

    #[test]
    fn test_window_keeps_most_recent_in_order() {
        let mut stream = OpportunityStream::with_capacity(3);
        for (i, (lat, lon)) in [(1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0), (5.0, 5.0)]
            .into_iter()
            .enumerate()
        {
            stream.push(marker_at(&i.to_string(), lat, lon));
        }
        let ids: Vec<&str> = stream.visible().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["2", "3", "4"]);
        assert_eq!(stream.appended(), 5);
    }

    #[test]
    fn test_missing_coordinates_are_synthesised() {
        let mut stream = OpportunityStream::default();
        stream.load_templates(vec![template("a", None)]);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let m = stream.tick(&mut rng).unwrap();
            assert!((-90.0..=90.0).contains(&m.geo.lat()));
            assert!((-180.0..=180.0).contains(&m.geo.lon()));
        }
    }

    #[test]
    fn test_out_of_range_coordinates_are_synthesised() {
        let mut t = template("bad", None);
        t.lat = Some(120.0);
        t.lon = Some(10.0);
        assert!(t.geo().is_none());
        let m = OpportunityMarker::from_template(&t, &mut StdRng::seed_from_u64(5));
        assert!((-90.0..=90.0).contains(&m.geo.lat()));
    }

    #[test]
    fn test_fixed_coordinates_are_kept() {
        let fixed = GeoPoint::new(-33.4, -70.6).unwrap();
        let mut stream = OpportunityStream::default();
        stream.load_templates(vec![template("santiago", Some(fixed))]);
        let m = stream.tick(&mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(m.geo, fixed);
    }

    #[test]
    fn test_load_templates_keeps_visible() {
        let mut stream = OpportunityStream::default();
        stream.load_templates(vec![template("a", None)]);
        let mut rng = StdRng::seed_from_u64(9);
        stream.tick(&mut rng);
        stream.tick(&mut rng);
        stream.load_templates(Vec::new());
        assert_eq!(stream.len(), 2);
        assert!(stream.tick(&mut rng).is_none());
    }

    #[test]
    fn test_nearest_uses_degree_space() {
        let mut stream = OpportunityStream::default();
        stream.push(marker_at("far-east", 0.0, 179.0));
        stream.push(marker_at("mid", 0.0, 120.0));
        // Across the antimeridian "far-east" is 2 degrees away on the globe,
        // but planar distance picks "mid".
        let query = GeoPoint::new(0.0, -179.0).unwrap();
        assert_eq!(stream.nearest_to(&query).unwrap().id, "mid");

        let query = GeoPoint::new(1.0, 178.0).unwrap();
        assert_eq!(stream.nearest_to(&query).unwrap().id, "far-east");
    }

    #[test]
    fn test_nearest_on_empty_window() {
        let stream = OpportunityStream::default();
        assert!(stream.nearest_to(&GeoPoint::new(0.0, 0.0).unwrap()).is_none());
    }

    #[test]
    fn test_template_deserializes_offer_shape() {
        let json = r#"{
            "id": "o1",
            "title": "Debris removal",
            "provider": "CleanOrbit",
            "serviceType": "Remediation",
            "priceUsd": 250000,
            "description": "Capture of a defunct upper stage"
        }"#;
        let t: OpportunityTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(t.partner, "CleanOrbit");
        assert_eq!(t.category, "Remediation");
        assert_eq!(t.potential_value, 250000.0);
        assert_eq!(t.currency, "USD");
        assert!(t.geo().is_none());
    }
}
