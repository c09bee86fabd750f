//! Normaliser for the GDACS event list (GeoJSON feature collection).
//!
//! GDACS properties are loosely typed and vary between event types, so the
//! payload is walked as a `serde_json::Value` rather than a fixed schema.

use serde_json::Value;

use super::{EventSource, SceneEvent};
use crate::types::GeoPoint;

/// Parse a GDACS payload into scene events.
pub fn normalize(payload: &str) -> Result<Vec<SceneEvent>, serde_json::Error> {
    let root: Value = serde_json::from_str(payload)?;
    let events: Vec<SceneEvent> = root
        .get("features")
        .and_then(Value::as_array)
        .map(|features| features.iter().filter_map(to_scene_event).collect())
        .unwrap_or_default();
    Ok(events)
}

fn to_scene_event(feature: &Value) -> Option<SceneEvent> {
    let props = feature.get("properties").unwrap_or(&Value::Null);
    let coordinates = feature
        .get("geometry")
        .and_then(|g| g.get("coordinates"))
        .and_then(Value::as_array);

    let lat = number(props.get("lat"))
        .or_else(|| coordinates.and_then(|c| number(c.get(1))))?;
    let lon = number(props.get("lon"))
        .or_else(|| coordinates.and_then(|c| number(c.first())))?;
    let geo = GeoPoint::new(lat, lon)?;

    let category = text(props.get("eventtype"))
        .or_else(|| text(props.get("eventType")))
        .unwrap_or_else(|| "Event".to_string());

    let title = text(props.get("name"))
        .or_else(|| text(props.get("title")))
        .unwrap_or_else(|| category.clone());

    let link = report_link(props.get("url"))
        .or_else(|| text(props.get("episodeLink")))
        .unwrap_or_else(|| EventSource::Gdacs.home_url().to_string());

    Some(SceneEvent::styled(EventSource::Gdacs, title, category, geo, link))
}

/// Numbers sometimes arrive as strings.
fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    value?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `url` is either a plain string or an object of named report links.
fn report_link(value: Option<&Value>) -> Option<String> {
    let value = value?;
    text(Some(value))
        .or_else(|| text(value.get("report")))
        .or_else(|| text(value.get("details")))
}
