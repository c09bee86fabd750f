//! Normaliser for the NASA EONET v3 events feed.

use serde::Deserialize;
use serde_json::Value;

use super::{EventSource, SceneEvent};
use crate::types::GeoPoint;

#[derive(Deserialize, Debug, Default)]
struct EonetResponse {
    #[serde(default)]
    events: Vec<EonetEvent>,
}

#[derive(Deserialize, Debug, Default)]
struct EonetEvent {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    categories: Vec<EonetCategory>,
    #[serde(default)]
    sources: Vec<EonetSource>,
    #[serde(default)]
    geometry: Vec<EonetGeometry>,
}

#[derive(Deserialize, Debug, Default)]
struct EonetCategory {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct EonetSource {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct EonetGeometry {
    #[serde(default)]
    coordinates: Value,
}

/// Parse an EONET payload into scene events.
///
/// Events whose first geometry is not a `[lon, lat]` point inside the valid
/// ranges are dropped.
pub fn normalize(payload: &str) -> Result<Vec<SceneEvent>, serde_json::Error> {
    let response: EonetResponse = serde_json::from_str(payload)?;
    Ok(response.events.into_iter().filter_map(to_scene_event).collect())
}

fn to_scene_event(event: EonetEvent) -> Option<SceneEvent> {
    let geo = event.geometry.first().and_then(|g| point(&g.coordinates))?;

    let category = event
        .categories
        .into_iter()
        .next()
        .and_then(|c| c.title)
        .unwrap_or_else(|| "Event".to_string());

    let link = event
        .sources
        .into_iter()
        .next()
        .and_then(|s| s.url)
        .unwrap_or_else(|| EventSource::Eonet.home_url().to_string());

    let title = event.title.unwrap_or_else(|| category.clone());

    Some(SceneEvent::styled(EventSource::Eonet, title, category, geo, link))
}

fn point(coordinates: &Value) -> Option<GeoPoint> {
    let pair = coordinates.as_array()?;
    let lon = pair.first()?.as_f64()?;
    let lat = pair.get(1)?.as_f64()?;
    GeoPoint::new(lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb;

    const SAMPLE: &str = r#"{
        "title": "EONET Events",
        "events": [
            {
                "id": "EONET_1",
                "title": "Wildfire - Alberta",
                "categories": [{"id": "wildfires", "title": "Wildfires"}],
                "sources": [{"id": "InciWeb", "url": "https://inciweb.example/1"}],
                "geometry": [{"type": "Point", "coordinates": [-115.5, 55.2]}]
            },
            {
                "id": "EONET_2",
                "title": "Iceberg A68",
                "categories": [{"title": "Sea and Lake Ice"}],
                "sources": [],
                "geometry": [{"type": "Point", "coordinates": [-40.0, -60.0]}]
            },
            {
                "id": "EONET_3",
                "title": "No geometry",
                "categories": [{"title": "Volcanoes"}],
                "geometry": []
            },
            {
                "id": "EONET_4",
                "title": "Polygon event",
                "categories": [{"title": "Floods"}],
                "geometry": [{"type": "Polygon", "coordinates": [[[1.0, 2.0], [3.0, 4.0]]]}]
            }
        ]
    }"#;

    #[test]
    fn test_normalizes_points_and_drops_unmappable() {
        let events = normalize(SAMPLE).unwrap();
        assert_eq!(events.len(), 2);

        let fire = &events[0];
        assert_eq!(fire.source, EventSource::Eonet);
        assert_eq!(fire.category, "Wildfires");
        assert_eq!(fire.geo.lat(), 55.2);
        assert_eq!(fire.geo.lon(), -115.5);
        assert_eq!(fire.link, "https://inciweb.example/1");
        assert!(fire.image.is_some());
        assert_eq!(fire.color, Rgb::hex(0xff4d4d));
    }

    #[test]
    fn test_unmapped_category_gets_fallback() {
        let events = normalize(SAMPLE).unwrap();
        let ice = &events[1];
        assert!(ice.image.is_none());
        assert_eq!(ice.color, Rgb::hex(0xffaa00));
        assert_eq!(ice.link, EventSource::Eonet.home_url());
    }

    #[test]
    fn test_missing_events_array() {
        assert!(normalize("{}").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(normalize("<html>").is_err());
    }
}
