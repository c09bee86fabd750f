//! Core value types and scene constants shared by every module.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Scene constants (render units, 1.0 = half an Earth radius)

/// Radius of the textured globe.
pub const GLOBE_RADIUS: f32 = 2.0;

/// Radius of the soft atmosphere shell, also the surface hazard markers sit on.
pub const ATMOSPHERE_RADIUS: f32 = 2.05;

/// Radius at which opportunity markers are placed (just above hazard markers).
pub const OPPORTUNITY_RADIUS: f32 = 2.08;

/// Degrees to radians conversion factor
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Radians to degrees conversion factor
pub const RAD_TO_DEG: f64 = 180.0 / std::f64::consts::PI;

/// Common period (seconds) of every scene-time animation: `sin(1.4t)`,
/// `sin(2t)` and their index offsets all repeat after 10π.
pub const ANIMATION_PERIOD: f64 = 10.0 * std::f64::consts::PI;

/// A geographic coordinate in degrees.
///
/// Latitude is always within [-90, 90] and longitude within [-180, 180];
/// the only ways to build one check or guarantee that.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = String;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.lat, raw.lon)
            .ok_or_else(|| format!("coordinate out of range: lat={}, lon={}", raw.lat, raw.lon))
    }
}

impl GeoPoint {
    /// Create a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        valid.then_some(Self { lat, lon })
    }

    /// Sample a point uniformly over the latitude and longitude ranges.
    ///
    /// Uniform in degrees, not in area: points cluster towards the poles.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            lat: rng.gen_range(-90.0..=90.0),
            lon: rng.gen_range(-180.0..=180.0),
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Euclidean distance in raw (lat, lon) degree space.
    ///
    /// This is not a great-circle distance: it ignores longitude wrap-around
    /// and meridian convergence.
    pub fn planar_distance(&self, other: &GeoPoint) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        (dlat * dlat + dlon * dlon).sqrt()
    }
}

/// An 8-bit sRGB colour as carried in data records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Build from a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::hex)
    }

    pub fn to_color(self) -> Color {
        Color::srgb_u8(self.r, self.g, self.b)
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        rgb.to_color()
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::parse(&value).ok_or_else(|| format!("invalid colour: {value}"))
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
    }
}

/// Elapsed scene time driving every time-dependent animation.
#[derive(Resource, Clone, Debug)]
pub struct SceneClock {
    /// Seconds of scene time since the scene was mounted.
    /// f64 so long-running displays keep per-frame resolution.
    pub elapsed: f64,
    /// Scene seconds advanced in the current frame.
    pub delta: f32,
    /// Time scale multiplier (1.0 = real time).
    pub scale: f32,
    /// Whether the animation is frozen.
    pub paused: bool,
}

impl Default for SceneClock {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            delta: 0.0,
            scale: 1.0,
            paused: false,
        }
    }
}

impl SceneClock {
    /// Advance by `real_delta` real seconds, honouring scale and pause.
    pub fn advance(&mut self, real_delta: f32) {
        self.delta = if self.paused {
            0.0
        } else {
            real_delta * self.scale
        };
        self.elapsed += f64::from(self.delta);
    }

    /// Elapsed time folded into one [`ANIMATION_PERIOD`], for the `f32`
    /// pulse and opacity curves.
    pub fn animation_time(&self) -> f32 {
        self.elapsed.rem_euclid(ANIMATION_PERIOD) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_geo_point_ranges() {
        assert!(GeoPoint::new(90.0, 180.0).is_some());
        assert!(GeoPoint::new(-90.0, -180.0).is_some());
        assert!(GeoPoint::new(90.1, 0.0).is_none());
        assert!(GeoPoint::new(0.0, -180.5).is_none());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn test_random_geo_point_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let p = GeoPoint::random(&mut rng);
            assert!((-90.0..=90.0).contains(&p.lat()));
            assert!((-180.0..=180.0).contains(&p.lon()));
        }
    }

    #[test]
    fn test_planar_distance_ignores_wraparound() {
        let west = GeoPoint::new(0.0, -179.0).unwrap();
        let east = GeoPoint::new(0.0, 179.0).unwrap();
        // Two degrees apart on the globe, 358 in degree space.
        assert!((west.planar_distance(&east) - 358.0).abs() < 1e-9);
    }

    #[test]
    fn test_geo_point_deserialize_rejects_out_of_range() {
        let ok: Result<GeoPoint, _> = serde_json::from_str(r#"{"lat": 10.0, "lon": 20.0}"#);
        assert!(ok.is_ok());
        let bad: Result<GeoPoint, _> = serde_json::from_str(r#"{"lat": 100.0, "lon": 20.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_rgb_hex_and_parse() {
        let rgb = Rgb::hex(0xff4d4d);
        assert_eq!((rgb.r, rgb.g, rgb.b), (0xff, 0x4d, 0x4d));
        assert_eq!(Rgb::parse("#ff4d4d"), Some(rgb));
        assert_eq!(Rgb::parse("43c6f9"), Some(Rgb::hex(0x43c6f9)));
        assert_eq!(Rgb::parse("#fff"), None);
        assert_eq!(String::from(rgb), "#ff4d4d");
    }

    #[test]
    fn test_scene_clock_pause_and_scale() {
        let mut clock = SceneClock::default();
        clock.advance(0.5);
        assert_eq!(clock.elapsed, 0.5);

        clock.scale = 2.0;
        clock.advance(0.5);
        assert_eq!(clock.elapsed, 1.5);
        assert_eq!(clock.delta, 1.0);

        clock.paused = true;
        clock.advance(0.5);
        assert_eq!(clock.elapsed, 1.5);
        assert_eq!(clock.delta, 0.0);
    }

    #[test]
    fn test_scene_clock_keeps_resolution_after_days() {
        // Four days of uptime.
        let mut clock = SceneClock {
            elapsed: 345_600.0,
            ..SceneClock::default()
        };
        for _ in 0..600 {
            clock.advance(1.0 / 60.0);
        }
        assert!((clock.elapsed - 345_610.0).abs() < 1e-4, "{}", clock.elapsed);
    }

    #[test]
    fn test_animation_time_is_folded() {
        let mut clock = SceneClock {
            elapsed: 345_600.0,
            ..SceneClock::default()
        };
        let t = clock.animation_time();
        assert!((0.0..ANIMATION_PERIOD as f32).contains(&t));

        // One frame later the folded time moves by one frame.
        clock.advance(1.0 / 60.0);
        let step = (clock.animation_time() - t).rem_euclid(ANIMATION_PERIOD as f32);
        assert!((step - 1.0 / 60.0).abs() < 1e-4, "step {step}");

        // The curves repeat after one period.
        let base = 1.234_f64;
        let a = (2.0 * base).sin();
        let b = (2.0 * (base + ANIMATION_PERIOD)).sin();
        let c = (1.4 * base + 3.0).sin();
        let d = (1.4 * (base + ANIMATION_PERIOD) + 3.0).sin();
        assert!((a - b).abs() < 1e-9 && (c - d).abs() < 1e-9);
    }
}
