//! Geographic and orbital projections into scene space.
//!
//! Every marker placed on or above the globe goes through [`project`], so
//! markers from different sources agree on where a coordinate sits.
//! Convention: latitude 90° is the scene +Y pole, longitude 0° lies on the
//! reference meridian and longitude grows eastward as a left-handed sweep.

use bevy::math::{DVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::types::{DEG_TO_RAD, GeoPoint, RAD_TO_DEG};

/// Project a geographic coordinate onto a sphere of the given radius.
pub fn project(geo: GeoPoint, radius: f32) -> Vec3 {
    let phi = (90.0 - geo.lat()) * DEG_TO_RAD;
    let theta = (geo.lon() + 180.0) * DEG_TO_RAD;
    let r = radius as f64;

    DVec3::new(
        -(r * phi.sin() * theta.cos()),
        r * phi.cos(),
        r * phi.sin() * theta.sin(),
    )
    .as_vec3()
}

/// Recover the geographic coordinate of a scene position.
///
/// Inverse of [`project`] for any radius. Returns `None` for the origin,
/// which has no direction.
pub fn unproject(position: Vec3) -> Option<GeoPoint> {
    let p = position.as_dvec3();
    let r = p.length();
    if r <= f64::EPSILON {
        return None;
    }

    let phi = (p.y / r).clamp(-1.0, 1.0).acos();
    let theta = p.z.atan2(-p.x);

    let lat = 90.0 - phi * RAD_TO_DEG;
    let mut lon = theta * RAD_TO_DEG - 180.0;
    if lon < -180.0 {
        lon += 360.0;
    }

    GeoPoint::new(lat.clamp(-90.0, 90.0), lon.clamp(-180.0, 180.0))
}

/// Position of an orbiting body given its polar angle and phase.
///
/// `inclination` plays the role of the polar angle measured from +Y and
/// `phase` the azimuth, so a body with constant inclination traces a circle
/// of latitude. This is a visual parametrisation, not Keplerian motion.
pub fn orbital_position(radius: f32, inclination: f32, phase: f32) -> Vec3 {
    Vec3::new(
        radius * inclination.sin() * phase.cos(),
        radius * inclination.cos(),
        radius * inclination.sin() * phase.sin(),
    )
}

/// Linear mapping from an altitude band (km) to a radius band (scene units).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AltitudeBand {
    pub min_km: f32,
    pub max_km: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl AltitudeBand {
    /// LEO shells 500–1300 km mapped just outside the globe (radius 2.0).
    pub const LEO: AltitudeBand = AltitudeBand {
        min_km: 500.0,
        max_km: 1300.0,
        min_radius: 2.05,
        max_radius: 2.45,
    };

    /// Scene radius for an altitude; saturates outside the band.
    pub fn radius_for(&self, km: f32) -> f32 {
        let span = self.max_km - self.min_km;
        let t = if span > 0.0 {
            ((km - self.min_km) / span).clamp(0.0, 1.0)
        } else if km >= self.max_km {
            1.0
        } else {
            0.0
        };
        // NaN altitudes fall through clamp unchanged; pin them to the floor.
        let t = if t.is_nan() { 0.0 } else { t };
        self.min_radius + t * (self.max_radius - self.min_radius)
    }

    /// Radius range covering an altitude range.
    pub fn radius_range(&self, min_km: f32, max_km: f32) -> (f32, f32) {
        (self.radius_for(min_km), self.radius_for(max_km))
    }
}

impl Default for AltitudeBand {
    fn default() -> Self {
        Self::LEO
    }
}

/// Free-function form of [`AltitudeBand::radius_for`].
pub fn altitude_to_radius(km: f32, band: &AltitudeBand) -> f32 {
    band.radius_for(km)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn geo(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn test_north_pole_is_plus_y() {
        let p = project(geo(90.0, 0.0), 2.0);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-6);
        assert!(p.x.abs() < 1e-6 && p.z.abs() < 1e-6);
    }

    #[test]
    fn test_reference_meridian_on_equator() {
        // lon 0 => theta = pi => x = -r*cos(pi) = r
        let p = project(geo(0.0, 0.0), 1.0);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-6);
        assert!(p.y.abs() < 1e-6);
        assert!(p.z.abs() < 1e-6);
    }

    #[test]
    fn test_east_sweep_direction() {
        // 90°E: theta = 3pi/2 => z = -r
        let p = project(geo(0.0, 90.0), 1.0);
        assert_relative_eq!(p.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let original = geo(37.5, -122.25);
        let back = unproject(project(original, 2.05)).unwrap();
        assert_relative_eq!(back.lat(), original.lat(), epsilon = 1e-3);
        assert_relative_eq!(back.lon(), original.lon(), epsilon = 1e-3);
    }

    #[test]
    fn test_unproject_origin() {
        assert!(unproject(Vec3::ZERO).is_none());
    }

    #[test]
    fn test_orbital_position_radius() {
        let p = orbital_position(2.3, 1.1, 4.0);
        assert_relative_eq!(p.length(), 2.3, epsilon = 1e-5);
        // inclination 0 sits on the +Y pole regardless of phase
        let pole = orbital_position(2.0, 0.0, 1.234);
        assert_relative_eq!(pole.y, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_altitude_band_endpoints_and_midpoint() {
        let band = AltitudeBand::LEO;
        assert_eq!(band.radius_for(500.0), 2.05);
        assert_eq!(band.radius_for(1300.0), 2.45);
        assert_relative_eq!(band.radius_for(900.0), 2.25, epsilon = 1e-6);
    }

    #[test]
    fn test_altitude_band_saturates() {
        let band = AltitudeBand::LEO;
        assert_eq!(band.radius_for(0.0), band.min_radius);
        assert_eq!(band.radius_for(-50.0), band.min_radius);
        assert_eq!(band.radius_for(36_000.0), band.max_radius);
        assert_eq!(band.radius_for(f32::NAN), band.min_radius);
    }

    #[test]
    fn test_free_function_matches_band() {
        let band = AltitudeBand::LEO;
        for km in [300.0, 750.0, 1200.0, 2000.0] {
            assert_eq!(altitude_to_radius(km, &band), band.radius_for(km));
        }
        assert!(altitude_to_radius(750.0, &band) < altitude_to_radius(1200.0, &band));
    }

    #[test]
    fn test_degenerate_band() {
        let band = AltitudeBand {
            min_km: 800.0,
            max_km: 800.0,
            min_radius: 2.1,
            max_radius: 2.2,
        };
        assert_eq!(band.radius_for(799.0), 2.1);
        assert_eq!(band.radius_for(800.0), 2.2);
    }
}
