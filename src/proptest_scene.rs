//! Property-based tests for the scene model using proptest.
//!
//! These cover the invariants every frame relies on: projection geometry,
//! the altitude mapping, the bounded opportunity window and orbit motion.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::geo::{AltitudeBand, orbital_position, project, unproject};
use crate::opportunity::{OpportunityStream, OpportunityTemplate};
use crate::risk::{halo_opacity, pulse_scale};
use crate::swarm::{BodyKind, OrbitalBody};
use crate::types::{GeoPoint, SceneClock};

fn template(id: usize) -> OpportunityTemplate {
    OpportunityTemplate {
        id: format!("off-{id}"),
        title: format!("Offer {id}"),
        lat: None,
        lon: None,
        risk_level: "Medium".to_string(),
        category: "Insurance".to_string(),
        potential_value: 2500.0,
        currency: "USD".to_string(),
        partner: "Orbital Mutual".to_string(),
        description: String::new(),
        image: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Projected points sit exactly on the requested sphere.
    #[test]
    fn prop_projection_lies_on_sphere(
        lat in -90.0f64..=90.0,
        lon in -180.0f64..=180.0,
        radius in 0.5f32..10.0,
    ) {
        let geo = GeoPoint::new(lat, lon).unwrap();
        let p = project(geo, radius);
        prop_assert!(
            (p.length() - radius).abs() < radius * 1e-5,
            "|p|={} radius={}", p.length(), radius
        );
    }

    /// Unprojecting a projected point recovers the coordinate.
    ///
    /// Poles and the antimeridian are excluded: longitude is degenerate at
    /// the former and wraps at the latter.
    #[test]
    fn prop_unproject_inverts_project(
        lat in -89.0f64..89.0,
        lon in -179.5f64..179.5,
        radius in 1.0f32..5.0,
    ) {
        let geo = GeoPoint::new(lat, lon).unwrap();
        let back = unproject(project(geo, radius)).unwrap();
        prop_assert!((back.lat() - lat).abs() < 1e-2, "lat {} -> {}", lat, back.lat());
        prop_assert!((back.lon() - lon).abs() < 1e-2, "lon {} -> {}", lon, back.lon());
    }

    /// The altitude mapping is monotone and never leaves the radius band.
    #[test]
    fn prop_altitude_mapping_monotone_and_saturating(
        a in -1000.0f32..5000.0,
        b in -1000.0f32..5000.0,
    ) {
        let band = AltitudeBand::LEO;
        let (lo_km, hi_km) = if a <= b { (a, b) } else { (b, a) };
        let lo = band.radius_for(lo_km);
        let hi = band.radius_for(hi_km);
        prop_assert!(lo <= hi);
        for r in [lo, hi] {
            prop_assert!((band.min_radius..=band.max_radius).contains(&r));
        }
    }

    /// The visible window never exceeds its capacity and always holds the
    /// most recent markers.
    #[test]
    fn prop_window_is_bounded(
        capacity in 1usize..12,
        templates in 1usize..6,
        ticks in 0usize..60,
        seed in any::<u64>(),
    ) {
        let mut stream = OpportunityStream::with_capacity(capacity);
        stream.load_templates((0..templates).map(template).collect());
        let mut rng = StdRng::seed_from_u64(seed);

        let mut appended = Vec::new();
        for _ in 0..ticks {
            if let Some(marker) = stream.tick(&mut rng) {
                appended.push(marker.clone());
            }
            prop_assert!(stream.len() <= capacity);
        }

        prop_assert_eq!(stream.len(), ticks.min(capacity));
        prop_assert_eq!(stream.appended(), ticks as u64);
        let expected = &appended[appended.len() - stream.len()..];
        let visible: Vec<_> = stream.visible().cloned().collect();
        prop_assert_eq!(visible.as_slice(), expected);
    }

    /// Advancing a body and then rewinding by the same delta restores it.
    #[test]
    fn prop_orbit_advance_is_reversible(
        radius in 2.05f32..2.45,
        speed in 0.3f32..1.1,
        inclination in 0.0f32..std::f32::consts::PI,
        phase in 0.0f32..std::f32::consts::TAU,
        delta in 0.0f32..5.0,
    ) {
        let mut body = OrbitalBody {
            kind: BodyKind::Satellite,
            radius,
            angular_speed: speed,
            inclination,
            phase,
            wobble_amplitude: 0.0,
        };
        let start = body.position();
        body.advance(delta);
        body.advance(-delta);
        prop_assert!((body.position() - start).length() < 1e-4);
    }

    /// Orbits keep their radius at every phase.
    #[test]
    fn prop_orbit_radius_constant(
        radius in 2.05f32..2.45,
        inclination in 0.0f32..std::f32::consts::PI,
        phase in -100.0f32..100.0,
    ) {
        let p = orbital_position(radius, inclination, phase);
        prop_assert!((p.length() - radius).abs() < 1e-4);
    }

    /// Halo animation stays within its declared bounds.
    #[test]
    fn prop_halo_animation_bounded(t in 0.0f32..10_000.0, index in 0usize..16) {
        let opacity = halo_opacity(t, index);
        prop_assert!((0.10 - 1e-6..=0.26 + 1e-6).contains(&opacity));
        let scale = pulse_scale(t, index);
        prop_assert!(scale > 0.9 && scale < 1.1);
    }

    /// A paused clock never moves, whatever the frame delta.
    #[test]
    fn prop_paused_clock_is_frozen(
        deltas in prop::collection::vec(0.0f32..0.25, 0..20),
        scale in 0.0f32..8.0,
    ) {
        let mut clock = SceneClock { scale, paused: true, ..SceneClock::default() };
        for d in deltas {
            clock.advance(d);
            prop_assert_eq!(clock.delta, 0.0);
        }
        prop_assert_eq!(clock.elapsed, 0.0);
    }
}
