//! Procedural orbital swarms (active satellites and debris).
//!
//! Bodies are sampled once when a swarm is generated and then advanced
//! deterministically every frame. Generation is deliberately unseeded in the
//! app: mounting the scene again produces a different population. Tests
//! thread a seeded RNG through [`OrbitalSwarm::generate`] instead.

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geo::{AltitudeBand, orbital_position};
use crate::scene::SceneSet;
use crate::types::{Rgb, SceneClock};

/// Wobble amplitude band (radians) for chaotic populations.
pub const WOBBLE_RANGE: (f32, f32) = (0.02, 0.07);

/// Frequency multiplier of the inclination wobble relative to the phase.
pub const WOBBLE_FREQUENCY: f32 = 1.7;

/// Phase is kept within one shared period of the orbit and the wobble
/// (`1.7 = 17/10`, so both repeat after 20π).
pub const PHASE_PERIOD: f32 = 10.0 * TAU;

/// Which population a body belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Satellite,
    Debris,
}

impl BodyKind {
    pub fn label(&self) -> &'static str {
        match self {
            BodyKind::Satellite => "Active satellite",
            BodyKind::Debris => "Debris fragment",
        }
    }
}

/// Orbital parameters of one simulated object.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitalBody {
    pub kind: BodyKind,
    /// Orbit radius in scene units.
    pub radius: f32,
    /// Phase advance in radians per scene second.
    pub angular_speed: f32,
    /// Polar angle of the orbit, radians in [0, π].
    pub inclination: f32,
    /// Current azimuth, radians in [0, [`PHASE_PERIOD`]).
    pub phase: f32,
    /// Inclination wobble amplitude; zero for well-behaved orbits.
    pub wobble_amplitude: f32,
}

impl OrbitalBody {
    /// Move along the orbit by `delta` scene seconds (negative rewinds).
    pub fn advance(&mut self, delta: f32) {
        let step = self.angular_speed * delta;
        self.phase = (self.phase.rem_euclid(PHASE_PERIOD) + step).rem_euclid(PHASE_PERIOD);
    }

    /// Inclination after applying the phase-driven wobble.
    pub fn effective_inclination(&self) -> f32 {
        if self.wobble_amplitude > 0.0 {
            self.inclination + self.wobble_amplitude * (self.phase * WOBBLE_FREQUENCY).sin()
        } else {
            self.inclination
        }
    }

    /// Current scene position relative to the globe centre.
    pub fn position(&self) -> Vec3 {
        orbital_position(self.radius, self.effective_inclination(), self.phase)
    }
}

/// Parameters for generating one population.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwarmSpec {
    pub kind: BodyKind,
    pub count: usize,
    pub color: Rgb,
    /// Closed radius band (scene units).
    pub radius_range: (f32, f32),
    /// Closed angular speed band (radians per second).
    pub speed_range: (f32, f32),
    /// Whether bodies wobble in inclination.
    pub chaotic: bool,
    /// Rendered sphere radius of each body.
    pub marker_size: f32,
}

impl SwarmSpec {
    /// Well-behaved active satellites between 520 and 900 km.
    pub fn satellites(band: &AltitudeBand) -> Self {
        Self {
            kind: BodyKind::Satellite,
            count: 48,
            color: Rgb::hex(0x4cc9ff),
            radius_range: band.radius_range(520.0, 900.0),
            speed_range: (0.3, 0.6),
            chaotic: false,
            marker_size: 0.035,
        }
    }

    /// Faster, wobbling debris between 650 and 1250 km.
    pub fn debris(band: &AltitudeBand) -> Self {
        Self {
            kind: BodyKind::Debris,
            count: 120,
            color: Rgb::hex(0xff5e57),
            radius_range: band.radius_range(650.0, 1250.0),
            speed_range: (0.6, 1.1),
            chaotic: true,
            marker_size: 0.028,
        }
    }
}

/// Sample uniformly from a closed band, tolerating reversed or empty bands.
fn sample_band(rng: &mut impl Rng, (a, b): (f32, f32)) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if lo == hi { lo } else { rng.gen_range(lo..=hi) }
}

/// One population of bodies with its generation parameters.
#[derive(Clone, Debug)]
pub struct OrbitalSwarm {
    pub spec: SwarmSpec,
    pub bodies: Vec<OrbitalBody>,
}

impl OrbitalSwarm {
    /// Generate `spec.count` bodies with randomised orbits.
    pub fn generate(spec: SwarmSpec, rng: &mut impl Rng) -> Self {
        let bodies = (0..spec.count)
            .map(|_| OrbitalBody {
                kind: spec.kind,
                radius: sample_band(rng, spec.radius_range),
                angular_speed: sample_band(rng, spec.speed_range),
                inclination: rng.gen_range(0.0..=PI),
                phase: rng.gen_range(0.0..=TAU),
                wobble_amplitude: if spec.chaotic {
                    sample_band(rng, WOBBLE_RANGE)
                } else {
                    0.0
                },
            })
            .collect();

        Self { spec, bodies }
    }

    /// Advance every body by `delta` scene seconds.
    pub fn tick(&mut self, delta: f32) {
        for body in &mut self.bodies {
            body.advance(delta);
        }
    }

    /// Current positions, indexed like `bodies`.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.bodies.iter().map(OrbitalBody::position)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// All populations in the scene. Only [`tick_swarms`] mutates it.
#[derive(Resource, Default, Debug)]
pub struct Swarms {
    pub populations: Vec<OrbitalSwarm>,
}

impl Swarms {
    pub fn body(&self, member: &SwarmMember) -> Option<&OrbitalBody> {
        self.populations
            .get(member.swarm)
            .and_then(|s| s.bodies.get(member.index))
    }

    pub fn total_bodies(&self) -> usize {
        self.populations.iter().map(OrbitalSwarm::len).sum()
    }
}

/// Links a scene entity to a body in [`Swarms`].
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwarmMember {
    pub swarm: usize,
    pub index: usize,
}

/// Populations to generate at startup.
#[derive(Resource, Clone, Debug)]
pub struct SwarmSpecs(pub Vec<SwarmSpec>);

impl Default for SwarmSpecs {
    fn default() -> Self {
        let band = AltitudeBand::LEO;
        Self(vec![SwarmSpec::satellites(&band), SwarmSpec::debris(&band)])
    }
}

/// Plugin generating the swarms and advancing them every frame.
pub struct SwarmPlugin;

impl Plugin for SwarmPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SwarmSpecs>()
            .init_resource::<Swarms>()
            .add_systems(Startup, spawn_swarms)
            .add_systems(
                Update,
                (tick_swarms, sync_swarm_transforms)
                    .chain()
                    .in_set(SceneSet::Simulate),
            );
    }
}

/// Generate every population and spawn one entity per body.
fn spawn_swarms(mut commands: Commands, specs: Res<SwarmSpecs>, mut swarms: ResMut<Swarms>) {
    let mut rng = rand::thread_rng();

    swarms.populations = specs
        .0
        .iter()
        .cloned()
        .map(|spec| OrbitalSwarm::generate(spec, &mut rng))
        .collect();

    for (swarm_index, swarm) in swarms.populations.iter().enumerate() {
        for (index, body) in swarm.bodies.iter().enumerate() {
            commands.spawn((
                Transform::from_translation(body.position()),
                SwarmMember {
                    swarm: swarm_index,
                    index,
                },
            ));
        }
    }

    info!(
        "Spawned {} swarm bodies in {} populations",
        swarms.total_bodies(),
        swarms.populations.len()
    );
}

/// Advance all populations by the scene delta.
pub fn tick_swarms(mut swarms: ResMut<Swarms>, clock: Res<SceneClock>) {
    for swarm in &mut swarms.populations {
        swarm.tick(clock.delta);
    }
}

/// Copy body positions into their entities' transforms.
pub fn sync_swarm_transforms(swarms: Res<Swarms>, mut query: Query<(&SwarmMember, &mut Transform)>) {
    for (member, mut transform) in query.iter_mut() {
        if let Some(body) = swarms.body(member) {
            transform.translation = body.position();
        }
    }
}
