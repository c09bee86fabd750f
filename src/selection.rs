//! Click picking and the selection slots.
//!
//! Each kind of pickable thing fills its own slot; selecting one never
//! clears the others and never pauses the simulation. Slot values are
//! snapshots taken at click time, so later feed refreshes or window
//! evictions do not change an open detail view.

use bevy::prelude::*;

use crate::events::SceneEvent;
use crate::geo::unproject;
use crate::opportunity::{OpportunityMarker, OpportunityStream};
use crate::scene::{GlobeSpin, SceneSet};
use crate::swarm::{BodyKind, SwarmMember, Swarms};
use crate::types::{GLOBE_RADIUS, GeoPoint};

/// Pick spheres are this much larger than the rendered marker.
pub const PICK_MARGIN: f32 = 2.0;

/// Route of the insurance deep link.
pub const INSURANCE_ROUTE: &str = "/insurance";

/// Query string asking the insurance page to open its form.
pub const INSURANCE_QUERY: &str = "openInsurance=1";

/// What a pickable entity stands for.
#[derive(Clone, Debug, PartialEq)]
pub enum PickTarget {
    Event(SceneEvent),
    Opportunity(OpportunityMarker),
    Body(SwarmMember),
}

/// A clickable sphere around an entity's global position.
#[derive(Component, Clone, Debug)]
pub struct Pickable {
    pub target: PickTarget,
    pub radius: f32,
}

impl Pickable {
    /// Pickable for a marker drawn with `visual_radius`.
    pub fn new(target: PickTarget, visual_radius: f32) -> Self {
        Self {
            target,
            radius: visual_radius * PICK_MARGIN,
        }
    }
}

/// A selected swarm body.
#[derive(Clone, Debug, PartialEq)]
pub struct BodySelection {
    pub member: SwarmMember,
    pub kind: BodyKind,
    /// Orbit radius in scene units.
    pub radius: f32,
    /// Point below the body on the rotating globe.
    pub geo: Option<GeoPoint>,
    /// Nearest visible opportunity at click time.
    pub nearest: Option<OpportunityMarker>,
}

/// Independent selection slots.
#[derive(Resource, Clone, Debug, Default)]
pub struct Selection {
    pub event: Option<SceneEvent>,
    pub opportunity: Option<OpportunityMarker>,
    pub body: Option<BodySelection>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.event.is_none() && self.opportunity.is_none() && self.body.is_none()
    }
}

/// A completed left click, as a ray in world space.
#[derive(Message, Clone, Copy, Debug)]
pub struct PointerClick {
    pub ray: Ray3d,
}

/// Outbound deep link for the host application.
#[derive(Message, Clone, Debug, PartialEq, Eq)]
pub struct NavigationRequest {
    pub route: String,
    pub query: String,
}

impl NavigationRequest {
    /// Open the insurance form.
    pub fn insurance() -> Self {
        Self {
            route: INSURANCE_ROUTE.to_string(),
            query: INSURANCE_QUERY.to_string(),
        }
    }

    /// Route and query joined as a relative URL.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            self.route.clone()
        } else {
            format!("{}?{}", self.route, self.query)
        }
    }
}

/// Plugin owning the selection state and click routing.
pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Selection>()
            .add_message::<PointerClick>()
            .add_message::<NavigationRequest>()
            .add_systems(Update, route_clicks.in_set(SceneSet::Select));
    }
}

/// Distance along `ray` to the first intersection with a sphere, if any.
///
/// A ray starting inside the sphere hits its far side.
pub fn ray_sphere(ray: Ray3d, center: Vec3, radius: f32) -> Option<f32> {
    let dir = *ray.direction;
    let oc = ray.origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let near = -b - root;
    let far = -b + root;
    if far < 0.0 {
        None
    } else if near >= 0.0 {
        Some(near)
    } else {
        Some(far)
    }
}

/// The candidate whose sphere the ray hits closest to its origin.
pub fn pick_nearest<T>(
    ray: Ray3d,
    candidates: impl IntoIterator<Item = (T, Vec3, f32)>,
) -> Option<(T, f32)> {
    candidates
        .into_iter()
        .filter_map(|(item, center, radius)| ray_sphere(ray, center, radius).map(|t| (item, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Fill the selection slot matching what each click hit.
///
/// Markers hidden behind the globe cannot be picked.
pub fn route_clicks(
    mut clicks: MessageReader<PointerClick>,
    pickables: Query<(&Pickable, &GlobalTransform)>,
    swarms: Res<Swarms>,
    stream: Res<OpportunityStream>,
    spin: Res<GlobeSpin>,
    mut selection: ResMut<Selection>,
) {
    for click in clicks.read() {
        let horizon = ray_sphere(click.ray, Vec3::ZERO, GLOBE_RADIUS).unwrap_or(f32::INFINITY);

        let candidates = pickables
            .iter()
            .map(|(pickable, transform)| (&pickable.target, transform.translation(), pickable.radius));
        let Some((target, distance)) = pick_nearest(click.ray, candidates) else {
            continue;
        };
        if distance > horizon {
            continue;
        }

        match target {
            PickTarget::Event(event) => {
                debug!("Selected hazard event {}", event.title);
                selection.event = Some(event.clone());
            }
            PickTarget::Opportunity(marker) => {
                debug!("Selected opportunity {}", marker.id);
                selection.opportunity = Some(marker.clone());
            }
            PickTarget::Body(member) => {
                let Some(body) = swarms.body(member) else {
                    continue;
                };
                let geo = unproject(spin.to_globe_frame(body.position()));
                let nearest = geo.and_then(|g| stream.nearest_to(&g)).cloned();
                debug!("Selected {} #{}", body.kind.label(), member.index);

                if nearest.is_some() {
                    selection.opportunity = nearest.clone();
                }
                selection.body = Some(BodySelection {
                    member: *member,
                    kind: body.kind,
                    radius: body.radius,
                    geo,
                    nearest,
                });
            }
        }
    }
}
