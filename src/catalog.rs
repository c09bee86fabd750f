//! Read-only catalogue access.
//!
//! The scene reads opportunity templates and collision metrics through
//! [`CatalogSource`]; the binary backs it with JSON files on disk, tests with
//! in-memory records.

use std::path::PathBuf;

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::geo::AltitudeBand;
use crate::opportunity::{OpportunityStream, OpportunityTemplate};
use crate::risk::{RiskHalos, RiskZone};

/// File holding the opportunity templates.
pub const OFFERS_FILE: &str = "offers.json";

/// File holding the collision-monitor document.
pub const COLLISION_FILE: &str = "collision_data.json";

/// Errors reading catalogue records.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalogue: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalogue file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// The collision-monitor document.
#[derive(Resource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionMetrics {
    /// Tracked debris fragments.
    #[serde(default)]
    pub fragments: Option<u64>,
    /// Active satellites.
    #[serde(default)]
    pub satellites: Option<u64>,
    #[serde(default)]
    pub risk_zones: Vec<RiskZone>,
    #[serde(default)]
    pub alerts: Vec<String>,
}

impl CollisionMetrics {
    /// Average LEO density as reported: the first zone's density.
    pub fn average_density(&self) -> Option<f32> {
        self.risk_zones.first().map(|zone| zone.density)
    }
}

/// Read-only access to catalogue records.
pub trait CatalogSource: Send + Sync {
    fn opportunity_templates(&self) -> Result<Vec<OpportunityTemplate>, CatalogError>;

    fn collision_metrics(&self) -> Result<CollisionMetrics, CatalogError>;
}

/// Catalogue read from JSON files in a data directory.
pub struct JsonCatalog {
    dir: PathBuf,
}

impl JsonCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<T, CatalogError> {
        let path = self.dir.join(file);
        let text = std::fs::read_to_string(&path)?;
        serde_json::from_str(&text).map_err(|source| CatalogError::Json { path, source })
    }
}

impl CatalogSource for JsonCatalog {
    fn opportunity_templates(&self) -> Result<Vec<OpportunityTemplate>, CatalogError> {
        self.read(OFFERS_FILE)
    }

    fn collision_metrics(&self) -> Result<CollisionMetrics, CatalogError> {
        self.read(COLLISION_FILE)
    }
}

/// Catalogue held in memory.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    pub templates: Vec<OpportunityTemplate>,
    pub metrics: CollisionMetrics,
}

impl CatalogSource for StaticCatalog {
    fn opportunity_templates(&self) -> Result<Vec<OpportunityTemplate>, CatalogError> {
        Ok(self.templates.clone())
    }

    fn collision_metrics(&self) -> Result<CollisionMetrics, CatalogError> {
        Ok(self.metrics.clone())
    }
}

/// The catalogue the scene loads from.
#[derive(Resource)]
pub struct Catalog(pub Box<dyn CatalogSource>);

impl Default for Catalog {
    fn default() -> Self {
        Self(Box::new(StaticCatalog::default()))
    }
}

/// Plugin loading the catalogue into the stream and halo resources.
pub struct CatalogPlugin;

impl Plugin for CatalogPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Catalog>()
            .init_resource::<CollisionMetrics>()
            .add_systems(Startup, load_catalog);
    }
}

/// Load templates and metrics once. A failing half is logged and leaves the
/// corresponding state as it was.
pub fn load_catalog(
    catalog: Res<Catalog>,
    mut stream: ResMut<OpportunityStream>,
    mut metrics: ResMut<CollisionMetrics>,
    mut halos: ResMut<RiskHalos>,
) {
    match catalog.0.opportunity_templates() {
        Ok(templates) => {
            info!("Loaded {} opportunity templates", templates.len());
            stream.load_templates(templates);
        }
        Err(err) => warn!("Opportunity templates unavailable: {err}"),
    }

    match catalog.0.collision_metrics() {
        Ok(loaded) => {
            *halos = RiskHalos::from_zones(loaded.risk_zones.clone(), &AltitudeBand::LEO);
            info!("Loaded {} risk zones", halos.len());
            *metrics = loaded;
        }
        Err(err) => warn!("Collision metrics unavailable: {err}"),
    }
}
