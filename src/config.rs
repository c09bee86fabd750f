//! Scene configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! overrides. The binary reads the file named by [`CONFIG_ENV`], if set, and
//! falls back to defaults with a warning when that file is unusable.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::events::{EONET_URL, EventAggregator, EventSource, GDACS_URL, HazardFeed, HttpFeed};
use crate::geo::AltitudeBand;
use crate::opportunity::{
    DEFAULT_CAPACITY, OpportunityStream, OpportunityTimer, TICK_INTERVAL_SECS,
};
use crate::scene::GLOBE_SPIN_SPEED;
use crate::swarm::{SwarmSpec, SwarmSpecs};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "LEO_MONITOR_CONFIG";

/// Errors reading a config file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tunables for the whole scene.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub eonet_url: String,
    pub gdacs_url: String,
    /// Per-request timeout for the hazard feeds.
    pub request_timeout_secs: u64,
    /// Show only hazard categories that have an illustration.
    pub only_with_image: bool,
    /// Directory holding `offers.json` and `collision_data.json`.
    pub data_dir: PathBuf,
    /// Asset path of the globe texture.
    pub earth_texture: String,
    pub opportunity_capacity: usize,
    pub opportunity_interval_secs: f32,
    /// Globe spin in radians per scene second.
    pub globe_spin_speed: f32,
    pub satellites: SwarmSpec,
    pub debris: SwarmSpec,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let band = AltitudeBand::LEO;
        Self {
            eonet_url: EONET_URL.to_string(),
            gdacs_url: GDACS_URL.to_string(),
            request_timeout_secs: 10,
            only_with_image: true,
            data_dir: PathBuf::from("assets/data"),
            earth_texture: "textures/earth_day.jpg".to_string(),
            opportunity_capacity: DEFAULT_CAPACITY,
            opportunity_interval_secs: TICK_INTERVAL_SECS,
            globe_spin_speed: GLOBE_SPIN_SPEED,
            satellites: SwarmSpec::satellites(&band),
            debris: SwarmSpec::debris(&band),
        }
    }
}

impl SceneConfig {
    /// Read a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Read the file named by [`CONFIG_ENV`], or defaults when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    /// The two HTTP hazard feeds, EONET first.
    pub fn feeds(&self) -> Vec<Arc<dyn HazardFeed>> {
        let timeout = Duration::from_secs(self.request_timeout_secs);
        vec![
            Arc::new(HttpFeed::new(EventSource::Eonet, &self.eonet_url, timeout)),
            Arc::new(HttpFeed::new(EventSource::Gdacs, &self.gdacs_url, timeout)),
        ]
    }

    pub fn event_aggregator(&self) -> EventAggregator {
        EventAggregator::new(self.feeds(), self.only_with_image)
    }

    pub fn swarm_specs(&self) -> SwarmSpecs {
        SwarmSpecs(vec![self.satellites.clone(), self.debris.clone()])
    }

    pub fn opportunity_stream(&self) -> OpportunityStream {
        OpportunityStream::with_capacity(self.opportunity_capacity)
    }

    pub fn opportunity_timer(&self) -> OpportunityTimer {
        OpportunityTimer::from_seconds(self.opportunity_interval_secs)
    }
}
