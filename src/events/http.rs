//! HTTP JSON hazard feeds backed by a blocking `ureq` agent.

use std::time::Duration;

use super::{EventSource, FeedError, HazardFeed, SceneEvent, eonet, gdacs};

/// Default EONET endpoint.
pub const EONET_URL: &str = "https://eonet.gsfc.nasa.gov/api/v3/events";

/// Default GDACS endpoint, filtered to the event types the globe can show.
pub const GDACS_URL: &str =
    "https://www.gdacs.org/gdacsapi/api/events/geteventlist/SEARCH?eventTypes=WF,TC,FL,VO";

/// A feed fetched with one GET request and normalised by source.
pub struct HttpFeed {
    source: EventSource,
    url: String,
    agent: ureq::Agent,
}

impl HttpFeed {
    pub fn new(source: EventSource, url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            source,
            url: url.into(),
            agent,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl HazardFeed for HttpFeed {
    fn source(&self) -> EventSource {
        self.source
    }

    fn fetch(&self) -> Result<Vec<SceneEvent>, FeedError> {
        let body = self
            .agent
            .get(&self.url)
            .set("Accept", "application/json")
            .call()
            .map_err(Box::new)?
            .into_string()?;

        let events = match self.source {
            EventSource::Eonet => eonet::normalize(&body)?,
            EventSource::Gdacs => gdacs::normalize(&body)?,
        };
        Ok(events)
    }
}
