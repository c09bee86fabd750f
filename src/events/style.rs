//! Category presentation table for hazard markers.

use crate::types::Rgb;

/// Image and colour used to present a hazard category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Asset path of the category illustration.
    pub image: &'static str,
    pub color: Rgb,
}

const WILDFIRE: Presentation = Presentation {
    image: "images/wildfire.jpg",
    color: Rgb::hex(0xff4d4d),
};

const STORM: Presentation = Presentation {
    image: "images/storm.jpg",
    color: Rgb::hex(0xffd84d),
};

const VOLCANO: Presentation = Presentation {
    image: "images/volcano.jpg",
    color: Rgb::hex(0xff7a1a),
};

const FLOOD: Presentation = Presentation {
    image: "images/flood.jpg",
    color: Rgb::hex(0x43c6f9),
};

/// EONET category titles and GDACS event-type codes share one table.
const TABLE: &[(&str, Presentation)] = &[
    ("Wildfires", WILDFIRE),
    ("Severe Storms", STORM),
    ("Volcanoes", VOLCANO),
    ("Floods", FLOOD),
    ("WF", WILDFIRE),
    ("TC", STORM),
    ("FL", FLOOD),
    ("VO", VOLCANO),
];

/// Presentation for a category, or `None` if the category is unmapped.
pub fn presentation(category: &str) -> Option<&'static Presentation> {
    TABLE
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, p)| p)
}
