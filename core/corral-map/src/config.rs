use corral_types::Coordinate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Initial view and tile source of a map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    /// Id of the element the map mounts into.
    pub container: String,
    pub center: Coordinate,
    pub zoom: u8,
    /// Zoom used when the view centres on a single pin.
    pub focus_zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container: "ranch-map".to_string(),
            center: Coordinate::new(17.989, -92.9465),
            zoom: 13,
            focus_zoom: 16,
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
        }
    }
}
