//! Map settings handed to the client.

use serde::{Deserialize, Serialize};
use store::LatLng;

/// Jakarta.
pub const DEFAULT_CENTER: LatLng = LatLng::new(-6.2088, 106.8456);
pub const DEFAULT_ZOOM: u8 = 12;

/// Tile source and initial viewport for the map view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapSettings {
    /// URL template with `{z}`, `{x}`, `{y}` and optionally `{key}` placeholders.
    pub tile_url: String,
    pub api_key: String,
    pub center: LatLng,
    pub zoom: u8,
}

impl MapSettings {
    pub fn new(tile_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            tile_url: tile_url.into(),
            api_key: api_key.into(),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }

    /// URL of one tile.
    pub fn tile(&self, z: u8, x: u32, y: u32) -> String {
        self.tile_url
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
            .replace("{key}", &self.api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_url_expansion() {
        let settings = MapSettings::new(
            "https://tiles.example.com/{z}/{x}/{y}.png?key={key}",
            "secret",
        );
        assert_eq!(
            settings.tile(12, 3265, 2119),
            "https://tiles.example.com/12/3265/2119.png?key=secret"
        );
        assert_eq!(settings.center, DEFAULT_CENTER);
        assert_eq!(settings.zoom, 12);
    }
}
