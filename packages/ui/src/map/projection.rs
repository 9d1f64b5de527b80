//! Web Mercator math for a 256px slippy map.
//!
//! World pixel coordinates grow east and south from the antimeridian/north
//! edge; at zoom `z` the world is `256 * 2^z` pixels square. A [`Viewport`]
//! places that world under a container of known size, centered on a
//! coordinate.

use std::f64::consts::PI;

use store::LatLng;

pub const TILE_SIZE: f64 = 256.0;
pub const MIN_ZOOM: u8 = 2;
pub const MAX_ZOOM: u8 = 19;

/// Latitude where the Mercator square ends.
const MAX_LATITUDE: f64 = 85.051_128_78;

fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * 2f64.powi(zoom as i32)
}

/// Project a coordinate to world pixels at `zoom`.
pub fn project(position: LatLng, zoom: u8) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = position.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (position.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    (x, y)
}

/// Inverse of [`project`]. Longitudes wrap into `[-180, 180)`.
pub fn unproject(x: f64, y: f64, zoom: u8) -> LatLng {
    let size = world_size(zoom);
    let lng = (x / size * 360.0).rem_euclid(360.0) - 180.0;
    let n = PI - 2.0 * PI * y / size;
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat.clamp(-MAX_LATITUDE, MAX_LATITUDE), lng)
}

/// One tile to draw and where its top-left corner goes in the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub z: u8,
    pub x: u32,
    pub y: u32,
    pub left: f64,
    pub top: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: u8, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width,
            height,
        }
    }

    /// World pixel of the container's top-left corner.
    fn origin(&self) -> (f64, f64) {
        let (cx, cy) = project(self.center, self.zoom);
        (cx - self.width / 2.0, cy - self.height / 2.0)
    }

    /// Container offset of a coordinate.
    pub fn to_screen(&self, position: LatLng) -> (f64, f64) {
        let (ox, oy) = self.origin();
        let (x, y) = project(position, self.zoom);
        (x - ox, y - oy)
    }

    /// Coordinate under a container offset, e.g. a click.
    pub fn to_lat_lng(&self, offset_x: f64, offset_y: f64) -> LatLng {
        let (ox, oy) = self.origin();
        unproject(ox + offset_x, oy + offset_y, self.zoom)
    }

    /// Move the map content by `(dx, dy)` pixels.
    pub fn pan(&self, dx: f64, dy: f64) -> Self {
        Self {
            center: self.to_lat_lng(self.width / 2.0 - dx, self.height / 2.0 - dy),
            ..*self
        }
    }

    /// Change zoom keeping the coordinate under `(offset_x, offset_y)` in place.
    pub fn zoom_at(&self, zoom: u8, offset_x: f64, offset_y: f64) -> Self {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if zoom == self.zoom {
            return *self;
        }
        let anchor = self.to_lat_lng(offset_x, offset_y);
        let (ax, ay) = project(anchor, zoom);
        let cx = ax - (offset_x - self.width / 2.0);
        let cy = ay - (offset_y - self.height / 2.0);
        Self {
            center: unproject(cx, cy, zoom),
            zoom,
            ..*self
        }
    }

    pub fn resize(&self, width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..*self
        }
    }

    /// Tiles covering the container. Columns wrap around the antimeridian.
    pub fn tiles(&self) -> Vec<Tile> {
        let (ox, oy) = self.origin();
        let count = 1i64 << self.zoom;
        let first_x = (ox / TILE_SIZE).floor() as i64;
        let last_x = ((ox + self.width) / TILE_SIZE).floor() as i64;
        let first_y = ((oy / TILE_SIZE).floor() as i64).max(0);
        let last_y = (((oy + self.height) / TILE_SIZE).floor() as i64).min(count - 1);

        let mut tiles = Vec::new();
        for ty in first_y..=last_y {
            for tx in first_x..=last_x {
                tiles.push(Tile {
                    z: self.zoom,
                    x: tx.rem_euclid(count) as u32,
                    y: ty as u32,
                    left: tx as f64 * TILE_SIZE - ox,
                    top: ty as f64 * TILE_SIZE - oy,
                });
            }
        }
        tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAKARTA: LatLng = LatLng::new(-6.2088, 106.8456);

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_project_known_points() {
        assert_eq!(project(LatLng::new(0.0, 0.0), 0), (128.0, 128.0));
        let (x, _) = project(LatLng::new(0.0, -180.0), 3);
        assert!(close(x, 0.0));
    }

    #[test]
    fn test_unproject_inverts_project() {
        let (x, y) = project(JAKARTA, 12);
        let back = unproject(x, y, 12);
        assert!(close(back.lat, JAKARTA.lat));
        assert!(close(back.lng, JAKARTA.lng));
    }

    #[test]
    fn test_center_is_middle_of_container() {
        let viewport = Viewport::new(JAKARTA, 12, 800.0, 600.0);
        let (x, y) = viewport.to_screen(JAKARTA);
        assert!(close(x, 400.0));
        assert!(close(y, 300.0));
    }

    #[test]
    fn test_click_offset_to_coordinate() {
        let viewport = Viewport::new(JAKARTA, 12, 800.0, 600.0);

        let at_center = viewport.to_lat_lng(400.0, 300.0);
        assert!(close(at_center.lat, JAKARTA.lat));
        assert!(close(at_center.lng, JAKARTA.lng));

        // East and south of center.
        let clicked = viewport.to_lat_lng(500.0, 400.0);
        assert!(clicked.lng > JAKARTA.lng);
        assert!(clicked.lat < JAKARTA.lat);
        let (x, y) = viewport.to_screen(clicked);
        assert!(close(x, 500.0));
        assert!(close(y, 400.0));
    }

    #[test]
    fn test_pan_moves_content_with_pointer() {
        let viewport = Viewport::new(JAKARTA, 12, 800.0, 600.0);
        let panned = viewport.pan(100.0, 0.0);

        let (x, y) = panned.to_screen(JAKARTA);
        assert!(close(x, 500.0));
        assert!(close(y, 300.0));
    }

    #[test]
    fn test_zoom_keeps_anchor_in_place() {
        let viewport = Viewport::new(JAKARTA, 12, 800.0, 600.0);
        let anchor = viewport.to_lat_lng(650.0, 120.0);

        let zoomed = viewport.zoom_at(13, 650.0, 120.0);
        let (x, y) = zoomed.to_screen(anchor);

        assert_eq!(zoomed.zoom, 13);
        assert!((x - 650.0).abs() < 1e-3);
        assert!((y - 120.0).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_clamped() {
        let viewport = Viewport::new(JAKARTA, MAX_ZOOM, 800.0, 600.0);
        assert_eq!(viewport.zoom_at(MAX_ZOOM + 1, 0.0, 0.0), viewport);
        assert_eq!(Viewport::new(JAKARTA, 0, 1.0, 1.0).zoom, MIN_ZOOM);
    }

    #[test]
    fn test_tiles_cover_container() {
        let viewport = Viewport::new(JAKARTA, 12, 800.0, 600.0);
        let tiles = viewport.tiles();

        assert!(tiles.iter().all(|t| t.z == 12));
        assert!(tiles.iter().any(|t| t.left <= 0.0 && t.top <= 0.0));
        assert!(tiles
            .iter()
            .any(|t| t.left + TILE_SIZE >= 800.0 && t.top + TILE_SIZE >= 600.0));
        // 800x600 needs at most 5 columns and 4 rows.
        assert!(tiles.len() <= 20);

        let (x, y) = project(JAKARTA, 12);
        let (tx, ty) = ((x / TILE_SIZE) as u32, (y / TILE_SIZE) as u32);
        assert!(tiles.iter().any(|t| t.x == tx && t.y == ty));
    }

    #[test]
    fn test_tile_columns_wrap() {
        let viewport = Viewport::new(LatLng::new(0.0, 179.9), 2, 800.0, 256.0);
        assert!(viewport.tiles().iter().all(|t| t.x < 4));
    }
}
