use crate::core::constants::COORD_PRECISION;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Canonical wire form: `"<lat> <lon>"` with six decimals.
impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.prec$} {:.prec$}",
            self.lat,
            self.lng,
            prec = COORD_PRECISION
        )
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Top-left corner on a north-up map.
    pub fn north_west(&self) -> LatLng {
        LatLng::new(self.north_east.lat, self.south_west.lng)
    }

    /// Bottom-right corner on a north-up map.
    pub fn south_east(&self) -> LatLng {
        LatLng::new(self.south_west.lat, self.north_east.lng)
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Checks if south <= north and west <= east
    pub fn is_valid(&self) -> bool {
        self.south_west.lat <= self.north_east.lat && self.south_west.lng <= self.north_east.lng
    }
}

/// Integer pixel coordinate inside the full bitmap of one zoom level, or
/// inside the visible window when used for screen positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const ZERO: PixelPoint = PixelPoint { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for PixelPoint {
    type Output = PixelPoint;

    fn add(self, other: PixelPoint) -> PixelPoint {
        PixelPoint::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for PixelPoint {
    type Output = PixelPoint;

    fn sub(self, other: PixelPoint) -> PixelPoint {
        PixelPoint::new(self.x - other.x, self.y - other.y)
    }
}

impl From<(i32, i32)> for PixelPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Slippy-map tile indices covering the bitmap of one zoom level. The tile at
/// (`x_min`, `y_min`) has its top-left corner at pixel (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileOrigin {
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: u32,
    pub y_max: u32,
}

impl TileOrigin {
    pub fn new(x_min: u32, x_max: u32, y_min: u32, y_max: u32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Number of tile columns and rows covered at this zoom
    pub fn tile_span(&self) -> (u32, u32) {
        (
            self.x_max.saturating_sub(self.x_min) + 1,
            self.y_max.saturating_sub(self.y_min) + 1,
        )
    }

    pub fn is_valid(&self) -> bool {
        self.x_min <= self.x_max && self.y_min <= self.y_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(53.55, -113.57);
        assert_eq!(coord.lat, 53.55);
        assert_eq!(coord.lng, -113.57);
        assert!(coord.is_valid());
        assert!(!LatLng::new(91.0, 0.0).is_valid());
    }

    #[test]
    fn test_lat_lng_wire_format() {
        assert_eq!(LatLng::new(53.5, -113.25).to_string(), "53.500000 -113.250000");
        assert_eq!(
            LatLng::new(45.1234567, -113.0000004).to_string(),
            "45.123457 -113.000000"
        );
    }

    #[test]
    fn test_bounds_corners() {
        let bounds = LatLngBounds::from_coords(53.398, -113.711, 53.655, -113.295);
        assert_eq!(bounds.north_west(), LatLng::new(53.655, -113.711));
        assert_eq!(bounds.south_east(), LatLng::new(53.398, -113.295));
        assert!(bounds.contains(&LatLng::new(53.5, -113.5)));
        assert!(!bounds.contains(&LatLng::new(54.0, -113.5)));
        assert!(bounds.is_valid());
    }

    #[test]
    fn test_pixel_point_arithmetic() {
        let a = PixelPoint::new(10, 20);
        let b = PixelPoint::new(3, -4);
        assert_eq!(a + b, PixelPoint::new(13, 16));
        assert_eq!(a - b, PixelPoint::new(7, 24));
        assert_eq!(PixelPoint::from((1, 2)), PixelPoint::new(1, 2));
    }

    #[test]
    fn test_tile_span() {
        let origin = TileOrigin::new(754, 759, 1321, 1326);
        assert_eq!(origin.tile_span(), (6, 6));
        assert!(origin.is_valid());
        assert!(!TileOrigin::new(2, 1, 0, 0).is_valid());
    }
}
