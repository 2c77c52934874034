//! Web Mercator tile math relative to a per-zoom tile origin.
//!
//! Pixel coordinates are local to the bitmap of one zoom level: pixel (0, 0)
//! is the top-left corner of tile (`x_min`, `y_min`) from the
//! [`TileOriginTable`]. Projection truncates toward zero, so a round trip is
//! exact only to within one pixel.

use crate::{
    core::{
        config::TileOriginTable,
        constants::TILE_SIZE,
        geo::{LatLng, PixelPoint},
    },
    Result,
};
use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    origins: TileOriginTable,
}

impl Projection {
    pub fn new(origins: TileOriginTable) -> Self {
        Self { origins }
    }

    /// Projects a geographic coordinate into the bitmap of `zoom`.
    pub fn project(&self, lat_lng: &LatLng, zoom: u8) -> Result<PixelPoint> {
        let origin = self.origins.get(zoom)?;
        let n = 2_f64.powi(zoom as i32);
        let tile = TILE_SIZE as f64;
        let lat_rad = lat_lng.lat.to_radians();

        let x = ((lat_lng.lng + 180.0) / 360.0 * n - origin.x_min as f64) * tile;
        let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n - origin.y_min as f64) * tile;

        // `as` truncates toward zero
        Ok(PixelPoint::new(x as i32, y as i32))
    }

    /// Inverse of [`Projection::project`] for the same zoom.
    pub fn unproject(&self, pixel: PixelPoint, zoom: u8) -> Result<LatLng> {
        let origin = self.origins.get(zoom)?;
        let n = 2_f64.powi(zoom as i32);
        let tile = TILE_SIZE as f64;

        let lng = (pixel.x as f64 / tile + origin.x_min as f64) / n * 360.0 - 180.0;
        let lat_rad = (PI * (1.0 - 2.0 * (pixel.y as f64 / tile + origin.y_min as f64) / n))
            .sinh()
            .atan();

        Ok(LatLng::new(lat_rad.to_degrees(), lng))
    }

    /// Projects a sequence of coordinates, as needed to draw a polyline.
    pub fn project_all<'a>(
        &self,
        points: impl IntoIterator<Item = &'a LatLng>,
        zoom: u8,
    ) -> Result<Vec<PixelPoint>> {
        points
            .into_iter()
            .map(|point| self.project(point, zoom))
            .collect()
    }
}
