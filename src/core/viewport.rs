use crate::core::{
    bounds::PixelBounds,
    config::{MapConfig, ZoomConfig},
    constants::PAN_STEP,
    geo::{LatLng, LatLngBounds, PixelPoint},
    projection::Projection,
};
use crate::Result;
use serde::{Deserialize, Serialize};

/// One of the four fixed pan directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PanDirection {
    /// Unit step in pixel space
    pub fn unit(self) -> PixelPoint {
        match self {
            PanDirection::Up => PixelPoint::new(0, -1),
            PanDirection::Down => PixelPoint::new(0, 1),
            PanDirection::Left => PixelPoint::new(-1, 0),
            PanDirection::Right => PixelPoint::new(1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Manages the current view of the map: zoom, the top-left offset of the
/// visible window inside the zoom's bitmap, and the bitmap extents.
///
/// After every mutation `offset` lies inside
/// `[map_bounds.min, map_bounds.max - display_range]` on both axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The current zoom level
    zoom: u8,
    /// Top-left of the visible window in bitmap pixels
    offset: PixelPoint,
    /// The size of the visible window in pixels
    display_range: PixelPoint,
    /// Pixel extents of the geographic boundary at the current zoom
    map_bounds: PixelBounds,
    zoom_limits: ZoomConfig,
    boundary: LatLngBounds,
}

impl Viewport {
    /// Creates a viewport at the configured initial zoom with its top-left
    /// corner on `config.initial_top_left`.
    pub fn new(config: &MapConfig, projection: &Projection) -> Result<Self> {
        let zoom = config.zoom.initial;
        let map_bounds = Self::compute_map_bounds(&config.boundary, zoom, projection)?;
        let display_range = config.display.display_range();
        let offset = projection.project(&config.initial_top_left, zoom)?;

        Ok(Self {
            zoom,
            offset: map_bounds.clamp_offset(offset, display_range),
            display_range,
            map_bounds,
            zoom_limits: config.zoom,
            boundary: config.boundary.clone(),
        })
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn offset(&self) -> PixelPoint {
        self.offset
    }

    pub fn display_range(&self) -> PixelPoint {
        self.display_range
    }

    pub fn map_bounds(&self) -> PixelBounds {
        self.map_bounds
    }

    /// Zoom number as shown to the user
    pub fn zoom_label(&self) -> i32 {
        self.zoom as i32 - self.zoom_limits.label_offset as i32
    }

    /// The part of the bitmap currently on screen
    pub fn visible_region(&self) -> PixelBounds {
        PixelBounds::from_origin_and_size(self.offset, self.display_range)
    }

    /// Converts a window position to a bitmap pixel
    pub fn screen_to_map(&self, screen: PixelPoint) -> PixelPoint {
        screen + self.offset
    }

    /// Converts a bitmap pixel to a window position
    pub fn map_to_screen(&self, pixel: PixelPoint) -> PixelPoint {
        pixel - self.offset
    }

    /// Geographic location under a window position
    pub fn lat_lng_at(&self, screen: PixelPoint, projection: &Projection) -> Result<LatLng> {
        projection.unproject(self.screen_to_map(screen), self.zoom)
    }

    /// Moves one step in `direction` and clamps
    pub fn pan(&mut self, direction: PanDirection) {
        let unit = direction.unit();
        let step = PixelPoint::new(unit.x * PAN_STEP, unit.y * PAN_STEP);
        self.set_offset(self.offset + step);
    }

    /// Follows a pointer drag: the map moves with the pointer, so the offset
    /// moves against it.
    pub fn drag(&mut self, delta: PixelPoint) {
        self.set_offset(self.offset - delta);
    }

    /// Target level for a zoom request, or `None` when already at the limit
    pub fn next_zoom(&self, direction: ZoomDirection) -> Option<u8> {
        match direction {
            ZoomDirection::In if self.zoom < self.zoom_limits.max => Some(self.zoom + 1),
            ZoomDirection::Out if self.zoom > self.zoom_limits.min => Some(self.zoom - 1),
            _ => None,
        }
    }

    /// Switches to `new_zoom` keeping the geography under `cursor` under the
    /// cursor (as far as clamping allows).
    pub fn zoom_to(
        &mut self,
        new_zoom: u8,
        cursor: PixelPoint,
        projection: &Projection,
    ) -> Result<()> {
        let focus = self.lat_lng_at(cursor, projection)?;
        let map_bounds = Self::compute_map_bounds(&self.boundary, new_zoom, projection)?;
        let focus_pixel = projection.project(&focus, new_zoom)?;

        log::debug!(
            "zoom {} -> {} around ({:.6}, {:.6})",
            self.zoom,
            new_zoom,
            focus.lat,
            focus.lng
        );

        self.zoom = new_zoom;
        self.map_bounds = map_bounds;
        self.set_offset(focus_pixel - cursor);
        Ok(())
    }

    fn set_offset(&mut self, offset: PixelPoint) {
        self.offset = self.map_bounds.clamp_offset(offset, self.display_range);
    }

    /// Pixel extents of `boundary` at `zoom`: north-west corner to
    /// south-east corner.
    fn compute_map_bounds(
        boundary: &LatLngBounds,
        zoom: u8,
        projection: &Projection,
    ) -> Result<PixelBounds> {
        Ok(PixelBounds::new(
            projection.project(&boundary.north_west(), zoom)?,
            projection.project(&boundary.south_east(), zoom)?,
        ))
    }
}
