use crate::core::geo::PixelPoint;
use serde::{Deserialize, Serialize};

/// Represents a bounding box in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBounds {
    pub min: PixelPoint,
    pub max: PixelPoint,
}

impl PixelBounds {
    /// Creates new bounds from two points
    pub fn new(min: PixelPoint, max: PixelPoint) -> Self {
        Self { min, max }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self::new(PixelPoint::new(min_x, min_y), PixelPoint::new(max_x, max_y))
    }

    /// Creates bounds from a top-left corner and a size
    pub fn from_origin_and_size(origin: PixelPoint, size: PixelPoint) -> Self {
        Self::new(origin, origin + size)
    }

    /// Gets the width of the bounds
    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    /// Gets the height of the bounds
    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    /// Gets the size as a PixelPoint
    pub fn size(&self) -> PixelPoint {
        PixelPoint::new(self.width(), self.height())
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &PixelPoint) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Checks if the bounds are valid (min <= max)
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// Range the top-left corner of a `window`-sized view may take while the
    /// view stays inside these bounds.
    pub fn offset_limits(&self, window: PixelPoint) -> PixelBounds {
        PixelBounds::new(self.min, self.max - window)
    }

    /// Clamps the top-left corner of a `window`-sized view into
    /// [`offset_limits`](Self::offset_limits). When the bounds are smaller
    /// than the window the upper limit wins.
    pub fn clamp_offset(&self, offset: PixelPoint, window: PixelPoint) -> PixelPoint {
        let limits = self.offset_limits(window);
        PixelPoint::new(
            offset.x.max(limits.min.x).min(limits.max.x),
            offset.y.max(limits.min.y).min(limits.max.y),
        )
    }
}
