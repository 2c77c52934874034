use crate::{
    core::{
        config::Color, constants::DOT_RADIUS, geo::LatLng, projection::Projection,
        viewport::Viewport,
    },
    rendering::sink::RenderSink,
    Result,
};
use std::fmt;

/// A user-placed marker. Stored as geography so it survives zoom changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    position: LatLng,
    color: Color,
}

impl Dot {
    pub fn new(position: LatLng, color: Color) -> Self {
        Self { position, color }
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn render(
        &self,
        sink: &mut dyn RenderSink,
        viewport: &Viewport,
        projection: &Projection,
    ) -> Result<()> {
        let pixel = projection.project(&self.position, viewport.zoom())?;
        sink.circle(viewport.map_to_screen(pixel), DOT_RADIUS, self.color);
        Ok(())
    }
}

/// Same as the request line for this dot
impl fmt::Display for Dot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.position, f)
    }
}
