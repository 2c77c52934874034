use crate::{
    core::{
        config::Color, constants::ROUTE_WIDTH, geo::LatLng, projection::Projection,
        viewport::Viewport,
    },
    rendering::sink::RenderSink,
    MapError, Result,
};

/// Ordered waypoints returned by the route service for one dot pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    waypoints: Vec<LatLng>,
    color: Color,
}

impl Route {
    /// Fails with [`MapError::DegenerateRoute`] for fewer than two waypoints.
    pub fn new(waypoints: Vec<LatLng>, color: Color) -> Result<Self> {
        if waypoints.len() < 2 {
            return Err(MapError::DegenerateRoute {
                waypoints: waypoints.len(),
            });
        }
        Ok(Self { waypoints, color })
    }

    pub fn waypoints(&self) -> &[LatLng] {
        &self.waypoints
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
        let points: Vec<_> = projection
            .project_all(&self.waypoints, viewport.zoom())?
            .into_iter()
            .map(|pixel| viewport.map_to_screen(pixel))
            .collect();
        sink.polyline(&points, ROUTE_WIDTH, self.color);
        Ok(())
    }
}
