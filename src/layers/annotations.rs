//! Dots and routes placed on the map.
//!
//! The store owns the color cycle and the pending-report flag. A route
//! request fires at most once per completed dot pair: `add_dot` raises the
//! flag, and `check_pair_complete` lowers it and advances the color when it
//! hands out a pair.

use crate::{
    core::{
        config::Color,
        geo::{LatLng, PixelPoint},
        projection::Projection,
        viewport::Viewport,
    },
    layers::{marker::Dot, route::Route},
    rendering::sink::RenderSink,
    MapError, Result,
};

/// The two most recent dots, in placement order, once a pair is complete.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotPair {
    pub start: Dot,
    pub end: Dot,
}

impl DotPair {
    /// Both dots of a pair share one color
    pub fn color(&self) -> Color {
        self.start.color()
    }

    /// Request lines for the route service, older dot first
    pub fn request_lines(&self) -> [String; 2] {
        [self.start.to_string(), self.end.to_string()]
    }
}

#[derive(Debug, Clone)]
pub struct AnnotationStore {
    dots: Vec<Dot>,
    routes: Vec<Route>,
    palette: Vec<Color>,
    color_index: usize,
    pending_report: bool,
}

impl AnnotationStore {
    pub fn new(palette: Vec<Color>) -> Result<Self> {
        if palette.is_empty() {
            return Err(MapError::Config("palette must not be empty".to_string()));
        }
        Ok(Self {
            dots: Vec::new(),
            routes: Vec::new(),
            palette,
            color_index: 0,
            pending_report: false,
        })
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn color_index(&self) -> usize {
        self.color_index
    }

    /// Color the next dot will get
    pub fn current_color(&self) -> Color {
        self.palette[self.color_index]
    }

    pub fn has_pending_report(&self) -> bool {
        self.pending_report
    }

    /// Places a dot at window position `screen`, converting it to geography
    /// through the projection of `zoom`.
    pub fn add_dot(
        &mut self,
        screen: PixelPoint,
        offset: PixelPoint,
        zoom: u8,
        projection: &Projection,
    ) -> Result<&Dot> {
        let position = projection.unproject(screen + offset, zoom)?;
        Ok(self.push_dot(position))
    }

    /// Places a dot directly at a geographic position
    pub fn push_dot(&mut self, position: LatLng) -> &Dot {
        let dot = Dot::new(position, self.current_color());
        log::debug!("dot placed at {}", dot);
        self.dots.push(dot);
        self.pending_report = true;
        &self.dots[self.dots.len() - 1]
    }

    /// Hands out the last two dots when the dot count is even and non-zero
    /// and they have not been reported yet. Advances the color on success.
    pub fn check_pair_complete(&mut self) -> Option<DotPair> {
        if self.dots.is_empty() || self.dots.len() % 2 != 0 || !self.pending_report {
            return None;
        }

        self.pending_report = false;
        self.color_index = (self.color_index + 1) % self.palette.len();

        let end = self.dots[self.dots.len() - 1];
        let start = self.dots[self.dots.len() - 2];
        Some(DotPair { start, end })
    }

    /// Stores the route for a pair. An empty waypoint list means the service
    /// found nothing and is ignored.
    pub fn add_route(&mut self, waypoints: Vec<LatLng>, color: Color) -> Result<Option<&Route>> {
        if waypoints.is_empty() {
            log::info!("route service returned no waypoints");
            return Ok(None);
        }
        let route = Route::new(waypoints, color)?;
        log::info!("route with {} waypoints added", route.waypoints().len());
        self.routes.push(route);
        Ok(self.routes.last())
    }

    /// Clears dots and routes. The color cycle and the pending-report flag
    /// carry over.
    pub fn refresh(&mut self) {
        self.dots.clear();
        self.routes.clear();
    }

    /// Draws every dot, then every route, at the viewport's zoom
    pub fn render(
        &self,
        sink: &mut dyn RenderSink,
        viewport: &Viewport,
        projection: &Projection,
    ) -> Result<()> {
        for dot in &self.dots {
            dot.render(sink, viewport, projection)?;
        }
        for route in &self.routes {
            route.render(sink, viewport, projection)?;
        }
        Ok(())
    }
}
