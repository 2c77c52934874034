use crate::{
    core::{
        config::{Color, MapConfig},
        constants::{COORD_PRECISION, STATUS_LOADING},
        geo::{LatLng, PixelPoint},
        projection::Projection,
        viewport::{PanDirection, Viewport, ZoomDirection},
    },
    layers::{
        annotations::{AnnotationStore, DotPair},
        marker::Dot,
        route::Route,
    },
    rendering::sink::{RenderSink, TextAnchor},
    tiles::source::{TileImage, TileProvider},
    Result,
};
use std::sync::Arc;

/// The map window: viewport, annotations and the bitmap of the current zoom.
///
/// `MapView` is the single owner of mutable map state. The input controller
/// drives it; it never talks to the route service itself.
pub struct MapView {
    config: MapConfig,
    projection: Projection,
    viewport: Viewport,
    annotations: AnnotationStore,
    tiles: Box<dyn TileProvider>,
    /// Bitmap for `viewport.zoom()`
    tile: Arc<TileImage>,
}

impl MapView {
    /// Validates `config` and loads the bitmap of the initial zoom. A
    /// missing bitmap is fatal.
    pub fn new(config: MapConfig, mut tiles: Box<dyn TileProvider>) -> Result<Self> {
        config.validate()?;

        let projection = Projection::new(config.tile_origins.clone());
        let viewport = Viewport::new(&config, &projection)?;
        let annotations = AnnotationStore::new(config.palette.clone())?;
        let tile = tiles.load(viewport.zoom())?;

        log::info!(
            "map ready at zoom {} offset ({}, {})",
            viewport.zoom(),
            viewport.offset().x,
            viewport.offset().y
        );

        Ok(Self {
            config,
            projection,
            viewport,
            annotations,
            tiles,
            tile,
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    pub fn tile(&self) -> &Arc<TileImage> {
        &self.tile
    }

    pub fn pan(&mut self, direction: PanDirection) {
        self.viewport.pan(direction);
    }

    pub fn drag(&mut self, delta: PixelPoint) {
        self.viewport.drag(delta);
    }

    /// Zooms one level around `cursor`. Returns `false` at the zoom limits.
    ///
    /// A frame with the loading status is presented before the new bitmap is
    /// loaded. The load blocks and a failure leaves the view untouched.
    pub fn change_zoom(
        &mut self,
        direction: ZoomDirection,
        cursor: PixelPoint,
        sink: &mut dyn RenderSink,
    ) -> Result<bool> {
        let Some(new_zoom) = self.viewport.next_zoom(direction) else {
            log::debug!("zoom {:?} ignored at level {}", direction, self.viewport.zoom());
            return Ok(false);
        };

        self.render(sink, cursor, Some(STATUS_LOADING))?;
        let tile = self.tiles.load(new_zoom)?;

        self.viewport.zoom_to(new_zoom, cursor, &self.projection)?;
        self.tile = tile;

        log::info!(
            "zoomed to level {} (Zoom: {})",
            new_zoom,
            self.viewport.zoom_label()
        );
        Ok(true)
    }

    /// Geography under a window position at the current zoom
    pub fn lat_lng_at(&self, screen: PixelPoint) -> Result<LatLng> {
        self.viewport.lat_lng_at(screen, &self.projection)
    }

    /// Places a dot at window position `screen`
    pub fn add_dot(&mut self, screen: PixelPoint) -> Result<Dot> {
        self.annotations
            .add_dot(
                screen,
                self.viewport.offset(),
                self.viewport.zoom(),
                &self.projection,
            )
            .copied()
    }

    pub fn check_pair_complete(&mut self) -> Option<DotPair> {
        self.annotations.check_pair_complete()
    }

    pub fn add_route(&mut self, waypoints: Vec<LatLng>, color: Color) -> Result<Option<&Route>> {
        self.annotations.add_route(waypoints, color)
    }

    /// Removes every dot and route
    pub fn refresh(&mut self) {
        log::info!(
            "clearing {} dots and {} routes",
            self.annotations.dots().len(),
            self.annotations.routes().len()
        );
        self.annotations.refresh();
    }

    /// Draws one complete frame.
    ///
    /// The status bar shows the geography under `pointer` on the left and
    /// either `status` or the zoom label on the right.
    pub fn render(
        &self,
        sink: &mut dyn RenderSink,
        pointer: PixelPoint,
        status: Option<&str>,
    ) -> Result<()> {
        sink.clear();
        sink.blit(&self.tile, self.viewport.visible_region(), PixelPoint::ZERO);
        self.annotations
            .render(sink, &self.viewport, &self.projection)?;

        let position = self.lat_lng_at(pointer)?;
        sink.text(
            &format!(
                "{:.prec$}, {:.prec$}",
                position.lat,
                position.lng,
                prec = COORD_PRECISION
            ),
            TextAnchor::StatusLeft,
        );
        match status {
            Some(status) => sink.text(status, TextAnchor::StatusRight),
            None => sink.text(
                &format!("Zoom: {}", self.viewport.zoom_label()),
                TextAnchor::StatusRight,
            ),
        }
        sink.present()
    }
}
