//! # routeplot
//!
//! A raster map plotter: pan and zoom a pre-rendered tile bitmap, drop pairs
//! of dots on it, and ask an external route service for the route between
//! each pair over a newline-delimited text protocol.
//!
//! The library holds everything with real design content (projection,
//! viewport, annotations, protocol client and the input loop). Windowing and
//! process bootstrap live in the `routeplot-app` binary.

pub mod core;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod protocol;
pub mod rendering;
pub mod tiles;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::PixelBounds,
    config::MapConfig,
    geo::{LatLng, LatLngBounds, PixelPoint, TileOrigin},
    map::MapView,
    projection::Projection,
    viewport::Viewport,
};

pub use crate::layers::{annotations::AnnotationStore, marker::Dot, route::Route};

pub use crate::input::{events::InputEvent, handler::InputController, script::DotScript};

pub use crate::protocol::{
    channel::{LineChannel, StreamChannel},
    client::{ProtocolClient, ProtocolNotice, RouteResponse},
};

pub use crate::rendering::sink::{RecordingSink, RenderSink};

pub use crate::tiles::source::{TileImage, TileProvider};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No tile origin configured for zoom {zoom}")]
    MissingTileOrigin { zoom: u8 },

    #[error("Missing tile bitmap for zoom {zoom} at {path}: {reason}")]
    MissingTile {
        zoom: u8,
        path: String,
        reason: String,
    },

    #[error("A route needs at least two waypoints, got {waypoints}")]
    DegenerateRoute { waypoints: usize },

    #[error("Route service closed the response channel")]
    ChannelClosed,

    #[error("Script error: {0}")]
    Script(String),
}

/// Error type alias for convenience
pub type Error = MapError;
