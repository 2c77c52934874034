//! Prelude module for common routeplot types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use routeplot::prelude::*;`

pub use crate::core::{
    bounds::PixelBounds,
    config::{
        ChannelConfig, Color, DisplayConfig, FrameTimingConfig, MapConfig, TileConfig,
        TileOriginTable, ZoomConfig,
    },
    geo::{LatLng, LatLngBounds, PixelPoint, TileOrigin},
    map::MapView,
    projection::Projection,
    viewport::{PanDirection, Viewport, ZoomDirection},
};

pub use crate::layers::{
    annotations::{AnnotationStore, DotPair},
    marker::Dot,
    route::Route,
};

pub use crate::input::{
    events::{InputEvent, InputState, KeyCode, MouseButton},
    handler::{EventSource, FrameClock, InputController, QueuedEvents, TickOutcome},
    script::DotScript,
};

pub use crate::protocol::{
    channel::{LineChannel, NoticeRoute, StreamChannel},
    client::{ExchangeState, ProtocolClient, ProtocolNotice, ResponseLine, RouteResponse},
    transport,
};

pub use crate::rendering::sink::{DrawCommand, RecordingSink, RenderSink, TextAnchor};

pub use crate::tiles::{
    cache::CachedTileProvider,
    source::{MemoryTileProvider, TileImage, TileProvider},
};

#[cfg(feature = "render")]
pub use crate::tiles::source::DirectoryTileProvider;

pub use crate::{Error as MapError, Result};

pub use std::{
    sync::Arc,
    time::{Duration, Instant},
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
