//! Configuration for the plotter
//!
//! The tile origin table, map boundary, palette, window size and pipe names
//! live in one [`MapConfig`] that is built once at startup, validated, and
//! then shared read-only. Every field has a default matching the bundled Edmonton map, so
//! a JSON override file only needs to name what it changes.

use crate::{
    core::geo::{LatLng, LatLngBounds, PixelPoint, TileOrigin},
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub tile_origins: TileOriginTable,
    pub zoom: ZoomConfig,
    pub boundary: LatLngBounds,
    pub initial_top_left: LatLng,
    pub display: DisplayConfig,
    pub palette: Vec<Color>,
    pub frame: FrameTimingConfig,
    pub channel: ChannelConfig,
    pub tiles: TileConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_origins: TileOriginTable::default(),
            zoom: ZoomConfig::default(),
            boundary: LatLngBounds::from_coords(53.398, -113.711, 53.655, -113.295),
            initial_top_left: LatLng::new(53.55, -113.57),
            display: DisplayConfig::default(),
            palette: vec![
                Color::new(242, 92, 172),
                Color::new(24, 213, 185),
                Color::new(255, 82, 61),
                Color::new(255, 100, 64),
                Color::new(255, 0, 0),
            ],
            frame: FrameTimingConfig::default(),
            channel: ChannelConfig::default(),
            tiles: TileConfig::default(),
        }
    }
}

impl MapConfig {
    /// Loads a configuration from a JSON file. Missing fields fall back to
    /// their defaults; the result is validated before it is returned.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        log::info!("loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the rest of the crate relies on.
    pub fn validate(&self) -> Result<()> {
        let zoom = &self.zoom;
        if zoom.min > zoom.max {
            return Err(MapError::Config(format!(
                "zoom.min ({}) is greater than zoom.max ({})",
                zoom.min, zoom.max
            )));
        }
        if !(zoom.min..=zoom.max).contains(&zoom.initial) {
            return Err(MapError::Config(format!(
                "zoom.initial ({}) is outside {}..={}",
                zoom.initial, zoom.min, zoom.max
            )));
        }
        for level in zoom.min..=zoom.max {
            match self.tile_origins.get(level) {
                Ok(origin) if origin.is_valid() => {}
                Ok(_) => {
                    return Err(MapError::Config(format!(
                        "tile origin for zoom {} has min > max",
                        level
                    )))
                }
                Err(_) => {
                    return Err(MapError::Config(format!(
                        "no tile origin for reachable zoom {}",
                        level
                    )))
                }
            }
        }
        if self.palette.is_empty() {
            return Err(MapError::Config("palette must not be empty".to_string()));
        }
        if !self.boundary.is_valid() {
            return Err(MapError::Config(
                "boundary south/west must not exceed north/east".to_string(),
            ));
        }
        if self.display.width == 0 || self.display.height == 0 {
            return Err(MapError::Config(
                "display width and height must be positive".to_string(),
            ));
        }
        if self.frame.target_fps == Some(0) {
            return Err(MapError::Config("frame.target_fps must not be 0".to_string()));
        }
        Ok(())
    }
}

/// Zoom → tile origin lookup, immutable after startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileOriginTable(BTreeMap<u8, TileOrigin>);

impl TileOriginTable {
    pub fn new(entries: impl IntoIterator<Item = (u8, TileOrigin)>) -> Self {
        Self(entries.into_iter().collect())
    }

    pub fn get(&self, zoom: u8) -> Result<&TileOrigin> {
        self.0
            .get(&zoom)
            .ok_or(MapError::MissingTileOrigin { zoom })
    }

    pub fn zooms(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.keys().copied()
    }
}

impl Default for TileOriginTable {
    fn default() -> Self {
        Self::new([
            (10, TileOrigin::new(188, 189, 330, 331)),
            (11, TileOrigin::new(377, 379, 660, 663)),
            (12, TileOrigin::new(754, 759, 1321, 1326)),
            (13, TileOrigin::new(1508, 1518, 2643, 2653)),
            (14, TileOrigin::new(3016, 3036, 5286, 5307)),
            (15, TileOrigin::new(6032, 6072, 10573, 10614)),
            (16, TileOrigin::new(12065, 12144, 21147, 21229)),
        ])
    }
}

/// Usable zoom range. The tile origin table may cover more levels than this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: u8,
    pub max: u8,
    pub initial: u8,
    /// Subtracted from the zoom level before it is shown to the user.
    pub label_offset: u8,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 11,
            max: 15,
            initial: 12,
            label_offset: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    /// Height of the text strip drawn below the map window.
    pub status_bar_height: u32,
}

impl DisplayConfig {
    /// Size of the visible map window.
    pub fn display_range(&self) -> PixelPoint {
        PixelPoint::new(self.width as i32, self.height as i32)
    }

    /// Size of the whole window including the status bar.
    pub fn window_size(&self) -> (u32, u32) {
        (self.width, self.height + self.status_bar_height)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            status_bar_height: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameTimingConfig {
    /// `None` disables frame pacing entirely.
    pub target_fps: Option<u32>,
}

impl FrameTimingConfig {
    pub fn target_frame_duration(&self) -> Option<Duration> {
        self.target_fps
            .filter(|fps| *fps > 0)
            .map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
    }
}

impl Default for FrameTimingConfig {
    fn default() -> Self {
        Self {
            target_fps: Some(60),
        }
    }
}

/// Named pipes shared with the route service. Paths are relative to the
/// working directory unless absolute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Written by the plotter, read by the route service.
    pub request_path: PathBuf,
    /// Written by the route service, read by the plotter.
    pub response_path: PathBuf,
    pub poll_interval_ms: u64,
}

impl ChannelConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            request_path: PathBuf::from("inpipe"),
            response_path: PathBuf::from("outpipe"),
            poll_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    /// Directory holding one `<zoom>.png` bitmap per zoom level.
    pub directory: PathBuf,
    /// Decoded bitmaps kept in memory; 0 disables caching.
    pub cache_capacity: usize,
}

impl TileConfig {
    pub fn path_for(&self, zoom: u8) -> PathBuf {
        self.directory.join(format!("{}.png", zoom))
    }
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("map"),
            cache_capacity: 4,
        }
    }
}

/// An opaque RGB color. Serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Color> for [u8; 3] {
    fn from(color: Color) -> Self {
        [color.r, color.g, color.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = MapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.display.window_size(), (500, 520));
        assert_eq!(
            config.tile_origins.zooms().collect::<Vec<_>>(),
            (10..=16).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_partial_json_override() {
        let config = MapConfig::from_json_str(
            r#"{ "zoom": { "initial": 14 }, "palette": [[1, 2, 3]] }"#,
        )
        .unwrap();
        assert_eq!(config.zoom.initial, 14);
        assert_eq!(config.zoom.min, 11);
        assert_eq!(config.palette, vec![Color::new(1, 2, 3)]);
        assert_eq!(config.channel.request_path, PathBuf::from("inpipe"));
    }

    #[test]
    fn test_tile_origin_table_json_keys() {
        let json = serde_json::to_string(&TileOriginTable::default()).unwrap();
        let parsed: TileOriginTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.get(12).unwrap(), &TileOrigin::new(754, 759, 1321, 1326));
    }

    #[test]
    fn test_reachable_zoom_without_origin_is_rejected() {
        let mut config = MapConfig::default();
        config.zoom.max = 17;
        assert!(matches!(config.validate(), Err(MapError::Config(_))));
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let mut config = MapConfig::default();
        config.zoom.initial = 16;
        assert!(config.validate().is_err());

        let mut config = MapConfig::default();
        config.palette.clear();
        assert!(config.validate().is_err());

        let mut config = MapConfig::default();
        config.frame.target_fps = Some(0);
        assert!(config.validate().is_err());

        let mut config = MapConfig::default();
        config.boundary = LatLngBounds::from_coords(54.0, -113.0, 53.0, -114.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_tile_origin_lookup() {
        let table = TileOriginTable::default();
        assert!(matches!(
            table.get(3),
            Err(MapError::MissingTileOrigin { zoom: 3 })
        ));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "tiles": {{ "directory": "assets/map" }} }}"#).unwrap();
        let config = MapConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.tiles.path_for(13), PathBuf::from("assets/map/13.png"));
        assert_eq!(config.tiles.cache_capacity, 4);
    }

    #[test]
    fn test_frame_duration() {
        let frame = FrameTimingConfig::default();
        let duration = frame.target_frame_duration().unwrap();
        assert!((duration.as_secs_f64() - 1.0 / 60.0).abs() < 1e-9);
        assert!(FrameTimingConfig { target_fps: None }
            .target_frame_duration()
            .is_none());
    }
}
