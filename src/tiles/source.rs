use crate::{core::geo::PixelPoint, prelude::HashMap, MapError, Result};
use std::sync::Arc;

/// A decoded RGBA bitmap covering the whole map at one zoom level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileImage {
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels
    pub pixels: Vec<u8>,
}

impl TileImage {
    pub fn new(zoom: u8, width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(MapError::MissingTile {
                zoom,
                path: "<memory>".to_string(),
                reason: format!("expected {} bytes of RGBA, got {}", expected, pixels.len()),
            });
        }
        Ok(Self {
            zoom,
            width,
            height,
            pixels,
        })
    }

    /// A single-color bitmap, handy for headless runs
    pub fn solid(zoom: u8, width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            zoom,
            width,
            height,
            pixels,
        }
    }

    pub fn size(&self) -> PixelPoint {
        PixelPoint::new(self.width as i32, self.height as i32)
    }
}

/// Anything that can hand out the full-map bitmap for a zoom level.
///
/// A provider that cannot supply a zoom in the configured range is a fatal
/// configuration problem, reported as [`MapError::MissingTile`].
pub trait TileProvider {
    fn load(&mut self, zoom: u8) -> Result<Arc<TileImage>>;
}

impl<T: TileProvider + ?Sized> TileProvider for Box<T> {
    fn load(&mut self, zoom: u8) -> Result<Arc<TileImage>> {
        (**self).load(zoom)
    }
}

/// Loads `<directory>/<zoom>.png` from disk.
#[cfg(feature = "render")]
pub struct DirectoryTileProvider {
    config: crate::core::config::TileConfig,
}

#[cfg(feature = "render")]
impl DirectoryTileProvider {
    pub fn new(config: crate::core::config::TileConfig) -> Self {
        Self { config }
    }
}

#[cfg(feature = "render")]
impl TileProvider for DirectoryTileProvider {
    fn load(&mut self, zoom: u8) -> Result<Arc<TileImage>> {
        let path = self.config.path_for(zoom);
        let missing = |reason: String| MapError::MissingTile {
            zoom,
            path: path.display().to_string(),
            reason,
        };

        let decoded = image::open(&path).map_err(|e| missing(e.to_string()))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::info!(
            "loaded tile bitmap {} ({}x{})",
            path.display(),
            width,
            height
        );
        Ok(Arc::new(TileImage {
            zoom,
            width,
            height,
            pixels: rgba.into_raw(),
        }))
    }
}

/// Serves bitmaps registered up front. Used for headless runs and tests.
#[derive(Default)]
pub struct MemoryTileProvider {
    images: HashMap<u8, Arc<TileImage>>,
    loads: usize,
}

impl MemoryTileProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider with a solid bitmap for every zoom in `zooms`
    pub fn solid(zooms: impl IntoIterator<Item = u8>, width: u32, height: u32) -> Self {
        let mut provider = Self::new();
        for zoom in zooms {
            provider.insert(TileImage::solid(zoom, width, height, [200, 200, 200, 255]));
        }
        provider
    }

    pub fn insert(&mut self, image: TileImage) {
        self.images.insert(image.zoom, Arc::new(image));
    }

    /// Number of successful loads served so far
    pub fn loads(&self) -> usize {
        self.loads
    }
}

impl TileProvider for MemoryTileProvider {
    fn load(&mut self, zoom: u8) -> Result<Arc<TileImage>> {
        let image = self
            .images
            .get(&zoom)
            .cloned()
            .ok_or_else(|| MapError::MissingTile {
                zoom,
                path: "<memory>".to_string(),
                reason: "no bitmap registered".to_string(),
            })?;
        self.loads += 1;
        Ok(image)
    }
}
