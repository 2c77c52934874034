use super::source::{TileImage, TileProvider};
use crate::Result;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Keeps recently decoded bitmaps so zooming back and forth does not hit the
/// inner provider again. A capacity of 0 disables caching.
pub struct CachedTileProvider<P> {
    inner: P,
    cache: Option<LruCache<u8, Arc<TileImage>>>,
}

impl<P: TileProvider> CachedTileProvider<P> {
    pub fn new(inner: P, capacity: usize) -> Self {
        Self {
            inner,
            cache: NonZeroUsize::new(capacity).map(LruCache::new),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Get the current number of cached bitmaps
    pub fn len(&self) -> usize {
        self.cache.as_ref().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<P: TileProvider> TileProvider for CachedTileProvider<P> {
    fn load(&mut self, zoom: u8) -> Result<Arc<TileImage>> {
        if let Some(image) = self.cache.as_mut().and_then(|cache| cache.get(&zoom)) {
            log::debug!("tile bitmap for zoom {} served from cache", zoom);
            return Ok(Arc::clone(image));
        }

        let image = self.inner.load(zoom)?;
        if let Some(cache) = self.cache.as_mut() {
            cache.put(zoom, Arc::clone(&image));
        }
        Ok(image)
    }
}
