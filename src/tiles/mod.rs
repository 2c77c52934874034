pub mod cache;
pub mod source;

// Re-exports for convenience
pub use cache::CachedTileProvider;
#[cfg(feature = "render")]
pub use source::DirectoryTileProvider;
pub use source::{MemoryTileProvider, TileImage, TileProvider};
