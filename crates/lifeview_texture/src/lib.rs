//! lifeview Texture Cache
//!
//! Native textures (rasterised captions, entry glyphs, decoded images) are
//! expensive to create and must be released exactly once. This crate keeps
//! them in a keyed [`TextureCache`] that owns every entry it holds:
//!
//! - `add` over an existing key destroys the old texture first
//! - `merge` moves entries between caches so only one owner remains
//! - `destroy` (or drop) releases everything, and is idempotent
//!
//! Widgets share one cache through [`SharedTextureCache`].

mod cache;
mod loader;

use lifeview_core::SurfaceError;
use thiserror::Error;

pub use cache::{
    lock_shared, merge_shared, shared, CacheEntry, CacheStats, SharedTextureCache, TextureCache,
    TextureKey,
};
pub use loader::ImageData;

/// Texture loading errors
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load image file: {0}")]
    FileLoad(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Texture not cached: {0}")]
    Missing(TextureKey),
}

impl From<image::ImageError> for TextureError {
    fn from(err: image::ImageError) -> Self {
        TextureError::Decode(err.to_string())
    }
}

/// Result type for texture operations
pub type Result<T> = std::result::Result<T, TextureError>;
