//! Keyed texture store with create/destroy accounting

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lifeview_core::{Color, NativeTexture, Size, Surface};
use rustc_hash::FxHashMap;

use crate::loader::ImageData;
use crate::{Result, TextureError};

/// Key a texture is cached under
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureKey {
    /// A loaded image or a named caption
    Named(String),
    /// A widget's rasterised caption
    Text {
        widget: u32,
        text: String,
        enabled: bool,
    },
    /// A single glyph drawn by a text entry
    Glyph { ch: char, color: Color },
}

impl TextureKey {
    pub fn named(name: impl Into<String>) -> Self {
        TextureKey::Named(name.into())
    }

    pub fn text(widget: u32, text: impl Into<String>, enabled: bool) -> Self {
        TextureKey::Text {
            widget,
            text: text.into(),
            enabled,
        }
    }

    pub fn glyph(ch: char, color: Color) -> Self {
        TextureKey::Glyph { ch, color }
    }
}

impl fmt::Display for TextureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureKey::Named(name) => write!(f, "{}", name),
            TextureKey::Text {
                widget,
                text,
                enabled,
            } => write!(f, "text[{}:{}:{}]", widget, text, enabled),
            TextureKey::Glyph { ch, color } => write!(
                f,
                "glyph[{}:#{:02x}{:02x}{:02x}{:02x}]",
                ch, color.r, color.g, color.b, color.a
            ),
        }
    }
}

/// A cached texture and its pixel size
#[derive(Debug)]
pub struct CacheEntry {
    texture: Box<dyn NativeTexture>,
    width: i32,
    height: i32,
}

impl CacheEntry {
    pub fn new(texture: Box<dyn NativeTexture>) -> Self {
        let (width, height) = (texture.width(), texture.height());
        Self {
            texture,
            width,
            height,
        }
    }

    pub fn texture(&self) -> &dyn NativeTexture {
        self.texture.as_ref()
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn destroy(&mut self) {
        self.texture.destroy();
    }
}

/// Cumulative cache counters
///
/// `created == destroyed + transferred + live` holds at all times.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries stored through `add` (including merged-in entries)
    pub created: usize,
    /// Entries destroyed by overwrite, `remove` or teardown
    pub destroyed: usize,
    /// Entries handed to another cache by `merge`
    pub transferred: usize,
    /// Entries currently held
    pub live: usize,
}

/// Keyed owner of native textures
///
/// Holds at most one entry per key. Every entry is destroyed exactly once:
/// on overwrite, on `remove`, or on `destroy`/drop, unless it was handed to
/// another cache by `merge`.
#[derive(Debug, Default)]
pub struct TextureCache {
    entries: FxHashMap<TextureKey, CacheEntry>,
    created: usize,
    destroyed: usize,
    transferred: usize,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `entry` under `key`, destroying any entry it replaces
    pub fn add(&mut self, key: TextureKey, entry: CacheEntry) {
        tracing::debug!("texture cache add {}", key);
        if let Some(mut old) = self.entries.insert(key, entry) {
            old.destroy();
            self.destroyed += 1;
        }
        self.created += 1;
    }

    pub fn get(&self, key: &TextureKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &TextureKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Return the entry for `key`, creating it with `create` on a miss
    pub fn get_or_create<F>(&mut self, key: &TextureKey, create: F) -> Result<&CacheEntry>
    where
        F: FnOnce() -> lifeview_core::Result<Box<dyn NativeTexture>>,
    {
        if !self.entries.contains_key(key) {
            let texture = create()?;
            self.add(key.clone(), CacheEntry::new(texture));
        }
        self.entries
            .get(key)
            .ok_or_else(|| TextureError::Missing(key.clone()))
    }

    /// Destroy and drop a single entry. Returns false if the key was absent.
    pub fn remove(&mut self, key: &TextureKey) -> bool {
        match self.entries.remove(key) {
            Some(mut entry) => {
                entry.destroy();
                self.destroyed += 1;
                true
            }
            None => false,
        }
    }

    /// Adopt every entry of `other`; `other` is left empty
    ///
    /// Entries already present under the same key are replaced (and destroyed).
    pub fn merge(&mut self, other: &mut TextureCache) {
        let moved = other.entries.len();
        for (key, entry) in other.entries.drain() {
            self.add(key, entry);
        }
        other.transferred += moved;
        if moved > 0 {
            tracing::debug!("texture cache merged {} entries", moved);
        }
    }

    /// Destroy every entry and empty the cache. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        let count = self.entries.len();
        for (_, mut entry) in self.entries.drain() {
            entry.destroy();
        }
        self.destroyed += count;
        if count > 0 {
            tracing::debug!("texture cache destroyed {} entries", count);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &TextureKey> {
        self.entries.keys()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            created: self.created,
            destroyed: self.destroyed,
            transferred: self.transferred,
            live: self.entries.len(),
        }
    }

    /// Decode image files from `dir` and cache them under their names
    ///
    /// Stops at the first failure; images loaded before it stay cached.
    pub fn load_images<I, K, P>(
        &mut self,
        surface: &mut dyn Surface,
        dir: &Path,
        files: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: AsRef<Path>,
    {
        for (name, file) in files {
            let image = ImageData::load(&dir.join(file.as_ref()))?;
            let texture = image.upload(surface)?;
            self.add(TextureKey::Named(name.into()), CacheEntry::new(texture));
        }
        Ok(())
    }
}

impl Drop for TextureCache {
    fn drop(&mut self) {
        self.destroy();
    }
}

// ============================================================================
// Shared cache
// ============================================================================

/// A cache shared by every widget of a group
pub type SharedTextureCache = Arc<Mutex<TextureCache>>;

/// Create an empty shared cache
pub fn shared() -> SharedTextureCache {
    Arc::new(Mutex::new(TextureCache::new()))
}

/// Lock a shared cache, recovering the guard if a holder panicked
pub fn lock_shared(cache: &SharedTextureCache) -> MutexGuard<'_, TextureCache> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Merge `src` into `dest`; a no-op when both are the same cache
pub fn merge_shared(dest: &SharedTextureCache, src: &SharedTextureCache) {
    if Arc::ptr_eq(dest, src) {
        return;
    }
    let mut src = lock_shared(src);
    lock_shared(dest).merge(&mut src);
}
