//! Drawing Surface - the native 2D backend contract
//!
//! Widgets never talk to a concrete renderer. They draw through the [`Surface`]
//! trait, which exposes just what an immediate-mode 2D backend offers: solid
//! rectangles and polygons, text rasterised into textures, and texture blits.
//!
//! Textures are owned resources. A backend hands them out as
//! `Box<dyn NativeTexture>` and whoever holds the box is responsible for
//! calling [`NativeTexture::destroy`] exactly once (normally the texture cache).
//!
//! # Recording
//!
//! [`RecordingSurface`] implements the trait without any native backend. It
//! records every call as a [`DrawCommand`] and keeps create/destroy counters
//! so tests can check resource accounting.
//!
//! ```rust
//! use lifeview_core::{Color, FontId, RecordingSurface, Size, Surface};
//!
//! let mut surface = RecordingSurface::new(Size::new(640, 480));
//! let mut tex = surface.render_text("Quit", FontId::DEFAULT, Color::WHITE).unwrap();
//! assert_eq!(tex.width(), 40);
//! tex.destroy();
//! assert_eq!(surface.live_textures(), 0);
//! ```

use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;

use crate::geometry::{Color, Point, Rect, Size};

/// Opaque identifier for a native texture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

/// Handle to a font loaded by the backend
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

impl FontId {
    pub const DEFAULT: FontId = FontId(0);
}

/// Errors raised by a drawing backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Text rendering failed: {0}")]
    TextRender(String),

    #[error("Texture creation failed: {0}")]
    TextureCreate(String),

    #[error("Texture query failed: {0}")]
    TextureQuery(String),

    #[error("Texture {0:?} used after it was destroyed")]
    TextureDestroyed(TextureId),

    #[error("Font not available: {0:?}")]
    FontUnavailable(FontId),
}

/// Result type for surface operations
pub type Result<T> = std::result::Result<T, SurfaceError>;

/// A GPU/driver resource created by a [`Surface`]
pub trait NativeTexture: Send + Debug {
    fn id(&self) -> TextureId;

    fn width(&self) -> i32;

    fn height(&self) -> i32;

    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Release the native resource
    fn destroy(&mut self);

    fn is_destroyed(&self) -> bool;
}

/// The native 2D drawing backend
pub trait Surface {
    /// Current drawable size in pixels
    fn viewport(&self) -> Size;

    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn outline_rect(&mut self, rect: Rect, color: Color);

    fn fill_polygon(&mut self, points: &[Point], color: Color);

    fn outline_polygon(&mut self, points: &[Point], color: Color);

    /// Copy `src` of `texture` (or all of it) into `dst`
    fn copy_texture(
        &mut self,
        texture: &dyn NativeTexture,
        src: Option<Rect>,
        dst: Rect,
    ) -> Result<()>;

    /// Rasterise `text` into a new texture
    fn render_text(
        &mut self,
        text: &str,
        font: FontId,
        color: Color,
    ) -> Result<Box<dyn NativeTexture>>;

    /// Upload tightly packed RGBA8 pixels as a new texture
    fn create_texture(
        &mut self,
        rgba: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Box<dyn NativeTexture>>;

    fn present(&mut self);
}

/// Convenience drawing built on top of [`Surface`]
pub trait SurfaceExt: Surface {
    /// Red outlined box drawn in place of a widget that failed to render
    fn draw_placeholder(&mut self, rect: Rect) {
        let r = rect.normalized();
        self.outline_rect(r, Color::RED);
        self.outline_rect(r.shrink(1), Color::RED);
    }
}

impl<S: Surface + ?Sized> SurfaceExt for S {}

// ============================================================================
// Recording backend
// ============================================================================

/// A recorded surface call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect {
        rect: Rect,
        color: Color,
    },
    OutlineRect {
        rect: Rect,
        color: Color,
    },
    FillPolygon {
        points: SmallVec<[Point; 8]>,
        color: Color,
    },
    OutlinePolygon {
        points: SmallVec<[Point; 8]>,
        color: Color,
    },
    CopyTexture {
        texture: TextureId,
        src: Option<Rect>,
        dst: Rect,
    },
    RenderText {
        texture: TextureId,
        text: String,
        font: FontId,
        color: Color,
    },
    CreateTexture {
        texture: TextureId,
        width: u32,
        height: u32,
    },
    Present,
}

#[derive(Debug, Default)]
struct TextureCounters {
    created: AtomicUsize,
    destroyed: AtomicUsize,
    double_destroyed: AtomicUsize,
}

/// Texture handed out by [`RecordingSurface`]
#[derive(Debug)]
pub struct RecordedTexture {
    id: TextureId,
    width: i32,
    height: i32,
    label: String,
    destroyed: bool,
    counters: Arc<TextureCounters>,
}

impl RecordedTexture {
    /// Text the texture was rendered from, or a description for uploads
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl NativeTexture for RecordedTexture {
    fn id(&self) -> TextureId {
        self.id
    }

    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn destroy(&mut self) {
        if self.destroyed {
            self.counters.double_destroyed.fetch_add(1, Ordering::SeqCst);
            tracing::warn!("texture {:?} destroyed twice", self.id);
            return;
        }
        self.destroyed = true;
        self.counters.destroyed.fetch_add(1, Ordering::SeqCst);
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

/// A [`Surface`] that records commands instead of drawing
///
/// Text is measured with a fixed glyph width (10 px by default) which can be
/// overridden per character, so layout-dependent behaviour is deterministic.
#[derive(Debug)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    viewport: Size,
    next_id: u64,
    glyph_width: i32,
    glyph_height: i32,
    glyph_widths: FxHashMap<char, i32>,
    failing_text: Vec<String>,
    fail_uploads: bool,
    counters: Arc<TextureCounters>,
}

impl RecordingSurface {
    /// Create a new recording surface
    pub fn new(viewport: Size) -> Self {
        Self {
            commands: Vec::new(),
            viewport,
            next_id: 1,
            glyph_width: 10,
            glyph_height: 20,
            glyph_widths: FxHashMap::default(),
            failing_text: Vec::new(),
            fail_uploads: false,
            counters: Arc::new(TextureCounters::default()),
        }
    }

    /// Width used for every glyph without an override
    pub fn with_glyph_width(mut self, width: i32) -> Self {
        self.glyph_width = width;
        self
    }

    pub fn with_glyph_height(mut self, height: i32) -> Self {
        self.glyph_height = height;
        self
    }

    /// Give a single character its own advance width
    pub fn with_glyph(mut self, ch: char, width: i32) -> Self {
        self.glyph_widths.insert(ch, width);
        self
    }

    /// Make `render_text` fail for any text containing `pattern`
    pub fn fail_text_containing(&mut self, pattern: impl Into<String>) {
        self.failing_text.push(pattern.into());
    }

    /// Make every `create_texture` call fail
    pub fn fail_uploads(&mut self, fail: bool) {
        self.fail_uploads = fail;
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Get the recorded commands
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Clear all recorded commands
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Measure `text` the way `render_text` will size it
    pub fn text_width(&self, text: &str) -> i32 {
        text.chars().map(|c| self.glyph_advance(c)).sum()
    }

    pub fn created_textures(&self) -> usize {
        self.counters.created.load(Ordering::SeqCst)
    }

    pub fn destroyed_textures(&self) -> usize {
        self.counters.destroyed.load(Ordering::SeqCst)
    }

    /// Number of `destroy` calls on an already destroyed texture
    pub fn double_destroys(&self) -> usize {
        self.counters.double_destroyed.load(Ordering::SeqCst)
    }

    pub fn live_textures(&self) -> usize {
        self.created_textures()
            .saturating_sub(self.destroyed_textures())
    }

    fn glyph_advance(&self, c: char) -> i32 {
        self.glyph_widths
            .get(&c)
            .copied()
            .unwrap_or(self.glyph_width)
    }

    fn new_texture(&mut self, width: i32, height: i32, label: String) -> RecordedTexture {
        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.counters.created.fetch_add(1, Ordering::SeqCst);
        RecordedTexture {
            id,
            width,
            height,
            label,
            destroyed: false,
            counters: Arc::clone(&self.counters),
        }
    }
}

impl Surface for RecordingSurface {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn outline_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::OutlineRect { rect, color });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        self.commands.push(DrawCommand::FillPolygon {
            points: SmallVec::from_slice(points),
            color,
        });
    }

    fn outline_polygon(&mut self, points: &[Point], color: Color) {
        self.commands.push(DrawCommand::OutlinePolygon {
            points: SmallVec::from_slice(points),
            color,
        });
    }

    fn copy_texture(
        &mut self,
        texture: &dyn NativeTexture,
        src: Option<Rect>,
        dst: Rect,
    ) -> Result<()> {
        if texture.is_destroyed() {
            return Err(SurfaceError::TextureDestroyed(texture.id()));
        }
        self.commands.push(DrawCommand::CopyTexture {
            texture: texture.id(),
            src,
            dst,
        });
        Ok(())
    }

    fn render_text(
        &mut self,
        text: &str,
        font: FontId,
        color: Color,
    ) -> Result<Box<dyn NativeTexture>> {
        if let Some(pattern) = self.failing_text.iter().find(|p| text.contains(p.as_str())) {
            return Err(SurfaceError::TextRender(format!(
                "cannot render '{}' (matched '{}')",
                text, pattern
            )));
        }
        let width = self.text_width(text);
        let texture = self.new_texture(width, self.glyph_height, text.to_string());
        self.commands.push(DrawCommand::RenderText {
            texture: texture.id,
            text: text.to_string(),
            font,
            color,
        });
        Ok(Box::new(texture))
    }

    fn create_texture(
        &mut self,
        rgba: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Box<dyn NativeTexture>> {
        if self.fail_uploads {
            return Err(SurfaceError::TextureCreate("uploads disabled".to_string()));
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(SurfaceError::TextureCreate(format!(
                "expected {} bytes for {}x{}, got {}",
                expected,
                width,
                height,
                rgba.len()
            )));
        }
        let texture = self.new_texture(
            width as i32,
            height as i32,
            format!("{}x{} rgba", width, height),
        );
        self.commands.push(DrawCommand::CreateTexture {
            texture: texture.id,
            width,
            height,
        });
        Ok(Box::new(texture))
    }

    fn present(&mut self) {
        self.commands.push(DrawCommand::Present);
    }
}
