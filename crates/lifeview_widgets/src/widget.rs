//! Widget base state and the widget capability trait

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lifeview_core::{Color, FontId, Point, Rect, Size, Surface};
use lifeview_platform::KeyboardEvent;
use lifeview_texture::SharedTextureCache;

use crate::dispatch::{ClickDispatcher, ClickHandler};
use crate::error::{Result, WidgetError};

/// Caller-assigned widget identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u32);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for WidgetId {
    fn from(id: u32) -> Self {
        WidgetId(id)
    }
}

/// The closed set of widget variants
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Button,
    Label,
    Entry,
    Image,
    Arrow,
    Separator,
}

/// Per-frame drawing inputs
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameContext {
    /// Font of the subgroup being drawn, if it has one
    pub font: Option<FontId>,
    /// Time since the viewer started, drives cursor blink
    pub time: Duration,
}

/// State shared by every widget
///
/// The `not_suppressed` flag is shared with the debounce timer, which restores
/// it from another task once the debounce interval has passed.
pub struct WidgetBase {
    id: WidgetId,
    rect: Rect,
    visible: bool,
    enabled: bool,
    not_suppressed: Arc<AtomicBool>,
    debounce: Duration,
    bg: Option<Color>,
    fg: Option<Color>,
    on_click: Option<ClickHandler>,
}

impl fmt::Debug for WidgetBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetBase")
            .field("id", &self.id)
            .field("rect", &self.rect)
            .field("visible", &self.visible)
            .field("enabled", &self.enabled)
            .field("suppressed", &self.is_suppressed())
            .field("debounce", &self.debounce)
            .field("has_on_click", &self.on_click.is_some())
            .finish()
    }
}

impl WidgetBase {
    /// Visible, enabled base with no colours, handler or debounce
    pub fn new(id: impl Into<WidgetId>, rect: Rect) -> Self {
        Self {
            id: id.into(),
            rect,
            visible: true,
            enabled: true,
            not_suppressed: Arc::new(AtomicBool::new(true)),
            debounce: Duration::ZERO,
            bg: None,
            fg: None,
            on_click: None,
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn with_foreground(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_on_click(mut self, handler: ClickHandler) -> Self {
        self.on_click = Some(handler);
        self
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Rectangle as given, possibly with a negative extent
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Rectangle normalized to a positive extent
    pub fn bounds(&self) -> Rect {
        self.rect.normalized()
    }

    pub fn position(&self) -> Point {
        self.rect.origin()
    }

    pub fn size(&self) -> Size {
        self.rect.size()
    }

    /// Returns true if the position changed
    pub fn set_position(&mut self, x: i32, y: i32) -> bool {
        if self.rect.x == x && self.rect.y == y {
            return false;
        }
        self.rect.x = x;
        self.rect.y = y;
        true
    }

    /// Returns true if the size changed
    pub fn set_size(&mut self, w: i32, h: i32) -> bool {
        if self.rect.w == w && self.rect.h == h {
            return false;
        }
        self.rect.w = w;
        self.rect.h = h;
        true
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Enabled and not inside a debounce window
    pub fn is_enabled(&self) -> bool {
        self.enabled && !self.is_suppressed()
    }

    /// Enabled, ignoring any debounce window
    pub fn is_enabled_flag(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_suppressed(&self) -> bool {
        !self.not_suppressed.load(Ordering::SeqCst)
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    pub fn background(&self) -> Option<Color> {
        self.bg
    }

    pub fn foreground(&self) -> Option<Color> {
        self.fg
    }

    pub fn set_background(&mut self, color: Option<Color>) {
        self.bg = color;
    }

    pub fn set_foreground(&mut self, color: Option<Color>) {
        self.fg = color;
    }

    pub fn on_click(&self) -> Option<&ClickHandler> {
        self.on_click.as_ref()
    }

    pub fn set_on_click(&mut self, handler: Option<ClickHandler>) {
        self.on_click = handler;
    }

    /// Whether a click would be honoured right now
    pub fn accepts_click(&self) -> bool {
        self.enabled && self.visible && !self.is_suppressed()
    }

    pub(crate) fn suppression_flag(&self) -> &Arc<AtomicBool> {
        &self.not_suppressed
    }

    /// Hit test; hidden widgets never match
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.visible && self.rect.contains(x, y)
    }

    /// Uniformly rescale position and size
    pub fn scale(&mut self, factor: f32) {
        self.rect = self.rect.scale(factor);
    }
}

pub(crate) fn require_cache(
    cache: &Option<SharedTextureCache>,
    id: WidgetId,
) -> Result<&SharedTextureCache> {
    cache.as_ref().ok_or(WidgetError::NoTextureCache(id))
}

pub(crate) fn require_font(frame: &FrameContext, id: WidgetId) -> Result<FontId> {
    frame.font.ok_or(WidgetError::NoFont(id))
}

/// Capability trait implemented by every widget variant
pub trait Widget: Send + Any {
    fn base(&self) -> &WidgetBase;

    fn base_mut(&mut self) -> &mut WidgetBase;

    fn kind(&self) -> WidgetKind;

    /// Draw the widget; only called while visible
    fn draw(&mut self, surface: &mut dyn Surface, frame: &FrameContext) -> Result<()>;

    /// Handle a click inside the widget. Returns true if it was honoured.
    fn click(&mut self, x: i32, y: i32, dispatcher: &ClickDispatcher) -> bool {
        dispatcher.click(self.base(), x, y)
    }

    fn can_focus(&self) -> bool {
        false
    }

    fn set_focus(&mut self, _focus: bool) {}

    fn has_focus(&self) -> bool {
        false
    }

    /// Returns true if the key was handled
    fn key_press(&mut self, _event: &KeyboardEvent) -> bool {
        false
    }

    /// Point the widget at the cache it should render through
    fn set_texture_cache(&mut self, _cache: SharedTextureCache) {}

    fn text(&self) -> Option<String> {
        None
    }

    /// Replace the widget's text. Returns false for widgets without text.
    fn set_text(&mut self, _text: &str) -> bool {
        false
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.base_mut().set_position(x, y);
    }

    fn set_visible(&mut self, visible: bool) {
        self.base_mut().set_visible(visible);
        if !visible {
            self.set_focus(false);
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.base_mut().set_enabled(enabled);
        if !enabled {
            self.set_focus(false);
        }
    }

    fn scale(&mut self, factor: f32) {
        self.base_mut().scale(factor);
    }

    /// Release anything the widget holds outside the shared cache
    fn destroy(&mut self) {
        self.set_focus(false);
        self.base_mut().set_on_click(None);
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn id(&self) -> WidgetId {
        self.base().id()
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        self.base().contains(x, y)
    }
}
