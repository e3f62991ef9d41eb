//! Ordered widget containers
//!
//! A [`Subgroup`] is a flat list of widgets that are laid out, drawn and
//! hit-tested together, such as the button bar or the arrow pad. Each subgroup
//! starts with a texture cache of its own; adding it to a
//! [`WidgetGroup`](crate::WidgetGroup) swaps that for the shared one.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use lifeview_core::{FontId, Point, Surface, SurfaceExt};
use lifeview_platform::KeyboardEvent;
use lifeview_texture::{shared, SharedTextureCache};

use crate::widget::{FrameContext, Widget, WidgetId};

pub struct Subgroup {
    id: u32,
    widgets: Vec<Box<dyn Widget>>,
    font: Option<FontId>,
    cache: SharedTextureCache,
}

impl fmt::Debug for Subgroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<WidgetId> = self.widgets.iter().map(|w| w.id()).collect();
        f.debug_struct("Subgroup")
            .field("id", &self.id)
            .field("widgets", &ids)
            .field("font", &self.font)
            .finish()
    }
}

impl Subgroup {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            widgets: Vec::new(),
            font: None,
            cache: shared(),
        }
    }

    /// Font for every text-bearing member
    pub fn with_font(mut self, font: FontId) -> Self {
        self.font = Some(font);
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn font(&self) -> Option<FontId> {
        self.font
    }

    pub fn set_font(&mut self, font: Option<FontId>) {
        self.font = font;
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Append a widget and wire it to this subgroup's cache
    pub fn add(&mut self, mut widget: Box<dyn Widget>) {
        widget.set_texture_cache(Arc::clone(&self.cache));
        self.widgets.push(widget);
    }

    /// Builder form of [`add`](Self::add)
    pub fn with(mut self, widget: impl Widget) -> Self {
        self.add(Box::new(widget));
        self
    }

    pub fn widgets(&self) -> impl Iterator<Item = &dyn Widget> {
        self.widgets.iter().map(|w| &**w)
    }

    pub fn widget(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.widgets
            .iter()
            .find(|w| w.id() == id)
            .map(|w| &**w)
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Box<dyn Widget>> {
        self.widgets.iter_mut().find(|w| w.id() == id)
    }

    /// Look up a member by id and concrete type
    pub fn widget_as<T: Widget>(&self, id: WidgetId) -> Option<&T> {
        self.widget(id)?.as_any().downcast_ref::<T>()
    }

    pub fn widget_as_mut<T: Widget>(&mut self, id: WidgetId) -> Option<&mut T> {
        self.widget_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    pub fn contains_widget(&self, id: WidgetId) -> bool {
        self.widgets.iter().any(|w| w.id() == id)
    }

    // ========================================================================
    // Layout
    // ========================================================================

    /// Place visible members left to right from `(x, y)`
    ///
    /// Returns the point just past the last member plus `gap`.
    pub fn arrange_left_to_right(&mut self, x: i32, y: i32, gap: i32) -> Point {
        let mut x = x;
        for widget in self.widgets.iter_mut().filter(|w| w.base().is_visible()) {
            widget.set_position(x, y);
            x += widget.base().size().width + gap;
        }
        Point::new(x, y)
    }

    /// Place visible members right to left, ending at `x`
    pub fn arrange_right_to_left(&mut self, x: i32, y: i32, gap: i32) -> Point {
        let mut x = x;
        for widget in self.widgets.iter_mut().filter(|w| w.base().is_visible()) {
            let w = widget.base().size().width;
            widget.set_position(x - w, y);
            x = x - w - gap;
        }
        Point::new(x, y)
    }

    pub fn scale(&mut self, factor: f32) {
        for widget in &mut self.widgets {
            widget.scale(factor);
        }
    }

    pub fn set_enabled_all(&mut self, enabled: bool) {
        for widget in &mut self.widgets {
            widget.set_enabled(enabled);
        }
    }

    pub fn set_visible_all(&mut self, visible: bool) {
        for widget in &mut self.widgets {
            widget.set_visible(visible);
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// First visible member containing the point, in insertion order
    pub fn hit_test(&self, x: i32, y: i32) -> Option<WidgetId> {
        self.widgets
            .iter()
            .find(|w| w.contains(x, y))
            .map(|w| w.id())
    }

    pub(crate) fn hit_mut(&mut self, x: i32, y: i32) -> Option<&mut Box<dyn Widget>> {
        self.widgets.iter_mut().find(|w| w.contains(x, y))
    }

    /// Clear focus everywhere, then focus `id`. Returns true if `id` took it.
    pub fn set_focus(&mut self, id: WidgetId) -> bool {
        self.clear_focus();
        match self.widget_mut(id) {
            Some(widget) => {
                widget.set_focus(true);
                widget.has_focus()
            }
            None => false,
        }
    }

    pub fn clear_focus(&mut self) {
        for widget in &mut self.widgets {
            widget.set_focus(false);
        }
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.widgets.iter().find(|w| w.has_focus()).map(|w| w.id())
    }

    /// Forward a key to the focused member only
    pub fn key_press(&mut self, event: &KeyboardEvent) -> bool {
        match self.widgets.iter_mut().find(|w| w.has_focus()) {
            Some(widget) => widget.key_press(event),
            None => false,
        }
    }

    // ========================================================================
    // Resources and drawing
    // ========================================================================

    pub fn texture_cache(&self) -> &SharedTextureCache {
        &self.cache
    }

    /// Switch to `cache` and rewire every member to it
    pub fn set_texture_cache(&mut self, cache: SharedTextureCache) {
        for widget in &mut self.widgets {
            widget.set_texture_cache(Arc::clone(&cache));
        }
        self.cache = cache;
    }

    /// Draw every visible member
    ///
    /// A member that fails to draw is replaced by a red placeholder outline;
    /// the rest of the subgroup still draws.
    pub fn draw(&mut self, surface: &mut dyn Surface, time: Duration) {
        let frame = FrameContext {
            font: self.font,
            time,
        };
        for widget in self.widgets.iter_mut().filter(|w| w.base().is_visible()) {
            if let Err(err) = widget.draw(surface, &frame) {
                tracing::warn!(
                    "widget {} in subgroup {} failed to draw: {}",
                    widget.id(),
                    self.id,
                    err
                );
                surface.draw_placeholder(widget.base().bounds());
            }
        }
    }

    /// Tear down every member
    pub fn destroy(&mut self) {
        for widget in &mut self.widgets {
            widget.destroy();
        }
    }
}
