//! The widget composition root
//!
//! [`WidgetGroup`] owns every [`Subgroup`] and the one texture cache they all
//! render through. It is the only thing the main loop talks to: events go in
//! through [`click`](WidgetGroup::click) and [`key_press`](WidgetGroup::key_press),
//! deferred changes through [`apply`](WidgetGroup::apply), and pixels come out
//! of [`draw`](WidgetGroup::draw).

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use lifeview_core::Surface;
use lifeview_platform::KeyboardEvent;
use lifeview_texture::{lock_shared, merge_shared, shared, SharedTextureCache, TextureCache};

use crate::command::{ArrangeDirection, UiCommand};
use crate::dispatch::ClickDispatcher;
use crate::error::{Result, WidgetError};
use crate::group::Subgroup;
use crate::image::Image;
use crate::widget::{Widget, WidgetId};

/// What a click landed on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A visible widget, whether or not it honoured the click
    Widget(WidgetId),
    /// Empty space
    Missed,
}

#[derive(Debug)]
pub struct WidgetGroup {
    subgroups: IndexMap<u32, Subgroup>,
    cache: SharedTextureCache,
    dispatcher: ClickDispatcher,
    destroyed: bool,
}

impl WidgetGroup {
    pub fn new(dispatcher: ClickDispatcher) -> Self {
        Self {
            subgroups: IndexMap::new(),
            cache: shared(),
            dispatcher,
            destroyed: false,
        }
    }

    /// Take ownership of a subgroup
    ///
    /// Its cache is merged into the shared one and it is rewired to render
    /// through the shared cache from now on. A subgroup with an id already in
    /// use replaces the old one, which is torn down.
    pub fn add(&mut self, mut subgroup: Subgroup) {
        merge_shared(&self.cache, subgroup.texture_cache());
        subgroup.set_texture_cache(Arc::clone(&self.cache));
        tracing::debug!("added subgroup {} ({} widgets)", subgroup.id(), subgroup.len());
        if let Some(mut old) = self.subgroups.insert(subgroup.id(), subgroup) {
            old.destroy();
        }
    }

    pub fn subgroup(&self, id: u32) -> Option<&Subgroup> {
        self.subgroups.get(&id)
    }

    pub fn subgroup_mut(&mut self, id: u32) -> Option<&mut Subgroup> {
        self.subgroups.get_mut(&id)
    }

    pub fn subgroups(&self) -> impl Iterator<Item = &Subgroup> {
        self.subgroups.values()
    }

    pub fn texture_cache(&self) -> &SharedTextureCache {
        &self.cache
    }

    pub fn dispatcher(&self) -> &ClickDispatcher {
        &self.dispatcher
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn widget(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.subgroups.values().find_map(|g| g.widget(id))
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Box<dyn Widget>> {
        self.subgroups.values_mut().find_map(|g| g.widget_mut(id))
    }

    pub fn widget_as<T: Widget>(&self, id: WidgetId) -> Option<&T> {
        self.widget(id)?.as_any().downcast_ref::<T>()
    }

    pub fn widget_as_mut<T: Widget>(&mut self, id: WidgetId) -> Option<&mut T> {
        self.widget_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// First visible widget containing the point, scanning subgroups in order
    pub fn hit_test(&self, x: i32, y: i32) -> Option<WidgetId> {
        self.subgroups.values().find_map(|g| g.hit_test(x, y))
    }

    /// Route a click: move focus, then let the widget debounce and dispatch
    pub fn click(&mut self, x: i32, y: i32) -> ClickOutcome {
        let Some(index) = self
            .subgroups
            .values()
            .position(|g| g.hit_test(x, y).is_some())
        else {
            self.clear_focus();
            return ClickOutcome::Missed;
        };

        let dispatcher = &self.dispatcher;
        let mut hit = None;
        for (i, group) in self.subgroups.values_mut().enumerate() {
            if i != index {
                group.clear_focus();
                continue;
            }
            if let Some(widget) = group.hit_mut(x, y) {
                let id = widget.id();
                let focusable = widget.can_focus();
                let honoured = widget.click(x, y, dispatcher);
                tracing::trace!("click on {} honoured={}", id, honoured);
                if focusable {
                    group.set_focus(id);
                } else {
                    group.clear_focus();
                }
                hit = Some(id);
            }
        }
        hit.map_or(ClickOutcome::Missed, ClickOutcome::Widget)
    }

    /// Forward a key to whichever subgroup holds focus
    pub fn key_press(&mut self, event: &KeyboardEvent) -> bool {
        match self
            .subgroups
            .values_mut()
            .find(|g| g.focused().is_some())
        {
            Some(group) => group.key_press(event),
            None => false,
        }
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.subgroups.values().find_map(|g| g.focused())
    }

    pub fn clear_focus(&mut self) {
        for group in self.subgroups.values_mut() {
            group.clear_focus();
        }
    }

    /// Run queued click handlers (queued dispatch mode)
    pub fn run_pending(&self) -> usize {
        self.dispatcher.run_pending()
    }

    // ========================================================================
    // Deferred changes
    // ========================================================================

    pub fn apply(&mut self, command: UiCommand) -> Result<()> {
        tracing::trace!("applying {:?}", command);
        match command {
            UiCommand::SetVisible { widget, visible } => {
                self.require_widget(widget)?.set_visible(visible);
            }
            UiCommand::SetEnabled { widget, enabled } => {
                self.require_widget(widget)?.set_enabled(enabled);
            }
            UiCommand::SetText { widget, text } => {
                if !self.require_widget(widget)?.set_text(&text) {
                    return Err(WidgetError::NotText(widget));
                }
            }
            UiCommand::SetSubgroupVisible { subgroup, visible } => {
                self.require_subgroup(subgroup)?.set_visible_all(visible);
            }
            UiCommand::SetSubgroupEnabled { subgroup, enabled } => {
                self.require_subgroup(subgroup)?.set_enabled_all(enabled);
            }
            UiCommand::Arrange {
                subgroup,
                x,
                y,
                gap,
                direction,
            } => {
                let group = self.require_subgroup(subgroup)?;
                match direction {
                    ArrangeDirection::LeftToRight => group.arrange_left_to_right(x, y, gap),
                    ArrangeDirection::RightToLeft => group.arrange_right_to_left(x, y, gap),
                };
            }
            UiCommand::SetFrame { widget, frame } => {
                self.require_image(widget)?.set_frame(frame);
            }
            UiCommand::NextFrame { widget } => {
                self.require_image(widget)?.next_frame();
            }
        }
        Ok(())
    }

    fn require_widget(&mut self, id: WidgetId) -> Result<&mut Box<dyn Widget>> {
        self.widget_mut(id).ok_or(WidgetError::UnknownWidget(id))
    }

    fn require_subgroup(&mut self, id: u32) -> Result<&mut Subgroup> {
        self.subgroups
            .get_mut(&id)
            .ok_or(WidgetError::UnknownSubgroup(id))
    }

    fn require_image(&mut self, id: WidgetId) -> Result<&mut Image> {
        self.require_widget(id)?
            .as_any_mut()
            .downcast_mut::<Image>()
            .ok_or(WidgetError::NotImage(id))
    }

    // ========================================================================
    // Resources and drawing
    // ========================================================================

    /// Load image files into the shared cache
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
        lock_shared(&self.cache).load_images(surface, dir, files)?;
        Ok(())
    }

    /// Reload image files at runtime
    ///
    /// Everything is decoded into a scratch cache first. Only when all files
    /// load are the new textures merged in; on failure the current textures
    /// stay and the error is returned.
    pub fn reload_images<I, K, P>(
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
        let mut scratch = TextureCache::new();
        if let Err(err) = scratch.load_images(surface, dir, files) {
            tracing::warn!("image reload from {} rejected: {}", dir.display(), err);
            return Err(err.into());
        }
        let count = scratch.len();
        lock_shared(&self.cache).merge(&mut scratch);
        tracing::info!("reloaded {} images from {}", count, dir.display());
        Ok(())
    }

    pub fn scale(&mut self, factor: f32) {
        for group in self.subgroups.values_mut() {
            group.scale(factor);
        }
    }

    /// Draw every subgroup in insertion order
    pub fn draw(&mut self, surface: &mut dyn Surface, time: Duration) {
        for group in self.subgroups.values_mut() {
            group.draw(surface, time);
        }
    }

    /// Tear down every widget, then the shared cache. Runs once.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        for group in self.subgroups.values_mut() {
            group.destroy();
        }
        let mut cache = lock_shared(&self.cache);
        cache.destroy();
        let stats = cache.stats();
        tracing::debug!(
            "widget group destroyed: {} textures created, {} destroyed, {} transferred",
            stats.created,
            stats.destroyed,
            stats.transferred
        );
        drop(cache);
        self.destroyed = true;
    }
}

impl Drop for WidgetGroup {
    fn drop(&mut self) {
        self.destroy();
    }
}
