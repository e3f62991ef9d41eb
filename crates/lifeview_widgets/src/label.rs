//! Static text label

use std::any::Any;

use lifeview_core::{Color, Rect, Surface};
use lifeview_texture::{lock_shared, SharedTextureCache, TextureKey};

use crate::error::Result;
use crate::widget::{require_cache, require_font, FrameContext, Widget, WidgetBase, WidgetKind};

/// Horizontal padding used by left and fit alignment
const TEXT_PAD: i32 = 10;

/// How a label places its text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Center,
    Left,
    Right,
    /// Resize the label to the text plus padding on both sides
    Fit,
}

#[derive(Debug)]
pub struct Label {
    base: WidgetBase,
    text: String,
    align: Align,
    cache: Option<SharedTextureCache>,
}

impl Label {
    pub fn new(base: WidgetBase, text: impl Into<String>, align: Align) -> Self {
        Self {
            base,
            text: text.into(),
            align,
            cache: None,
        }
    }

    pub fn align(&self) -> Align {
        self.align
    }

    fn text_key(&self, enabled: bool) -> TextureKey {
        TextureKey::text(self.base.id().0, self.text.as_str(), enabled)
    }
}

impl Widget for Label {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Label
    }

    fn draw(&mut self, surface: &mut dyn Surface, frame: &FrameContext) -> Result<()> {
        let id = self.base.id();
        let enabled = self.base.is_enabled();

        let text_size = if self.text.is_empty() {
            None
        } else {
            let font = require_font(frame, id)?;
            let mut color = self.base.foreground().unwrap_or(Color::WHITE);
            if !enabled {
                color = color.dim(2.0);
            }
            let key = self.text_key(enabled);
            let text = self.text.as_str();
            let mut cache = lock_shared(require_cache(&self.cache, id)?);
            let entry = cache.get_or_create(&key, || surface.render_text(text, font, color))?;
            Some(entry.size())
        };

        if self.align == Align::Fit {
            let width = text_size.map_or(0, |s| s.width);
            let h = self.base.size().height;
            self.base.set_size(width + TEXT_PAD * 2, h);
        }

        let rect = self.base.bounds();
        if let Some(bg) = self.base.background() {
            surface.fill_rect(rect, bg);
        }

        if let Some(size) = text_size {
            let tx = match self.align {
                Align::Center => rect.x + (rect.w - size.width) / 2,
                Align::Left | Align::Fit => rect.x + TEXT_PAD,
                Align::Right => rect.x + (rect.w - size.width),
            };
            let ty = rect.y + (rect.h - size.height) / 2;
            let cache = lock_shared(require_cache(&self.cache, id)?);
            let key = self.text_key(enabled);
            if let Some(entry) = cache.get(&key) {
                surface.copy_texture(
                    entry.texture(),
                    None,
                    Rect::new(tx, ty, size.width, size.height),
                )?;
            }
        }

        if let Some(fg) = self.base.foreground() {
            surface.outline_rect(rect, fg);
        }
        Ok(())
    }

    fn set_texture_cache(&mut self, cache: SharedTextureCache) {
        self.cache = Some(cache);
    }

    fn text(&self) -> Option<String> {
        Some(self.text.clone())
    }

    fn set_text(&mut self, text: &str) -> bool {
        if self.text != text {
            if let Some(cache) = &self.cache {
                let mut cache = lock_shared(cache);
                cache.remove(&self.text_key(true));
                cache.remove(&self.text_key(false));
            }
            self.text = text.to_string();
        }
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
