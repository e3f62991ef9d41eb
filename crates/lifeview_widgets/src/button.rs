//! Push button with a centred caption

use std::any::Any;

use lifeview_core::{Color, Rect, Surface};
use lifeview_texture::{lock_shared, SharedTextureCache, TextureKey};

use crate::error::Result;
use crate::widget::{require_cache, require_font, FrameContext, Widget, WidgetBase, WidgetKind};

const DEFAULT_BACKGROUND: Color = Color::rgb(0, 56, 0);

/// A clickable button with a text caption
///
/// The caption is rasterised once per (text, enabled) pair and kept in the
/// shared texture cache.
#[derive(Debug)]
pub struct Button {
    base: WidgetBase,
    text: String,
    cache: Option<SharedTextureCache>,
}

impl Button {
    pub fn new(base: WidgetBase, text: impl Into<String>) -> Self {
        Self {
            base,
            text: text.into(),
            cache: None,
        }
    }

    fn caption_key(&self, enabled: bool) -> TextureKey {
        TextureKey::text(self.base.id().0, self.text.as_str(), enabled)
    }

    fn release_caption(&self) {
        if let Some(cache) = &self.cache {
            let mut cache = lock_shared(cache);
            cache.remove(&self.caption_key(true));
            cache.remove(&self.caption_key(false));
        }
    }
}

impl Widget for Button {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Button
    }

    fn draw(&mut self, surface: &mut dyn Surface, frame: &FrameContext) -> Result<()> {
        let rect = self.base.bounds();
        let enabled = self.base.is_enabled();
        let bg = self.base.background().unwrap_or(DEFAULT_BACKGROUND);
        let border = if enabled { bg.bright() } else { bg };

        surface.fill_rect(rect, bg);
        surface.outline_rect(rect, border);
        surface.outline_rect(rect.shrink(1), border);

        if self.text.is_empty() {
            return Ok(());
        }

        let id = self.base.id();
        let font = require_font(frame, id)?;
        let mut cache = lock_shared(require_cache(&self.cache, id)?);
        let mut color = self.base.foreground().unwrap_or(Color::WHITE);
        if !enabled {
            color = color.dim(2.0);
        }

        let key = self.caption_key(enabled);
        let text = self.text.as_str();
        let entry = cache.get_or_create(&key, || surface.render_text(text, font, color))?;
        let (tw, th) = (entry.width(), entry.height());
        let dst = Rect::new(
            rect.x + (rect.w - tw) / 2,
            rect.y + (rect.h - th) / 2,
            tw,
            th,
        );
        surface.copy_texture(entry.texture(), None, dst)?;
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
            self.release_caption();
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

#[cfg(test)]
mod tests {
    use super::*;
    use lifeview_core::{DrawCommand, FontId, RecordingSurface, Size};
    use lifeview_texture::shared;

    fn frame() -> FrameContext {
        FrameContext {
            font: Some(FontId::DEFAULT),
            ..Default::default()
        }
    }

    fn button(text: &str) -> (Button, SharedTextureCache) {
        let cache = shared();
        let mut b = Button::new(
            WidgetBase::new(1, Rect::new(10, 10, 100, 40)).with_background(Color::rgb(0, 100, 0)),
            text,
        );
        b.set_texture_cache(cache.clone());
        (b, cache)
    }

    #[test]
    fn test_button_draw_centres_caption() {
        let mut surface = RecordingSurface::new(Size::new(200, 100));
        let (mut b, cache) = button("Quit");
        b.draw(&mut surface, &frame()).unwrap();

        let copy = surface
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::CopyTexture { dst, .. } => Some(*dst),
                _ => None,
            })
            .unwrap();
        // 4 glyphs x 10 px wide, 20 px high
        assert_eq!(copy, Rect::new(40, 20, 40, 20));
        assert_eq!(lock_shared(&cache).len(), 1);
    }

    #[test]
    fn test_button_caption_cached_between_frames() {
        let mut surface = RecordingSurface::new(Size::new(200, 100));
        let (mut b, _cache) = button("Step");
        b.draw(&mut surface, &frame()).unwrap();
        b.draw(&mut surface, &frame()).unwrap();
        assert_eq!(surface.created_textures(), 1);
    }

    #[test]
    fn test_button_set_text_releases_old_caption() {
        let mut surface = RecordingSurface::new(Size::new(200, 100));
        let (mut b, cache) = button("Stop");
        b.draw(&mut surface, &frame()).unwrap();

        assert!(b.set_text("Start"));
        assert_eq!(surface.live_textures(), 0);
        b.draw(&mut surface, &frame()).unwrap();
        assert_eq!(b.text().as_deref(), Some("Start"));
        assert_eq!(lock_shared(&cache).len(), 1);
    }

    #[test]
    fn test_disabled_button_dims_caption() {
        let mut surface = RecordingSurface::new(Size::new(200, 100));
        let (mut b, _cache) = button("Go");
        b.set_enabled(false);
        b.draw(&mut surface, &frame()).unwrap();

        let color = surface
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::RenderText { color, .. } => Some(*color),
                _ => None,
            })
            .unwrap();
        assert_eq!(color, Color::WHITE.dim(2.0));
    }

    #[test]
    fn test_button_without_cache_or_font_fails() {
        let mut surface = RecordingSurface::new(Size::new(200, 100));
        let mut b = Button::new(WidgetBase::new(4, Rect::new(0, 0, 50, 20)), "x");
        assert!(b.draw(&mut surface, &frame()).is_err());

        let (mut b, _cache) = button("x");
        assert!(b.draw(&mut surface, &FrameContext::default()).is_err());
    }
}
