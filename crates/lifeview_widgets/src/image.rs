//! Image button backed by a cached texture
//!
//! The texture may be a horizontal sprite strip of `frame_count` equal frames;
//! only the current frame is drawn.

use std::any::Any;

use lifeview_core::{Rect, Surface};
use lifeview_texture::{lock_shared, SharedTextureCache, TextureKey};

use crate::error::{Result, WidgetError};
use crate::widget::{require_cache, FrameContext, Widget, WidgetBase, WidgetKind};

#[derive(Debug)]
pub struct Image {
    base: WidgetBase,
    texture_name: String,
    frame: u32,
    frame_count: u32,
    cache: Option<SharedTextureCache>,
}

impl Image {
    /// Image showing the texture loaded under `texture_name`
    pub fn new(base: WidgetBase, texture_name: impl Into<String>) -> Self {
        Self {
            base,
            texture_name: texture_name.into(),
            frame: 0,
            frame_count: 1,
            cache: None,
        }
    }

    /// Treat the texture as a strip of `count` frames
    pub fn with_frames(mut self, count: u32) -> Self {
        self.frame_count = count.max(1);
        self.frame = self.frame.min(self.frame_count - 1);
        self
    }

    pub fn texture_name(&self) -> &str {
        &self.texture_name
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Select a frame; out-of-range frames wrap to 0
    pub fn set_frame(&mut self, frame: u32) {
        self.frame = if frame >= self.frame_count { 0 } else { frame };
    }

    /// Advance to the next frame, wrapping after the last
    pub fn next_frame(&mut self) -> u32 {
        self.set_frame(self.frame + 1);
        self.frame
    }
}

impl Widget for Image {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Image
    }

    fn draw(&mut self, surface: &mut dyn Surface, _frame: &FrameContext) -> Result<()> {
        let id = self.base.id();
        let border_rect = self.base.bounds();
        let mut out = border_rect;

        let (bg, fg) = if self.base.is_enabled() {
            (self.base.background(), self.base.foreground())
        } else {
            out = out.shrink(4);
            (None, self.base.foreground().map(|c| c.dim(2.0)))
        };

        if let Some(bg) = bg {
            surface.fill_rect(border_rect, bg);
        }

        let cache = lock_shared(require_cache(&self.cache, id)?);
        let entry = cache
            .get(&TextureKey::named(self.texture_name.as_str()))
            .ok_or_else(|| WidgetError::MissingTexture {
                widget: id,
                name: self.texture_name.clone(),
            })?;

        if bg.is_some() || fg.is_some() {
            out = out.shrink(8);
        }

        if self.frame_count > 1 {
            let fw = entry.width() / self.frame_count as i32;
            let src = Rect::new(fw * self.frame as i32, 0, fw, entry.height());
            surface.copy_texture(entry.texture(), Some(src), Rect::new(out.x, out.y, fw, out.h))?;
        } else {
            surface.copy_texture(entry.texture(), None, out)?;
        }

        if let Some(fg) = fg {
            surface.outline_rect(border_rect, fg);
        }
        Ok(())
    }

    fn set_texture_cache(&mut self, cache: SharedTextureCache) {
        self.cache = Some(cache);
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
    use lifeview_core::{Color, DrawCommand, RecordingSurface, Size};
    use lifeview_texture::{shared, CacheEntry};

    fn image_with_strip(frames: u32) -> (Image, RecordingSurface) {
        let mut surface = RecordingSurface::new(Size::new(200, 200));
        let cache = shared();
        let strip = surface
            .create_texture(&vec![0u8; 120 * 30 * 4], 120, 30)
            .unwrap();
        lock_shared(&cache).add(TextureKey::named("lem"), CacheEntry::new(strip));

        let mut image = Image::new(
            WidgetBase::new(2, Rect::new(0, 0, 60, 60))
                .with_background(Color::BLACK)
                .with_foreground(Color::WHITE),
            "lem",
        )
        .with_frames(frames);
        image.set_texture_cache(cache);
        (image, surface)
    }

    fn copies(surface: &RecordingSurface) -> Vec<(Option<Rect>, Rect)> {
        surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::CopyTexture { src, dst, .. } => Some((*src, *dst)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_frames_wrap() {
        let (mut image, _s) = image_with_strip(4);
        assert_eq!(image.next_frame(), 1);
        image.set_frame(3);
        assert_eq!(image.next_frame(), 0);
        image.set_frame(9);
        assert_eq!(image.frame(), 0);
    }

    #[test]
    fn test_sprite_frame_source_rect() {
        let (mut image, mut surface) = image_with_strip(4);
        image.set_frame(2);
        image.draw(&mut surface, &FrameContext::default()).unwrap();
        // 120 px strip / 4 frames, inset 8 for the border
        assert_eq!(
            copies(&surface),
            vec![(Some(Rect::new(60, 0, 30, 30)), Rect::new(8, 8, 30, 44))]
        );
    }

    #[test]
    fn test_disabled_image_shrinks() {
        let (mut image, mut surface) = image_with_strip(1);
        image.set_enabled(false);
        image.draw(&mut surface, &FrameContext::default()).unwrap();
        assert_eq!(copies(&surface), vec![(None, Rect::new(12, 12, 36, 36))]);
        assert!(surface.commands().contains(&DrawCommand::OutlineRect {
            rect: Rect::new(0, 0, 60, 60),
            color: Color::WHITE.dim(2.0)
        }));
    }

    #[test]
    fn test_missing_texture_is_an_error() {
        let mut surface = RecordingSurface::new(Size::new(200, 200));
        let mut image = Image::new(WidgetBase::new(2, Rect::new(0, 0, 60, 60)), "nope");
        image.set_texture_cache(shared());
        assert!(matches!(
            image.draw(&mut surface, &FrameContext::default()),
            Err(WidgetError::MissingTexture { .. })
        ));
    }
}
