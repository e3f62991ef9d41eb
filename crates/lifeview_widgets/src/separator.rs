//! Solid spacer between groups of buttons

use std::any::Any;

use lifeview_core::Surface;

use crate::error::Result;
use crate::widget::{FrameContext, Widget, WidgetBase, WidgetKind};

/// A filled block that only takes up space. Never clickable.
#[derive(Debug)]
pub struct Separator {
    base: WidgetBase,
}

impl Separator {
    pub fn new(base: WidgetBase) -> Self {
        let mut base = base;
        base.set_on_click(None);
        Self { base }
    }
}

impl Widget for Separator {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Separator
    }

    fn draw(&mut self, surface: &mut dyn Surface, _frame: &FrameContext) -> Result<()> {
        if let Some(bg) = self.base.background() {
            surface.fill_rect(self.base.bounds(), bg);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
