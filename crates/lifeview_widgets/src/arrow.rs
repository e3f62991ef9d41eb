//! Directional arrow button drawn as a polygon

use std::any::Any;

use lifeview_core::{Color, Point, Rect, Surface};
use smallvec::SmallVec;

use crate::error::Result;
use crate::widget::{FrameContext, Widget, WidgetBase, WidgetKind};

const DEFAULT_BACKGROUND: Color = Color::rgb(0, 56, 0);

/// Which way an arrow points
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
}

/// A seven-vertex arrow
///
/// Constructed from an anchor and a signed extent: the anchor is the tail
/// centre, `w`/`h` give the length and thickness. Whichever of |w| and |h| is
/// larger is the pointing axis, and its sign picks the direction. The widget
/// rectangle becomes the polygon's bounding box.
#[derive(Debug)]
pub struct Arrow {
    base: WidgetBase,
    direction: Direction,
    points: SmallVec<[Point; 8]>,
}

impl Arrow {
    pub fn new(base: WidgetBase) -> Self {
        let mut base = base;
        let Rect { x, y, w, h } = base.rect();
        let (direction, points) = arrow_shape(x, y, w, h);
        if let Some(bounds) = Rect::bounding(&points) {
            base.set_position(bounds.x, bounds.y);
            base.set_size(bounds.w, bounds.h);
        }
        Self {
            base,
            direction,
            points,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

fn arrow_shape(x: i32, y: i32, w: i32, h: i32) -> (Direction, SmallVec<[Point; 8]>) {
    let mut pts = SmallVec::new();
    if w.abs() > h.abs() {
        let half_h = h / 2;
        let qtr_h = h / 4;
        let sixth_w = w / 6;
        let head_w = sixth_w * 4;
        pts.extend([
            Point::new(x + sixth_w, y - qtr_h),
            Point::new(x + head_w, y - qtr_h),
            Point::new(x + head_w, y - half_h),
            Point::new(x + w, y),
            Point::new(x + head_w, y + half_h),
            Point::new(x + head_w, y + qtr_h),
            Point::new(x + sixth_w, y + qtr_h),
        ]);
        let dir = if w < 0 { Direction::Left } else { Direction::Right };
        (dir, pts)
    } else {
        let half_w = w / 2;
        let qtr_w = w / 4;
        let sixth_h = h / 6;
        let head_h = sixth_h * 4;
        pts.extend([
            Point::new(x + qtr_w, y + sixth_h),
            Point::new(x + qtr_w, y + head_h),
            Point::new(x + half_w, y + head_h),
            Point::new(x, y + h),
            Point::new(x - half_w, y + head_h),
            Point::new(x - qtr_w, y + head_h),
            Point::new(x - qtr_w, y + sixth_h),
        ]);
        let dir = if h < 0 { Direction::Up } else { Direction::Down };
        (dir, pts)
    }
}

impl Widget for Arrow {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Arrow
    }

    fn draw(&mut self, surface: &mut dyn Surface, _frame: &FrameContext) -> Result<()> {
        let mut bg = self.base.background().unwrap_or(DEFAULT_BACKGROUND);
        let mut fg = self.base.foreground().unwrap_or(Color::WHITE);
        if !self.base.is_enabled() {
            bg = bg.dim(2.0);
            fg = fg.dim(2.0);
        }
        surface.fill_polygon(&self.points, bg);
        surface.outline_polygon(&self.points, fg);
        Ok(())
    }

    fn set_position(&mut self, x: i32, y: i32) {
        let origin = self.base.position();
        let (dx, dy) = (x - origin.x, y - origin.y);
        if self.base.set_position(x, y) {
            for p in self.points.iter_mut() {
                *p = p.offset(dx, dy);
            }
        }
    }

    fn scale(&mut self, factor: f32) {
        self.base.scale(factor);
        for p in self.points.iter_mut() {
            *p = p.scale(factor);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
