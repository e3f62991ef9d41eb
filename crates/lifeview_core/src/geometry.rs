//! Pixel geometry and colour types
//!
//! Everything here works in whole device pixels. Widths and heights are signed:
//! a negative extent means the rectangle is anchored at its far corner, which
//! is how the arrow widgets express direction.

/// 2D point in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this point by a delta
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Scale both coordinates, truncating towards zero
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: scale_i32(self.x, factor),
            y: scale_i32(self.y, factor),
        }
    }
}

/// 2D size in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0,
        height: 0,
    };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Rectangle with a signed extent
///
/// `x`/`y` is the anchor corner. When `w` or `h` is negative the rectangle
/// extends left/up from the anchor; [`Rect::normalized`] converts it to the
/// equivalent rectangle with a positive extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0,
        y: 0,
        w: 0,
        h: 0,
    };

    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// The same area expressed with a non-negative width and height
    pub fn normalized(&self) -> Rect {
        let (x, w) = if self.w < 0 {
            (self.x + self.w, -self.w)
        } else {
            (self.x, self.w)
        };
        let (y, h) = if self.h < 0 {
            (self.y + self.h, -self.h)
        } else {
            (self.y, self.h)
        };
        Rect { x, y, w, h }
    }

    /// Right edge of the normalized rectangle
    pub fn right(&self) -> i32 {
        let r = self.normalized();
        r.x + r.w
    }

    /// Bottom edge of the normalized rectangle
    pub fn bottom(&self) -> i32 {
        let r = self.normalized();
        r.y + r.h
    }

    /// Hit test. Edges are inclusive on all four sides.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let r = self.normalized();
        x >= r.x && y >= r.y && x <= r.x + r.w && y <= r.y + r.h
    }

    /// Inset the rectangle by `by` pixels on every side
    pub fn shrink(&self, by: i32) -> Rect {
        let r = self.normalized();
        Rect {
            x: r.x + by,
            y: r.y + by,
            w: r.w - by * 2,
            h: r.h - by * 2,
        }
    }

    /// Uniformly scale position and size, truncating towards zero
    pub fn scale(&self, factor: f32) -> Rect {
        Rect {
            x: scale_i32(self.x, factor),
            y: scale_i32(self.y, factor),
            w: scale_i32(self.w, factor),
            h: scale_i32(self.h, factor),
        }
    }

    /// Smallest rectangle enclosing all points, `None` for an empty slice
    pub fn bounding(points: &[Point]) -> Option<Rect> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }
}

pub(crate) fn scale_i32(v: i32, factor: f32) -> i32 {
    (v as f32 * factor) as i32
}

/// 8-bit RGBA colour
///
/// Hashable so it can take part in texture cache keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as u8;
        let g = ((hex >> 8) & 0xFF) as u8;
        let b = (hex & 0xFF) as u8;
        Self::rgb(r, g, b)
    }

    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.a = alpha;
        self
    }

    /// Divide the colour channels by `div`, keeping alpha.
    ///
    /// Used for disabled text and borders.
    pub fn dim(self, div: f32) -> Self {
        if div <= 0.0 {
            return self;
        }
        let f = |c: u8| (c as f32 / div) as u8;
        Self {
            r: f(self.r),
            g: f(self.g),
            b: f(self.b),
            a: self.a,
        }
    }

    /// Brighter variant of the colour, used for button borders
    pub fn bright(self) -> Self {
        let f = |c: u8| c.saturating_add(((255 - c) as u16 / 2) as u8).max(c.saturating_mul(2));
        Self {
            r: f(self.r),
            g: f(self.g),
            b: f(self.b),
            a: self.a,
        }
    }
}

impl From<[u8; 4]> for Color {
    fn from(c: [u8; 4]) -> Self {
        Color::rgba(c[0], c[1], c[2], c[3])
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::rgb(r, g, b)
    }
}
