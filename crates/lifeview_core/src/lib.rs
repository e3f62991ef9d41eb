//! lifeview Core
//!
//! This crate provides the foundational types shared by every other lifeview
//! crate:
//!
//! - **Geometry**: integer pixel points, sizes and rectangles (with support for
//!   negative extents anchored at the far corner)
//! - **Colour**: 8-bit RGBA colours with the dim/bright helpers widgets use for
//!   disabled and border rendering
//! - **Surface**: the contract a native 2D drawing backend fulfils
//! - **Automaton**: the contract the cellular-automaton engine fulfils
//!
//! # Example
//!
//! ```rust
//! use lifeview_core::{Color, Rect, RecordingSurface, Size, Surface};
//!
//! let mut surface = RecordingSurface::new(Size::new(800, 600));
//! surface.fill_rect(Rect::new(10, 10, 100, 50), Color::GREEN);
//! assert_eq!(surface.commands().len(), 1);
//! ```

pub mod automaton;
pub mod draw;
pub mod geometry;

pub use automaton::{Automaton, RUN_FOREVER};
pub use draw::{
    DrawCommand, FontId, NativeTexture, RecordedTexture, RecordingSurface, Result, Surface,
    SurfaceError, SurfaceExt, TextureId,
};
pub use geometry::{Color, Point, Rect, Size};
