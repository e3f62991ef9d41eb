//! lifeview Widget Library
//!
//! Immediate-mode widgets for the viewer's control panel, drawn straight onto
//! a [`Surface`](lifeview_core::Surface) every frame.
//!
//! # Architecture
//!
//! 1. **Widgets**: a closed set (button, label, text entry, image, arrow,
//!    separator) behind the [`Widget`] trait. Each carries a [`WidgetBase`]
//!    with its rectangle, visibility, enabled state and click debounce.
//!
//! 2. **Groups**: widgets live in ordered [`Subgroup`]s, which in turn live in
//!    one [`WidgetGroup`]. The root owns the texture cache every widget
//!    renders captions and images through.
//!
//! 3. **Dispatch**: a honoured click never runs its handler inline. The
//!    [`ClickDispatcher`] either spawns it on the tokio blocking pool or
//!    queues it for the main loop. Handlers change widgets by posting
//!    [`UiCommand`]s.
//!
//! # Example
//!
//! ```ignore
//! use lifeview_widgets::prelude::*;
//!
//! let dispatcher = ClickDispatcher::current(DispatchMode::Queued)?;
//! let mut widgets = WidgetGroup::new(dispatcher);
//! widgets.add(
//!     Subgroup::new(1)
//!         .with_font(font)
//!         .with(Button::new(
//!             WidgetBase::new(1, Rect::new(10, 5, 90, 30))
//!                 .with_on_click(on_click(|_| true)),
//!             "Quit",
//!         )),
//! );
//!
//! // Once per frame
//! widgets.run_pending();
//! widgets.draw(&mut surface, elapsed);
//! ```

pub mod arrow;
pub mod button;
pub mod command;
pub mod cursor;
pub mod dispatch;
pub mod error;
pub mod group;
pub mod image;
pub mod label;
pub mod root;
pub mod separator;
pub mod text_entry;
pub mod widget;

pub use arrow::{Arrow, Direction};
pub use button::Button;
pub use command::{ArrangeDirection, UiCommand};
pub use cursor::{CursorAnimation, CursorBlink};
pub use dispatch::{on_click, ClickDispatcher, ClickEvent, ClickHandler, DispatchMode};
pub use error::{Result, ValidationError, WidgetError};
pub use group::Subgroup;
pub use image::Image;
pub use label::{Align, Label};
pub use root::{ClickOutcome, WidgetGroup};
pub use separator::Separator;
pub use text_entry::{ChangeHandler, CommitHandler, EditKind, Entry, EntryState, KeyOutcome};
pub use widget::{FrameContext, Widget, WidgetBase, WidgetId, WidgetKind};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::arrow::Arrow;
    pub use crate::button::Button;
    pub use crate::command::{ArrangeDirection, UiCommand};
    pub use crate::dispatch::{on_click, ClickDispatcher, ClickEvent, DispatchMode};
    pub use crate::group::Subgroup;
    pub use crate::image::Image;
    pub use crate::label::{Align, Label};
    pub use crate::root::{ClickOutcome, WidgetGroup};
    pub use crate::separator::Separator;
    pub use crate::text_entry::{EditKind, Entry};
    pub use crate::widget::{Widget, WidgetBase, WidgetId};
    pub use lifeview_core::Rect;
}
