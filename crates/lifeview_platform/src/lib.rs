//! lifeview Platform Layer
//!
//! Platform-agnostic types for the viewer's poll/draw loop: input events,
//! window events and the [`Platform`] trait a native backend implements.
//!
//! # Example
//!
//! ```rust
//! use lifeview_core::Size;
//! use lifeview_platform::*;
//!
//! let mut platform = HeadlessPlatform::new(Size::new(800, 600));
//! platform.push_frame(vec![Event::Input(InputEvent::Keyboard(
//!     KeyboardEvent::pressed(Key::Char('7')),
//! ))]);
//!
//! loop {
//!     let events = platform.poll_events();
//!     if events.iter().any(Event::is_quit) {
//!         break;
//!     }
//!     platform.present();
//! }
//! assert_eq!(platform.frames(), 1);
//! ```

mod error;
mod event;
mod input;
mod platform;

// Re-export all public types
pub use error::{PlatformError, Result};
pub use event::{ControlFlow, Event};
pub use input::{InputEvent, Key, KeyState, KeyboardEvent, Modifiers, MouseButton, MouseEvent};
pub use platform::{HeadlessPlatform, Platform};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{PlatformError, Result};
    pub use crate::event::{ControlFlow, Event};
    pub use crate::input::{
        InputEvent, Key, KeyState, KeyboardEvent, Modifiers, MouseButton, MouseEvent,
    };
    pub use crate::platform::{HeadlessPlatform, Platform};
}
