//! Platform events and loop control

use crate::input::InputEvent;

/// Control flow after handling an event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControlFlow {
    /// Continue running the loop
    #[default]
    Continue,
    /// Exit the loop
    Exit,
}

/// Platform events
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Input event (mouse, keyboard, wheel)
    Input(InputEvent),
    /// Window was resized
    Resized { width: u32, height: u32 },
    /// Window close was requested
    Quit,
}

impl Event {
    pub fn is_quit(&self) -> bool {
        matches!(self, Event::Quit)
    }
}

impl From<InputEvent> for Event {
    fn from(event: InputEvent) -> Self {
        Event::Input(event)
    }
}
