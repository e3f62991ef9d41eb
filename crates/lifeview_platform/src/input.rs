//! Input event types for keyboard, mouse, and wheel

/// Input events
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Mouse event
    Mouse(MouseEvent),
    /// Keyboard event
    Keyboard(KeyboardEvent),
    /// Wheel event, in notches (positive y is away from the user)
    Scroll {
        /// Horizontal notches
        delta_x: i32,
        /// Vertical notches
        delta_y: i32,
    },
}

// ============================================================================
// Mouse Events
// ============================================================================

/// Mouse events, in window pixel coordinates
#[derive(Clone, Debug, PartialEq)]
pub enum MouseEvent {
    /// Mouse moved to position
    Moved { x: i32, y: i32 },
    /// Mouse button pressed
    ButtonPressed { button: MouseButton, x: i32, y: i32 },
    /// Mouse button released
    ButtonReleased { button: MouseButton, x: i32, y: i32 },
}

/// Mouse buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// Other button with index
    Other(u16),
}

// ============================================================================
// Keyboard Events
// ============================================================================

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed or released
    pub key: Key,
    /// Whether the key was pressed or released
    pub state: KeyState,
    /// Modifier keys held during this event
    pub modifiers: Modifiers,
}

impl KeyboardEvent {
    pub fn pressed(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
        }
    }

    pub fn released(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Released,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Key press/release state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyState {
    /// Key was pressed
    Pressed,
    /// Key was released
    Released,
}

impl KeyState {
    pub fn is_down(self) -> bool {
        self == KeyState::Pressed
    }
}

/// Modifier key state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift key is held
    pub shift: bool,
    /// Control key is held
    pub ctrl: bool,
    /// Alt key is held
    pub alt: bool,
}

impl Modifiers {
    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
    };

    /// Check if no modifiers are held
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt
    }

    /// Check if only ctrl is held
    pub fn ctrl_only(&self) -> bool {
        !self.shift && self.ctrl && !self.alt
    }
}

/// Key codes
///
/// Printable input arrives as [`Key::Char`]; everything else has a named
/// variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    // Editing keys
    Enter,
    Escape,
    Backspace,
    Tab,
    Delete,
    Home,
    End,

    // Arrow keys
    Left,
    Right,
    Up,
    Down,

    // Modifier keys (for tracking state)
    Shift,
    Ctrl,
    Alt,

    // Character input (for text input)
    Char(char),

    // Unknown key
    Unknown,
}

impl Key {
    /// The character this key types, if any
    pub fn as_char(&self) -> Option<char> {
        match self {
            Key::Char(c) if !c.is_control() => Some(*c),
            _ => None,
        }
    }

    pub fn is_modifier(&self) -> bool {
        matches!(self, Key::Shift | Key::Ctrl | Key::Alt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_as_char() {
        assert_eq!(Key::Char('a').as_char(), Some('a'));
        assert_eq!(Key::Char('\u{7f}').as_char(), None);
        assert_eq!(Key::Enter.as_char(), None);
        assert!(Key::Ctrl.is_modifier());
    }

    #[test]
    fn test_modifiers() {
        assert!(Modifiers::default().is_empty());
        assert!(Modifiers::CTRL.ctrl_only());
        let ev = KeyboardEvent::pressed(Key::Char('z')).with_modifiers(Modifiers::CTRL);
        assert!(ev.state.is_down());
        assert!(ev.modifiers.ctrl);
    }
}
