//! Text entry cursor blink

use std::time::Duration;

/// Cursor animation style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorAnimation {
    /// Classic on/off blink
    #[default]
    Blink,
    /// Always visible (no animation)
    Solid,
}

/// Blink timing for an entry's cursor bar
///
/// Within each period the bar is hidden for the first `off` portion and shown
/// for the rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorBlink {
    pub animation: CursorAnimation,
    pub period: Duration,
    pub off: Duration,
}

impl Default for CursorBlink {
    fn default() -> Self {
        Self {
            animation: CursorAnimation::default(),
            period: Duration::from_millis(1000),
            off: Duration::from_millis(300),
        }
    }
}

impl CursorBlink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cursor that never blinks
    pub fn solid() -> Self {
        Self {
            animation: CursorAnimation::Solid,
            ..Self::default()
        }
    }

    /// Set blink period
    pub fn with_period(mut self, period: Duration, off: Duration) -> Self {
        self.period = period;
        self.off = off;
        self
    }

    /// Whether the bar is shown at `time`
    pub fn is_visible(&self, time: Duration) -> bool {
        match self.animation {
            CursorAnimation::Solid => true,
            CursorAnimation::Blink => {
                let period = self.period.as_millis();
                if period == 0 {
                    return true;
                }
                time.as_millis() % period > self.off.as_millis()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blink_phases() {
        let blink = CursorBlink::new();
        assert!(!blink.is_visible(Duration::from_millis(0)));
        assert!(!blink.is_visible(Duration::from_millis(300)));
        assert!(blink.is_visible(Duration::from_millis(301)));
        assert!(blink.is_visible(Duration::from_millis(999)));
        assert!(!blink.is_visible(Duration::from_millis(1250)));
    }

    #[test]
    fn test_solid_always_visible() {
        let blink = CursorBlink::solid();
        assert!(blink.is_visible(Duration::ZERO));
        assert!(blink.is_visible(Duration::from_millis(100)));
    }
}
