//! Platform trait and the headless implementation

use std::collections::VecDeque;
use std::time::Duration;

use lifeview_core::{RecordingSurface, Size, Surface};

use crate::event::Event;

/// Platform abstraction trait
///
/// A backend owns the window, its drawing surface and the native event queue.
/// The viewer drives it with a simple poll → draw → present → sleep loop.
pub trait Platform {
    /// The drawing surface type for this platform
    type Surface: Surface;

    /// Get the platform name
    fn name(&self) -> &'static str;

    /// Drain every event that arrived since the last poll
    fn poll_events(&mut self) -> Vec<Event>;

    /// The window's drawing surface
    fn surface(&mut self) -> &mut Self::Surface;

    /// Show the frame drawn since the last present
    fn present(&mut self) {
        self.surface().present();
    }

    /// Pause between frames
    fn sleep(&mut self, delay: Duration);
}

/// Platform without a window, for tests and scripted runs
///
/// Each call to `poll_events` hands out the next scripted batch; once the
/// script runs out it reports [`Event::Quit`] so loops always terminate.
#[derive(Debug)]
pub struct HeadlessPlatform {
    surface: RecordingSurface,
    script: VecDeque<Vec<Event>>,
    sleeps: Vec<Duration>,
    frames: usize,
}

impl HeadlessPlatform {
    pub fn new(viewport: Size) -> Self {
        Self::with_surface(RecordingSurface::new(viewport))
    }

    pub fn with_surface(surface: RecordingSurface) -> Self {
        Self {
            surface,
            script: VecDeque::new(),
            sleeps: Vec::new(),
            frames: 0,
        }
    }

    /// Queue the events delivered by one future poll
    pub fn push_frame(&mut self, events: Vec<Event>) {
        self.script.push_back(events);
    }

    /// Number of frames presented so far
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Every delay the loop asked for, in order
    pub fn sleeps(&self) -> &[Duration] {
        &self.sleeps
    }

    pub fn recording(&self) -> &RecordingSurface {
        &self.surface
    }
}

impl Platform for HeadlessPlatform {
    type Surface = RecordingSurface;

    fn name(&self) -> &'static str {
        "headless"
    }

    fn poll_events(&mut self) -> Vec<Event> {
        self.script.pop_front().unwrap_or_else(|| {
            tracing::debug!("headless script exhausted, requesting quit");
            vec![Event::Quit]
        })
    }

    fn surface(&mut self) -> &mut RecordingSurface {
        &mut self.surface
    }

    fn present(&mut self) {
        self.frames += 1;
        self.surface.present();
    }

    fn sleep(&mut self, delay: Duration) {
        // Recorded only; headless runs never block
        self.sleeps.push(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, MouseEvent};

    #[test]
    fn test_headless_script_then_quit() {
        let mut platform = HeadlessPlatform::new(Size::new(320, 200));
        platform.push_frame(vec![Event::Input(InputEvent::Mouse(MouseEvent::Moved {
            x: 4,
            y: 5,
        }))]);

        assert_eq!(platform.poll_events().len(), 1);
        assert_eq!(platform.poll_events(), vec![Event::Quit]);

        platform.present();
        platform.sleep(Duration::from_millis(7));
        assert_eq!(platform.frames(), 1);
        assert_eq!(platform.sleeps(), &[Duration::from_millis(7)]);
        assert_eq!(platform.recording().commands().len(), 1);
        assert_eq!(platform.name(), "headless");
    }
}
