//! State shared between the main loop and click handlers
//!
//! Handlers run on other threads and never touch widgets or the automaton.
//! Simple values (delay, offsets, zoom, the quit flag) are atomics they may
//! change directly; anything that needs the widgets or the automaton is posted
//! as a [`ViewerCommand`] and applied by the main loop on its next tick.

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use lifeview_core::Point;
use lifeview_widgets::UiCommand;

use crate::config::ViewerConfig;

/// Largest cell edge the wheel can reach
pub const MAX_CELL_SIZE: i32 = 4096;

/// Work for the main loop
#[derive(Clone, Debug, PartialEq)]
pub enum ViewerCommand {
    /// Pause if running, run forever if paused
    ToggleRun,
    /// Advance exactly one generation
    Step,
    /// Run for a fixed number of generations (0 pauses)
    RunFor(u64),
    /// Reload images from the resource directory
    ReloadImages,
    /// Show a message on the status label
    Status(String),
    /// Apply a widget change
    Ui(UiCommand),
}

#[derive(Debug)]
pub struct ViewerState {
    quit: AtomicBool,
    loop_delay_ms: AtomicU64,
    offset_x: AtomicI32,
    offset_y: AtomicI32,
    cell_size: AtomicI32,
    mouse_x: AtomicI32,
    mouse_y: AtomicI32,
    mouse_on: AtomicBool,
    commands: Mutex<Vec<ViewerCommand>>,
}

impl ViewerState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            quit: AtomicBool::new(false),
            loop_delay_ms: AtomicU64::new(config.loop_delay_ms),
            // Initial view origin sits one button height in
            offset_x: AtomicI32::new(config.buttons.height),
            offset_y: AtomicI32::new(0),
            cell_size: AtomicI32::new(config.cell_size.clamp(1, MAX_CELL_SIZE)),
            mouse_x: AtomicI32::new(0),
            mouse_y: AtomicI32::new(0),
            mouse_on: AtomicBool::new(false),
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn request_quit(&self) {
        self.quit.store(true, Ordering::SeqCst);
    }

    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::SeqCst)
    }

    // ------------------------------------------------------------------------
    // Speed
    // ------------------------------------------------------------------------

    pub fn loop_delay(&self) -> Duration {
        Duration::from_millis(self.loop_delay_ms.load(Ordering::SeqCst))
    }

    /// Lengthen the frame delay by 5 ms
    pub fn slower(&self) {
        self.loop_delay_ms.fetch_add(5, Ordering::SeqCst);
    }

    /// Shorten the frame delay by 10 ms, never below zero
    pub fn faster(&self) {
        let _ = self
            .loop_delay_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |ms| {
                Some(ms.saturating_sub(10))
            });
    }

    pub fn fastest(&self) {
        self.loop_delay_ms.store(0, Ordering::SeqCst);
    }

    // ------------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------------

    pub fn offset(&self) -> Point {
        Point::new(
            self.offset_x.load(Ordering::SeqCst),
            self.offset_y.load(Ordering::SeqCst),
        )
    }

    pub fn set_offset(&self, x: i32, y: i32) {
        self.offset_x.store(x, Ordering::SeqCst);
        self.offset_y.store(y, Ordering::SeqCst);
    }

    pub fn pan(&self, dx: i32, dy: i32) {
        self.offset_x.fetch_add(dx, Ordering::SeqCst);
        self.offset_y.fetch_add(dy, Ordering::SeqCst);
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size.load(Ordering::SeqCst)
    }

    /// Distance between neighbouring cells
    pub fn cell_scale(&self) -> i32 {
        self.cell_size().saturating_mul(2)
    }

    /// Grow or shrink cells by `delta`, kept within `1..=MAX_CELL_SIZE`
    pub fn zoom(&self, delta: i32) {
        let _ = self
            .cell_size
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |size| {
                Some(size.saturating_add(delta).clamp(1, MAX_CELL_SIZE))
            });
    }

    // ------------------------------------------------------------------------
    // Mouse
    // ------------------------------------------------------------------------

    pub fn set_mouse(&self, x: i32, y: i32) {
        self.mouse_x.store(x, Ordering::SeqCst);
        self.mouse_y.store(y, Ordering::SeqCst);
    }

    pub fn mouse(&self) -> Point {
        Point::new(
            self.mouse_x.load(Ordering::SeqCst),
            self.mouse_y.load(Ordering::SeqCst),
        )
    }

    /// Whether the cell under the mouse is highlighted
    pub fn mouse_on(&self) -> bool {
        self.mouse_on.load(Ordering::SeqCst)
    }

    pub fn set_mouse_on(&self, on: bool) {
        self.mouse_on.store(on, Ordering::SeqCst);
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    pub fn post(&self, command: ViewerCommand) {
        tracing::trace!("posted {:?}", command);
        self.lock_commands().push(command);
    }

    pub fn status(&self, message: impl Into<String>) {
        self.post(ViewerCommand::Status(message.into()));
    }

    /// Take every posted command, oldest first
    pub fn take_commands(&self) -> Vec<ViewerCommand> {
        std::mem::take(&mut *self.lock_commands())
    }

    fn lock_commands(&self) -> std::sync::MutexGuard<'_, Vec<ViewerCommand>> {
        self.commands.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn state() -> ViewerState {
        ViewerState::new(&ViewerConfig::default())
    }

    #[test]
    fn test_speed_controls() {
        let s = state();
        s.slower();
        s.slower();
        assert_eq!(s.loop_delay(), Duration::from_millis(10));
        s.faster();
        assert_eq!(s.loop_delay(), Duration::ZERO);
        s.faster();
        assert_eq!(s.loop_delay(), Duration::ZERO);
        s.slower();
        s.fastest();
        assert_eq!(s.loop_delay(), Duration::ZERO);
    }

    #[test]
    fn test_zoom_floor_and_scale() {
        let s = state();
        assert_eq!(s.cell_scale(), 10);
        s.zoom(-10);
        assert_eq!(s.cell_size(), 1);
        assert_eq!(s.cell_scale(), 2);
        s.zoom(3);
        assert_eq!(s.cell_size(), 4);
    }

    #[test]
    fn test_huge_wheel_delta_is_capped() {
        let s = state();
        s.zoom(i32::MAX);
        s.zoom(i32::MAX);
        assert_eq!(s.cell_size(), MAX_CELL_SIZE);
        assert_eq!(s.cell_scale(), MAX_CELL_SIZE * 2);
        s.zoom(i32::MIN);
        assert_eq!(s.cell_size(), 1);
    }

    #[test]
    fn test_offset_and_pan() {
        let s = state();
        assert_eq!(s.offset(), Point::new(70, 0));
        s.pan(100, -100);
        assert_eq!(s.offset(), Point::new(170, -100));
        s.set_offset(5, 6);
        assert_eq!(s.offset(), Point::new(5, 6));
    }

    #[test]
    fn test_commands_from_many_threads() {
        let s = Arc::new(state());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let s = Arc::clone(&s);
                std::thread::spawn(move || s.post(ViewerCommand::RunFor(i)))
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let mut taken = s.take_commands();
        taken.sort_by_key(|c| match c {
            ViewerCommand::RunFor(n) => *n,
            _ => u64::MAX,
        });
        assert_eq!(
            taken,
            (0..4).map(ViewerCommand::RunFor).collect::<Vec<_>>()
        );
        assert!(s.take_commands().is_empty());
    }
}
