//! The viewer: one poll → update → draw → present loop
//!
//! Per frame:
//!
//! 1. drain platform events (clicks, keys, wheel, mouse moves)
//! 2. run queued click handlers and apply the [`ViewerCommand`]s they posted
//! 3. clear, paint the button bar, the live cells and the widgets
//! 4. advance the automaton one generation
//! 5. present and sleep for the loop delay

use std::sync::Arc;
use std::time::Instant;

use lifeview_core::{Automaton, Color, FontId, Rect, Surface, RUN_FOREVER};
use lifeview_platform::{
    ControlFlow, Event, InputEvent, Key, KeyState, KeyboardEvent, MouseEvent, Platform,
};
use lifeview_widgets::{ClickDispatcher, ClickOutcome, Entry, UiCommand, WidgetError, WidgetGroup};

use crate::config::ViewerConfig;
use crate::controls::{self, GENERATION_ENTRY, STATUS_LABEL};
use crate::error::{Result, ViewerError};
use crate::state::{ViewerCommand, ViewerState};

const BAR_COLOR: Color = Color::rgb(0, 78, 0);
const CELL_COLOR: Color = Color::CYAN;
/// Cells larger than this are filled, smaller ones outlined
const FILL_THRESHOLD: i32 = 5;

pub struct Viewer<A: Automaton> {
    config: ViewerConfig,
    state: Arc<ViewerState>,
    widgets: WidgetGroup,
    automaton: A,
    shown_running: bool,
    started: Instant,
}

impl<A: Automaton> Viewer<A> {
    /// Load resources and build the control panel
    ///
    /// Any image that fails to load is fatal here.
    pub fn new(
        config: ViewerConfig,
        automaton: A,
        dispatcher: ClickDispatcher,
        surface: &mut dyn Surface,
        font: FontId,
    ) -> Result<Self> {
        let state = Arc::new(ViewerState::new(&config));
        let mut widgets = WidgetGroup::new(dispatcher);

        widgets
            .load_images(surface, &config.resources, &config.images)
            .map_err(|err| match err {
                WidgetError::Texture(err) => ViewerError::ResourceLoad(err),
                other => other.into(),
            })?;
        tracing::info!(
            "loaded {} images from {}",
            config.images.len(),
            config.resources.display()
        );

        controls::install(&mut widgets, &config, &state, font);

        let mut viewer = Self {
            config,
            state,
            widgets,
            automaton,
            shown_running: false,
            started: Instant::now(),
        };
        let running = viewer.automaton.is_running();
        viewer.show_running(running)?;
        Ok(viewer)
    }

    pub fn state(&self) -> &Arc<ViewerState> {
        &self.state
    }

    pub fn widgets(&self) -> &WidgetGroup {
        &self.widgets
    }

    pub fn automaton(&self) -> &A {
        &self.automaton
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    // ========================================================================
    // Events
    // ========================================================================

    pub fn handle_event(&mut self, event: &Event) -> ControlFlow {
        match event {
            Event::Quit => return ControlFlow::Exit,
            Event::Resized { width, height } => {
                tracing::debug!("window resized to {}x{}", width, height);
            }
            Event::Input(InputEvent::Mouse(MouseEvent::Moved { x, y })) => {
                self.state.set_mouse(*x, *y);
            }
            Event::Input(InputEvent::Mouse(MouseEvent::ButtonPressed { x, y, .. })) => {
                if self.widgets.click(*x, *y) == ClickOutcome::Missed {
                    self.state.set_offset(*x, *y);
                }
            }
            Event::Input(InputEvent::Mouse(MouseEvent::ButtonReleased { .. })) => {}
            Event::Input(InputEvent::Keyboard(key)) => self.handle_key(key),
            Event::Input(InputEvent::Scroll { delta_y, .. }) => self.state.zoom(*delta_y),
        }
        if self.state.quit_requested() {
            ControlFlow::Exit
        } else {
            ControlFlow::Continue
        }
    }

    fn handle_key(&mut self, event: &KeyboardEvent) {
        if self.widgets.key_press(event) {
            let rejected = self
                .widgets
                .widget_as_mut::<Entry>(GENERATION_ENTRY)
                .and_then(Entry::take_validation_error);
            if let Some(err) = rejected {
                self.set_status(err.message());
            }
            return;
        }

        // Shortcuts only apply while nothing has focus
        let unfocused = self.widgets.focused().is_none();
        if unfocused && event.state == KeyState::Pressed && event.key == Key::Char('r') {
            self.state.post(ViewerCommand::ReloadImages);
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Run queued click handlers and apply everything they posted
    pub fn update(&mut self, surface: &mut dyn Surface) {
        self.widgets.run_pending();
        for command in self.state.take_commands() {
            if let Err(err) = self.execute(command, surface) {
                tracing::warn!("viewer command failed: {}", err);
            }
        }
    }

    fn execute(&mut self, command: ViewerCommand, surface: &mut dyn Surface) -> Result<()> {
        tracing::debug!("executing {:?}", command);
        match command {
            ViewerCommand::ToggleRun => {
                let running = !self.automaton.is_running();
                self.automaton
                    .set_run_for(if running { RUN_FOREVER } else { 0 });
                self.show_running(running)?;
            }
            ViewerCommand::Step => self.automaton.set_run_for(1),
            ViewerCommand::RunFor(generations) => {
                self.automaton.set_run_for(generations);
                self.show_running(generations > 0)?;
                self.set_status(format!("Running for {} generations", generations));
            }
            ViewerCommand::ReloadImages => {
                let count = self.config.images.len();
                let result = self.widgets.reload_images(
                    surface,
                    &self.config.resources,
                    &self.config.images,
                );
                match result {
                    Ok(()) => self.set_status(format!("Reloaded {} images", count)),
                    Err(err) => self.set_status(format!("Reload failed: {}", err)),
                }
            }
            ViewerCommand::Status(message) => self.set_status(message),
            ViewerCommand::Ui(command) => self.widgets.apply(command)?,
        }
        Ok(())
    }

    fn show_running(&mut self, running: bool) -> Result<()> {
        controls::show_run_state(&mut self.widgets, &self.config, running)?;
        self.state.set_mouse_on(!running);
        self.shown_running = running;
        Ok(())
    }

    fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("status: {}", message);
        if let Err(err) = self.widgets.apply(UiCommand::set_text(STATUS_LABEL, message)) {
            tracing::warn!("status label unavailable: {}", err);
        }
    }

    /// Flip the panel to paused once a bounded run has finished
    fn sync_run_state(&mut self) {
        if self.shown_running && !self.automaton.is_running() {
            if let Err(err) = self.show_running(false) {
                tracing::warn!("failed to show paused state: {}", err);
            }
        }
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    pub fn draw(&mut self, surface: &mut dyn Surface) {
        let viewport = surface.viewport();
        let bar = self.config.buttons.bar_height();
        surface.clear(Color::BLACK);
        surface.fill_rect(Rect::new(0, 0, viewport.width, bar), BAR_COLOR);

        let size = self.state.cell_size();
        let scale = self.state.cell_scale();
        let offset = self.state.offset();
        for (cx, cy) in self.automaton.live_cells() {
            let (Some(x), Some(y)) = (
                cell_position(offset.x, cx, scale),
                cell_position(offset.y, cy, scale),
            ) else {
                continue;
            };
            if y <= bar {
                continue;
            }
            let cell = Rect::new(x, y, size, size);
            if size > FILL_THRESHOLD {
                surface.fill_rect(cell, CELL_COLOR);
            } else {
                surface.outline_rect(cell, CELL_COLOR);
            }
        }

        self.widgets.draw(surface, self.started.elapsed());

        if self.state.mouse_on() {
            let mouse = self.state.mouse();
            surface.fill_rect(
                Rect::new(mouse.x - size / 2, mouse.y - size / 2, size, size),
                CELL_COLOR,
            );
        }
    }

    /// Run until quit is requested or the platform closes
    pub fn run<P: Platform>(&mut self, platform: &mut P) -> Result<()> {
        tracing::info!("viewer running on {} platform", platform.name());
        'frames: loop {
            for event in platform.poll_events() {
                if self.handle_event(&event) == ControlFlow::Exit {
                    break 'frames;
                }
            }
            self.update(platform.surface());
            if self.state.quit_requested() {
                break;
            }

            self.draw(platform.surface());
            self.automaton.next_generation();
            self.sync_run_state();
            platform.present();
            platform.sleep(self.state.loop_delay());
        }

        self.widgets.destroy();
        tracing::info!(
            "viewer stopped at generation {}",
            self.automaton.generation()
        );
        Ok(())
    }
}

/// Screen coordinate of a cell, if it fits in pixel space
fn cell_position(offset: i32, cell: i64, scale: i32) -> Option<i32> {
    let pos = cell.checked_mul(i64::from(scale))?.checked_add(i64::from(offset))?;
    i32::try_from(pos).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::{ARROW_UP, BUTTON_STOP_START};
    use lifeview_core::{DrawCommand, RecordingSurface, Size};
    use lifeview_platform::{HeadlessPlatform, MouseButton};
    use lifeview_texture::TextureError;
    use lifeview_widgets::{DispatchMode, Widget};
    use std::collections::BTreeMap;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeLife {
        run_for: u64,
        generation: u64,
        cells: Vec<(i64, i64)>,
    }

    impl Automaton for FakeLife {
        fn next_generation(&mut self) {
            if self.run_for == 0 {
                return;
            }
            if self.run_for != RUN_FOREVER {
                self.run_for -= 1;
            }
            self.generation += 1;
        }

        fn live_cells(&self) -> Box<dyn Iterator<Item = (i64, i64)> + '_> {
            Box::new(self.cells.iter().copied())
        }

        fn run_for(&self) -> u64 {
            self.run_for
        }

        fn set_run_for(&mut self, generations: u64) {
            self.run_for = generations;
        }

        fn generation(&self) -> u64 {
            self.generation
        }

        fn add_cells(&mut self, dx: i64, dy: i64, cells: &[(i64, i64)]) {
            self.cells.extend(cells.iter().map(|(x, y)| (x + dx, y + dy)));
        }
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap()
    }

    fn test_config() -> ViewerConfig {
        ViewerConfig {
            images: BTreeMap::new(),
            dispatch: DispatchMode::Queued,
            ..Default::default()
        }
    }

    fn viewer_with(
        rt: &tokio::runtime::Runtime,
        config: ViewerConfig,
        surface: &mut RecordingSurface,
    ) -> Result<Viewer<FakeLife>> {
        let life = FakeLife {
            run_for: RUN_FOREVER,
            ..Default::default()
        };
        let dispatcher = ClickDispatcher::new(DispatchMode::Queued, rt.handle().clone());
        Viewer::new(config, life, dispatcher, surface, FontId::DEFAULT)
    }

    fn viewer(rt: &tokio::runtime::Runtime, surface: &mut RecordingSurface) -> Viewer<FakeLife> {
        viewer_with(rt, test_config(), surface).unwrap()
    }

    fn press(x: i32, y: i32) -> Event {
        Event::Input(InputEvent::Mouse(MouseEvent::ButtonPressed {
            button: MouseButton::Left,
            x,
            y,
        }))
    }

    fn key(k: Key) -> Event {
        Event::Input(InputEvent::Keyboard(KeyboardEvent::pressed(k)))
    }

    fn text_of(viewer: &Viewer<FakeLife>, id: lifeview_widgets::WidgetId) -> String {
        viewer.widgets().widget(id).unwrap().text().unwrap_or_default()
    }

    #[test]
    fn test_quit_button_ends_run() {
        let rt = runtime();
        let mut platform = HeadlessPlatform::new(Size::new(900, 900));
        let mut viewer = viewer(&rt, platform.surface());

        platform.push_frame(vec![]);
        platform.push_frame(vec![press(20, 20)]);
        viewer.run(&mut platform).unwrap();

        assert_eq!(platform.frames(), 1);
        assert_eq!(viewer.automaton().generation(), 1);
        assert_eq!(platform.sleeps(), &[Duration::ZERO]);
        assert!(viewer.widgets().is_destroyed());
    }

    #[test]
    fn test_platform_quit_exits_without_drawing() {
        let rt = runtime();
        let mut platform = HeadlessPlatform::new(Size::new(900, 900));
        let mut viewer = viewer(&rt, platform.surface());
        viewer.run(&mut platform).unwrap();
        assert_eq!(platform.frames(), 0);
    }

    #[test]
    fn test_stop_start_toggles_panel() {
        let rt = runtime();
        let mut surface = RecordingSurface::new(Size::new(900, 900));
        let mut viewer = viewer(&rt, &mut surface);
        assert_eq!(text_of(&viewer, BUTTON_STOP_START), "Stop");
        assert!(!viewer.state().mouse_on());

        viewer.handle_event(&press(180, 20));
        viewer.update(&mut surface);
        assert!(!viewer.automaton().is_running());
        assert_eq!(text_of(&viewer, BUTTON_STOP_START), "Start");
        assert!(viewer.widgets().widget(ARROW_UP).unwrap().base().is_visible());
        assert!(viewer.state().mouse_on());
    }

    #[test]
    fn test_click_on_empty_space_moves_view() {
        let rt = runtime();
        let mut surface = RecordingSurface::new(Size::new(900, 900));
        let mut viewer = viewer(&rt, &mut surface);
        viewer.handle_event(&press(600, 600));
        assert_eq!(viewer.state().offset(), lifeview_core::Point::new(600, 600));
    }

    #[test]
    fn test_wheel_zooms() {
        let rt = runtime();
        let mut surface = RecordingSurface::new(Size::new(900, 900));
        let mut viewer = viewer(&rt, &mut surface);
        viewer.handle_event(&Event::Input(InputEvent::Scroll {
            delta_x: 0,
            delta_y: -20,
        }));
        assert_eq!(viewer.state().cell_size(), 1);
    }

    #[test]
    fn test_cells_below_bar_are_drawn() {
        let rt = runtime();
        let mut surface = RecordingSurface::new(Size::new(900, 900));
        let mut viewer = viewer(&rt, &mut surface);
        viewer.automaton.add_cells(0, 0, &[(0, 0), (0, -50)]);
        viewer.state().set_offset(100, 100);

        surface.clear_commands();
        viewer.draw(&mut surface);
        let cyan: Vec<_> = surface
            .commands()
            .iter()
            .filter(|c| {
                matches!(c, DrawCommand::OutlineRect { color, .. } | DrawCommand::FillRect { color, .. }
                    if *color == CELL_COLOR)
            })
            .cloned()
            .collect();
        // (0, -50) lands above the bar and is skipped
        assert_eq!(
            cyan,
            vec![DrawCommand::OutlineRect {
                rect: Rect::new(100, 100, 5, 5),
                color: CELL_COLOR
            }]
        );

        viewer.state().zoom(1);
        surface.clear_commands();
        viewer.draw(&mut surface);
        assert!(surface.commands().contains(&DrawCommand::FillRect {
            rect: Rect::new(100, 100, 6, 6),
            color: CELL_COLOR
        }));
    }

    #[test]
    fn test_rejected_entry_key_shows_status() {
        let rt = runtime();
        let mut surface = RecordingSurface::new(Size::new(900, 900));
        let mut viewer = viewer(&rt, &mut surface);

        // Info row sits below the bar at y = 100
        viewer.handle_event(&press(20, 110));
        assert_eq!(viewer.widgets().focused(), Some(GENERATION_ENTRY));
        viewer.handle_event(&key(Key::Char('x')));
        assert_eq!(text_of(&viewer, STATUS_LABEL), "'x' is not a digit");
        assert_eq!(text_of(&viewer, GENERATION_ENTRY), "");
    }

    #[test]
    fn test_entry_commit_runs_for_generations() {
        let rt = runtime();
        let mut surface = RecordingSurface::new(Size::new(900, 900));
        let mut viewer = viewer(&rt, &mut surface);
        viewer.automaton.set_run_for(0);

        viewer.handle_event(&press(20, 110));
        viewer.handle_event(&key(Key::Char('2')));
        viewer.handle_event(&key(Key::Enter));
        viewer.update(&mut surface);
        assert_eq!(viewer.automaton().run_for(), 2);
        assert_eq!(text_of(&viewer, BUTTON_STOP_START), "Stop");
        assert_eq!(text_of(&viewer, STATUS_LABEL), "Running for 2 generations");

        // Panel flips back once the run is used up
        for _ in 0..2 {
            viewer.automaton.next_generation();
            viewer.sync_run_state();
        }
        assert_eq!(text_of(&viewer, BUTTON_STOP_START), "Start");
    }

    #[test]
    fn test_missing_image_is_fatal_at_startup() {
        let rt = runtime();
        let mut surface = RecordingSurface::new(Size::new(900, 900));
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config();
        config.resources = dir.path().to_path_buf();
        config.images.insert("slower".into(), "slower.png".into());

        assert!(matches!(
            viewer_with(&rt, config, &mut surface),
            Err(ViewerError::ResourceLoad(TextureError::FileLoad(_)))
        ));
    }

    #[test]
    fn test_reload_failure_keeps_running() {
        let rt = runtime();
        let mut surface = RecordingSurface::new(Size::new(900, 900));
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("slower.png");
        ::image::RgbaImage::from_pixel(3, 3, ::image::Rgba([0, 0, 0, 255]))
            .save(&file)
            .unwrap();

        let mut config = test_config();
        config.resources = dir.path().to_path_buf();
        config.images.insert("slower".into(), "slower.png".into());
        let mut viewer = viewer_with(&rt, config, &mut surface).unwrap();

        std::fs::remove_file(&file).unwrap();
        viewer.handle_event(&key(Key::Char('r')));
        viewer.update(&mut surface);
        assert!(text_of(&viewer, STATUS_LABEL).starts_with("Reload failed"));
        assert_eq!(
            lifeview_texture::lock_shared(viewer.widgets().texture_cache()).len(),
            1
        );
    }
}
