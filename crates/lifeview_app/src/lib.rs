//! lifeview Viewer
//!
//! Wires a cellular-automaton engine to a window: the button bar, the pan
//! arrows, the generation entry and the cell renderer, driven by one
//! poll/draw loop.
//!
//! # Example
//!
//! ```ignore
//! use lifeview_app::prelude::*;
//!
//! fn main() -> Result<()> {
//!     lifeview_app::init_tracing();
//!     let config = ViewerConfig::load_or_default("lifeview.toml".as_ref())?;
//!     let mut platform = MyPlatform::open(&config.window)?;
//!     lifeview_app::try_launch(config, engine, &mut platform, font)
//! }
//! ```

pub mod config;
pub mod controls;
pub mod error;
pub mod state;
pub mod viewer;

use std::process::ExitCode;

use lifeview_core::{Automaton, FontId};
use lifeview_platform::Platform;
use lifeview_widgets::ClickDispatcher;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::{ButtonConfig, ViewerConfig, WindowConfig};
pub use error::{Result, ViewerError};
pub use state::{ViewerCommand, ViewerState};
pub use viewer::Viewer;

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::config::ViewerConfig;
    pub use crate::error::{Result, ViewerError};
    pub use crate::state::{ViewerCommand, ViewerState};
    pub use crate::viewer::Viewer;

    pub use lifeview_core::{Automaton, Color, FontId, Point, Rect, Size, Surface};
    pub use lifeview_platform::{Event, HeadlessPlatform, Platform};
}

/// Install the global log subscriber (`RUST_LOG`, default `info`)
///
/// Does nothing if a subscriber is already installed.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Start the click runtime, build the viewer and run it to completion
pub fn try_launch<A, P>(
    config: ViewerConfig,
    automaton: A,
    platform: &mut P,
    font: FontId,
) -> Result<()>
where
    A: Automaton,
    P: Platform,
{
    let runtime = click_runtime()?;
    let dispatcher = ClickDispatcher::new(config.dispatch, runtime.handle().clone());

    let result = Viewer::new(config, automaton, dispatcher, platform.surface(), font)
        .and_then(|mut viewer| viewer.run(platform));
    shutdown_click_runtime(runtime);
    result
}

fn click_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .thread_name("lifeview-click")
        .enable_time()
        .build()
        .map_err(|e| ViewerError::Runtime(e.to_string()))
}

/// Stop the click runtime without waiting for handlers still running
fn shutdown_click_runtime(runtime: Runtime) {
    runtime.shutdown_background();
    tracing::debug!("click runtime shut down");
}

/// Like [`try_launch`], logging any failure as the process exit status
pub fn launch<A, P>(config: ViewerConfig, automaton: A, platform: &mut P, font: FontId) -> ExitCode
where
    A: Automaton,
    P: Platform,
{
    match try_launch(config, automaton, platform, font) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("lifeview failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifeview_core::{Rect, Size, RUN_FOREVER};
    use lifeview_platform::HeadlessPlatform;
    use lifeview_widgets::{on_click, DispatchMode, WidgetBase};
    use std::collections::BTreeMap;
    use std::time::{Duration, Instant};

    struct Still {
        run_for: u64,
        generation: u64,
    }

    impl Automaton for Still {
        fn next_generation(&mut self) {
            if self.run_for > 0 {
                self.generation += 1;
            }
        }

        fn live_cells(&self) -> Box<dyn Iterator<Item = (i64, i64)> + '_> {
            Box::new(std::iter::once((1, 1)))
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

        fn add_cells(&mut self, _dx: i64, _dy: i64, _cells: &[(i64, i64)]) {}
    }

    fn still() -> Still {
        Still {
            run_for: RUN_FOREVER,
            generation: 0,
        }
    }

    #[test]
    fn test_launch_runs_headless_script() {
        init_tracing();
        let config = ViewerConfig {
            images: BTreeMap::new(),
            ..Default::default()
        };
        let mut platform = HeadlessPlatform::new(Size::new(900, 900));
        platform.push_frame(vec![]);
        platform.push_frame(vec![]);

        try_launch(config, still(), &mut platform, FontId::DEFAULT).unwrap();
        assert_eq!(platform.frames(), 2);
    }

    #[test]
    fn test_exit_abandons_running_handlers() {
        let runtime = click_runtime().unwrap();
        let dispatcher = ClickDispatcher::new(DispatchMode::Spawned, runtime.handle().clone());
        let (started_tx, started_rx) = std::sync::mpsc::channel();
        let base = WidgetBase::new(1, Rect::new(0, 0, 10, 10)).with_on_click(on_click(
            move |_| {
                let _ = started_tx.send(());
                std::thread::sleep(Duration::from_secs(3));
                true
            },
        ));

        assert!(dispatcher.click(&base, 1, 1));
        started_rx.recv_timeout(Duration::from_secs(2)).unwrap();

        let start = Instant::now();
        drop(dispatcher);
        shutdown_click_runtime(runtime);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_launch_reports_missing_resources() {
        let dir = tempfile::tempdir().unwrap();
        let config = ViewerConfig {
            resources: dir.path().to_path_buf(),
            ..Default::default()
        };
        let mut platform = HeadlessPlatform::new(Size::new(900, 900));

        assert!(matches!(
            try_launch(config.clone(), still(), &mut platform, FontId::DEFAULT),
            Err(ViewerError::ResourceLoad(_))
        ));
        let code = launch(config, still(), &mut platform, FontId::DEFAULT);
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::FAILURE));
        assert_eq!(platform.frames(), 0);
    }
}
