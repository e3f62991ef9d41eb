//! Viewer configuration
//!
//! Loaded from a TOML file; every field has a default so a partial file (or
//! none at all) is fine.
//!
//! ```toml
//! loop_delay_ms = 20
//! cell_size = 3
//! dispatch = "queued"
//!
//! [buttons]
//! height = 60
//! background = [0, 40, 0, 255]
//!
//! [images]
//! slower = "slower.png"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use lifeview_core::{Color, Point};
use lifeview_widgets::DispatchMode;
use serde::Deserialize;

use crate::error::{Result, ViewerError};

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub buttons: ButtonConfig,
    /// Delay between frames at startup
    pub loop_delay_ms: u64,
    /// Cell edge in pixels; cells are spaced at twice this
    pub cell_size: i32,
    /// Anchor of the pan arrows
    pub arrow_position: [i32; 2],
    /// Debounce for Stop/Start
    pub stop_start_debounce_ms: u64,
    /// Debounce for Step
    pub step_debounce_ms: u64,
    /// Directory images are loaded from
    pub resources: PathBuf,
    /// Texture name → file name under `resources`
    pub images: BTreeMap<String, String>,
    pub dispatch: DispatchMode,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ButtonConfig {
    pub height: i32,
    pub width: i32,
    pub margin_top: i32,
    pub gap: i32,
    /// RGBA
    pub background: [u8; 4],
    /// RGBA
    pub foreground: [u8; 4],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let images = [
            ("lem", "lem.png"),
            ("slower", "slower.png"),
            ("faster", "faster.png"),
            ("fastest", "fastest.png"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            window: WindowConfig::default(),
            buttons: ButtonConfig::default(),
            loop_delay_ms: 0,
            cell_size: 5,
            arrow_position: [245, 180],
            stop_start_debounce_ms: 500,
            step_debounce_ms: 10,
            resources: PathBuf::from("resources"),
            images,
            dispatch: DispatchMode::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "lifeview".to_string(),
            width: 900,
            height: 900,
        }
    }
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            height: 70,
            width: 150,
            margin_top: 10,
            gap: 10,
            background: [0, 56, 0, 128],
            foreground: [0, 255, 0, 255],
        }
    }
}

impl ButtonConfig {
    pub fn background(&self) -> Color {
        Color::from(self.background)
    }

    pub fn foreground(&self) -> Color {
        Color::from(self.foreground)
    }

    /// Height of the bar the buttons sit in
    pub fn bar_height(&self) -> i32 {
        self.height + self.margin_top * 2
    }
}

impl ViewerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        Self::read(path).map_err(|e| ViewerError::Config(format!("{:#}", e)))
    }

    /// Load `path` if it exists, otherwise use the defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ViewerError::Config(e.to_string()))
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ViewerConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn loop_delay(&self) -> Duration {
        Duration::from_millis(self.loop_delay_ms)
    }

    pub fn arrow_anchor(&self) -> Point {
        Point::new(self.arrow_position[0], self.arrow_position[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.buttons.bar_height(), 90);
        assert_eq!(config.buttons.background(), Color::rgba(0, 56, 0, 128));
        assert_eq!(config.stop_start_debounce_ms, 500);
        assert_eq!(config.dispatch, DispatchMode::Spawned);
        assert_eq!(config.images.get("slower").map(String::as_str), Some("slower.png"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ViewerConfig::from_toml(
            r#"
            loop_delay_ms = 20
            dispatch = "queued"

            [buttons]
            height = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.loop_delay(), Duration::from_millis(20));
        assert_eq!(config.dispatch, DispatchMode::Queued);
        assert_eq!(config.buttons.height, 60);
        assert_eq!(config.buttons.width, 150);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_bad_toml_is_a_config_error() {
        assert!(matches!(
            ViewerConfig::from_toml("cell_size = \"big\""),
            Err(ViewerError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lifeview.toml");
        fs::write(&path, "cell_size = 2\n[images]\nlem = \"lem2.png\"\n").unwrap();

        let config = ViewerConfig::load(&path).unwrap();
        assert_eq!(config.cell_size, 2);
        assert_eq!(config.images.len(), 1);

        let missing = dir.path().join("nope.toml");
        assert!(matches!(ViewerConfig::load(&missing), Err(ViewerError::Config(_))));
        assert_eq!(ViewerConfig::load_or_default(&missing).unwrap(), ViewerConfig::default());
    }
}
