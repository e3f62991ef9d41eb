//! Error types for lifeview_app

use lifeview_platform::PlatformError;
use lifeview_texture::TextureError;
use lifeview_widgets::WidgetError;
use thiserror::Error;

/// Errors that can occur in the viewer
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Configuration file missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Resources needed at startup could not be loaded
    #[error("Failed to load resources: {0}")]
    ResourceLoad(#[from] TextureError),

    /// Widget construction or update failed
    #[error("Widget error: {0}")]
    Widget(#[from] WidgetError),

    /// Platform error (windowing, fonts, input)
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Async runtime could not be started
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for ViewerError {
    fn from(err: anyhow::Error) -> Self {
        ViewerError::Other(format!("{:#}", err))
    }
}

/// Result type for lifeview_app operations
pub type Result<T> = std::result::Result<T, ViewerError>;
