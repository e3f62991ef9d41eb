//! Widget error types

use lifeview_core::SurfaceError;
use lifeview_texture::TextureError;
use thiserror::Error;

use crate::widget::WidgetId;

/// Widget-related errors
#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    #[error("Widget {0} has no texture cache")]
    NoTextureCache(WidgetId),

    #[error("Widget {0} has no font to render with")]
    NoFont(WidgetId),

    #[error("Texture '{name}' is not loaded (widget {widget})")]
    MissingTexture { widget: WidgetId, name: String },

    #[error("Unknown widget: {0}")]
    UnknownWidget(WidgetId),

    #[error("Unknown subgroup: {0}")]
    UnknownSubgroup(u32),

    #[error("Widget {0} does not hold text")]
    NotText(WidgetId),

    #[error("Widget {0} is not an image")]
    NotImage(WidgetId),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("No async runtime available: {0}")]
    NoRuntime(String),
}

/// Result type for widget operations
pub type Result<T> = std::result::Result<T, WidgetError>;

/// Rejection returned by a text entry's change callback
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
