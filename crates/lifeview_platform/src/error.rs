//! Errors a windowing backend reports while starting up

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatformError {
    /// The video/input subsystem could not start
    #[error("Platform initialization failed: {0}")]
    InitFailed(String),

    /// Failed to create the window or its drawing surface
    #[error("Failed to create window {width}x{height}: {reason}")]
    WindowCreation {
        width: u32,
        height: u32,
        reason: String,
    },

    /// Failed to open the UI font
    #[error("Failed to load font '{path}': {reason}")]
    FontLoad { path: String, reason: String },
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_resource() {
        let err = PlatformError::WindowCreation {
            width: 900,
            height: 900,
            reason: "no display".into(),
        };
        assert_eq!(err.to_string(), "Failed to create window 900x900: no display");

        let err = PlatformError::FontLoad {
            path: "fonts/mono.ttf".into(),
            reason: "not found".into(),
        };
        assert!(err.to_string().contains("fonts/mono.ttf"));
    }
}
