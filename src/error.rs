//! Error types for the Sunshift applet
//!
//! This module defines all error types used throughout the application,
//! providing clear error messages and proper error propagation.
//!
//! Error variants use `#[source]` to preserve error chains for better
//! observability and debugging.

use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Main error type for the Sunshift applet
#[derive(Debug, Error)]
pub enum SunshiftError {
    /// A bridge command to the gamma backend failed
    /// Preserves the underlying error source for full error chain transparency
    #[error("Bridge call failed: {0}")]
    BridgeCallFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// D-Bus transport error
    #[error("D-Bus error: {0}")]
    DbusError(#[from] zbus::Error),

    /// Event subscription to the backend could not be established
    /// Preserves the underlying error source for full error chain transparency
    #[error("Event subscription failed: {0}")]
    EventSubscriptionFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A preset id was not found in the preset set
    #[error("Preset not found: {0}")]
    PresetNotFound(String),

    /// Configuration error
    /// Preserves the underlying error source for full error chain transparency
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// GUI platform error
    #[error("GUI error: {0}")]
    GuiError(String),
}

/// Result type alias for Sunshift operations
pub type Result<T> = std::result::Result<T, SunshiftError>;

/// Convert an error to a user-friendly message
///
/// This function takes a `SunshiftError` and returns a message suitable
/// for displaying to end users in the error banner.
pub fn get_user_friendly_error(error: &SunshiftError) -> String {
    match error {
        SunshiftError::BridgeCallFailed(_) | SunshiftError::DbusError(_) => {
            "Unable to reach the gamma backend.\n\n\
             Please ensure:\n\
             - wl-gammarelay-rs is running\n\
             - The session D-Bus bus is available"
                .to_string()
        }
        SunshiftError::EventSubscriptionFailed(_) => "Failed to subscribe to tray events.\n\n\
             Tray shortcuts will not work this session.\n\
             The main window remains fully functional."
            .to_string(),
        SunshiftError::PresetNotFound(_) => "Preset not found".to_string(),
        SunshiftError::ConfigError(_) => "Failed to load or save configuration.\n\n\
             Your settings may not persist.\n\
             Check that you have write permissions to:\n\
             ~/.config/sunshift"
            .to_string(),
        SunshiftError::IoError(e) => {
            format!(
                "A file system error occurred:\n\n{e}\n\n\
                 Please check file permissions and disk space."
            )
        }
        SunshiftError::JsonError(e) => {
            format!(
                "Configuration file is corrupted:\n\n{e}\n\n\
                 The application will use default settings."
            )
        }
        SunshiftError::GuiError(e) => {
            format!("A window system error occurred:\n\n{e}")
        }
    }
}
