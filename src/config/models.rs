//! Configuration data models
//!
//! This module defines the data structures used for application configuration.
//! Only applet preferences live here; presets and schedules are backend-owned.

use crate::store::ui::ThemeMode;
use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// User preferences
    pub preferences: UserPreferences,
    /// Window state for persistence
    pub window_state: WindowState,
}

/// User preferences and settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Gamma state poll interval in seconds
    pub poll_interval_secs: u64,
    /// Selected theme mode
    pub theme_mode: ThemeMode,
    /// Inert auto-mode toggle; consumed once scheduling exists
    pub auto_mode: bool,
}

/// Window state for position and size persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowState {
    /// X position
    pub x: i32,
    /// Y position
    pub y: i32,
    /// Window width
    pub width: u32,
    /// Window height
    pub height: u32,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
            theme_mode: ThemeMode::Auto,
            auto_mode: true,
        }
    }
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            x: 100,
            y: 100,
            width: 720,
            height: 560,
        }
    }
}
