//! Bridge to the external gamma backend
//!
//! Every interaction with the display stack goes through this module. The
//! applet itself never computes gamma curves or touches the display server;
//! it issues commands over a narrow bridge and consumes events coming back.
//!
//! # Overview
//!
//! - **Commands**: fetch the current gamma state, set temperature, set
//!   brightness, set both at once, and a best-effort tray icon update.
//! - **Events**: `apply_preset` (carrying a preset id) and
//!   `toggle_quick_control`, emitted by the backend's tray surface.
//!
//! # Architecture
//!
//! - [`GammaBridge`]: the command seam. Production code uses
//!   [`GammaRelayBridge`] (D-Bus properties on `rs.wl-gammarelay`); tests
//!   substitute a scriptable mock.
//! - [`EventSubscription`]: scoped subscription to inbound events, released
//!   on drop.
//!
//! Each command is a single round-trip. The bridge performs no retries and
//! enforces no timeout; a hung backend hangs the calling action.

pub mod dbus;
pub mod events;

use serde::{Deserialize, Serialize};

pub use dbus::GammaRelayBridge;
pub use events::{EventSubscription, spawn_dbus_event_listener};

/// Minimum color temperature the UI will request, in Kelvin
pub const TEMPERATURE_MIN: u16 = 2000;
/// Maximum color temperature the UI will request, in Kelvin
pub const TEMPERATURE_MAX: u16 = 6500;
/// Minimum brightness fraction the UI will request
pub const BRIGHTNESS_MIN: f64 = 0.1;
/// Maximum brightness fraction the UI will request
pub const BRIGHTNESS_MAX: f64 = 1.0;

/// The pair controlling display appearance: color temperature and brightness
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GammaState {
    /// Color temperature in Kelvin
    pub temperature: u16,
    /// Brightness as a fraction of full output
    pub brightness: f64,
}

impl Default for GammaState {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE_MAX,
            brightness: BRIGHTNESS_MAX,
        }
    }
}

/// Command surface of the external gamma backend
///
/// Implementations perform one round-trip per call and surface any failure
/// as an error; callers decide how to recover. `update_tray_icon` is
/// best-effort: failures are logged by the caller, never shown to the user.
pub trait GammaBridge: Send + Sync {
    /// Fetch the backend's current gamma state
    fn fetch_state(&self) -> crate::error::Result<GammaState>;

    /// Set the color temperature, leaving brightness untouched
    fn set_temperature(&self, temperature: u16) -> crate::error::Result<()>;

    /// Set the brightness, leaving temperature untouched
    fn set_brightness(&self, brightness: f64) -> crate::error::Result<()>;

    /// Replace the whole gamma state in one command
    fn set_gamma_state(&self, state: &GammaState) -> crate::error::Result<()>;

    /// Ask the backend to redraw its tray icon for the given temperature
    fn update_tray_icon(&self, temperature: u16) -> crate::error::Result<()>;
}

/// Inbound events emitted by the backend's tray surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayEvent {
    /// The user picked a preset from the tray menu
    ApplyPreset(String),
    /// The user clicked the tray icon to open the quick control surface
    ToggleQuickControl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gamma_state() {
        let state = GammaState::default();
        assert_eq!(state.temperature, 6500);
        assert!((state.brightness - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gamma_state_serialization() {
        let state = GammaState {
            temperature: 3000,
            brightness: 0.6,
        };
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: GammaState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
