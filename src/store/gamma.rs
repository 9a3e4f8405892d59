//! Gamma state store
//!
//! Process-wide cache of the backend's gamma state plus the preset set.
//! Every action goes through the bridge and records its outcome locally:
//! a successful call marks the store connected, a failed call records a
//! display string and marks it disconnected. Errors never propagate out of
//! an action; the UI surfaces them from the `error` field.
//!
//! Update policy: values are applied to the cache optimistically, before the
//! bridge call, and are NOT rolled back on failure. The next poll reconciles
//! the cache with whatever the backend actually holds.

use crate::bridge::{GammaBridge, GammaState};
use crate::error::{SunshiftError, get_user_friendly_error};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

/// A named, fixed (temperature, brightness) pair the user can apply in one action
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    /// Unique id; built-ins use fixed names, user presets a timestamp-derived id
    pub id: String,
    /// Display name shown on the preset button
    pub name: String,
    /// Color temperature in Kelvin
    pub temperature: u16,
    /// Brightness fraction
    pub brightness: f64,
    /// Whether this is one of the seeded built-in presets
    pub builtin: bool,
}

impl Preset {
    fn builtin(id: &str, name: &str, temperature: u16, brightness: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            temperature,
            brightness,
            builtin: true,
        }
    }
}

/// State owner for everything gamma-related
pub struct GammaStore {
    bridge: Arc<dyn GammaBridge>,
    state: GammaState,
    loading: bool,
    error: Option<String>,
    connected: bool,
    presets: Vec<Preset>,
    active_preset: Option<String>,
    auto_mode: bool,
    last_manual_change: Option<DateTime<Utc>>,
}

impl GammaStore {
    /// Create a store seeded with the built-in presets
    pub fn new(bridge: Arc<dyn GammaBridge>) -> Self {
        Self {
            bridge,
            state: GammaState::default(),
            loading: false,
            error: None,
            connected: false,
            presets: vec![
                Preset::builtin("day", "Day", 6500, 1.0),
                Preset::builtin("evening", "Evening", 4500, 0.8),
                Preset::builtin("night", "Night", 3000, 0.6),
                Preset::builtin("reading", "Reading", 5000, 0.9),
                Preset::builtin("movie", "Movie", 3500, 0.7),
            ],
            active_preset: None,
            auto_mode: true,
            last_manual_change: None,
        }
    }

    /// Cached gamma state
    pub fn state(&self) -> GammaState {
        self.state
    }

    /// Whether a fetch is in flight
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Display string of the most recent failure, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True after any successful bridge call, false after any failure
    pub fn connected(&self) -> bool {
        self.connected
    }

    /// The preset set, built-ins first
    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Id of the currently active preset, if any
    pub fn active_preset(&self) -> Option<&str> {
        self.active_preset.as_deref()
    }

    /// Inert auto-mode flag; nothing consumes it until scheduling exists
    pub fn auto_mode(&self) -> bool {
        self.auto_mode
    }

    /// When the user last changed a value manually
    pub fn last_manual_change(&self) -> Option<DateTime<Utc>> {
        self.last_manual_change
    }

    /// Fetch the backend's state and replace the cache on success
    ///
    /// On failure the cache is left unchanged. Loading is cleared on every
    /// completion path.
    pub fn fetch_state(&mut self) {
        self.loading = true;
        self.error = None;
        match self.bridge.fetch_state() {
            Ok(state) => {
                debug!(
                    "Fetched gamma state: {}K / {:.0}%",
                    state.temperature,
                    state.brightness * 100.0
                );
                self.state = state;
                self.connected = true;
            }
            Err(e) => {
                warn!("Failed to fetch gamma state: {e}");
                self.connected = false;
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    /// Set the color temperature
    ///
    /// A manual edit implicitly exits any preset, even when the call fails.
    pub fn set_temperature(&mut self, temperature: u16) {
        self.begin_manual_change();
        self.state.temperature = temperature;
        let result = self.bridge.set_temperature(temperature);
        self.finish_call(result);
    }

    /// Set the brightness
    ///
    /// A manual edit implicitly exits any preset, even when the call fails.
    pub fn set_brightness(&mut self, brightness: f64) {
        self.begin_manual_change();
        self.state.brightness = brightness;
        let result = self.bridge.set_brightness(brightness);
        self.finish_call(result);
    }

    /// Replace the whole gamma state
    pub fn set_gamma_state(&mut self, state: GammaState) {
        self.begin_manual_change();
        self.state = state;
        let result = self.bridge.set_gamma_state(&state);
        self.finish_call(result);
    }

    /// Apply a preset by id
    ///
    /// An unknown id records "Preset not found" locally and never contacts
    /// the backend. On success the preset becomes active; on a failed call
    /// the previously active preset is left untouched.
    pub fn apply_preset(&mut self, preset_id: &str) {
        let Some(preset) = self.presets.iter().find(|p| p.id == preset_id) else {
            let error = SunshiftError::PresetNotFound(preset_id.to_string());
            warn!("{error}");
            self.error = Some(get_user_friendly_error(&error));
            return;
        };
        let new_state = GammaState {
            temperature: preset.temperature,
            brightness: preset.brightness,
        };

        self.error = None;
        self.last_manual_change = Some(Utc::now());
        self.state = new_state;
        match self.bridge.set_gamma_state(&new_state) {
            Ok(()) => {
                debug!("Applied preset: {preset_id}");
                self.connected = true;
                self.active_preset = Some(preset_id.to_string());
            }
            Err(e) => {
                warn!("Failed to apply preset {preset_id}: {e}");
                self.connected = false;
                self.error = Some(e.to_string());
            }
        }
    }

    /// Append a new user preset and return its generated id
    ///
    /// Purely local; presets are not persisted (backend concern).
    pub fn add_preset(&mut self, name: &str, temperature: u16, brightness: f64) -> String {
        let id = self.generate_preset_id();
        self.presets.push(Preset {
            id: id.clone(),
            name: name.to_string(),
            temperature,
            brightness,
            builtin: false,
        });
        id
    }

    /// Remove a preset by id, clearing the active preset if it matched
    pub fn remove_preset(&mut self, preset_id: &str) {
        self.presets.retain(|p| p.id != preset_id);
        if self.active_preset.as_deref() == Some(preset_id) {
            self.active_preset = None;
        }
    }

    /// Flip the inert auto-mode flag; no backend call
    pub fn set_auto_mode(&mut self, enabled: bool) {
        self.auto_mode = enabled;
    }

    /// Clear the error field
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn begin_manual_change(&mut self) {
        self.error = None;
        self.last_manual_change = Some(Utc::now());
        self.active_preset = None;
    }

    fn finish_call(&mut self, result: crate::error::Result<()>) {
        match result {
            Ok(()) => self.connected = true,
            Err(e) => {
                warn!("Bridge call failed: {e}");
                self.connected = false;
                self.error = Some(e.to_string());
            }
        }
    }

    fn generate_preset_id(&self) -> String {
        let base = Utc::now().timestamp_millis().to_string();
        if !self.presets.iter().any(|p| p.id == base) {
            return base;
        }
        // Rapid successive additions can land on the same millisecond.
        let mut suffix = 1u32;
        loop {
            let candidate = format!("{base}-{suffix}");
            if !self.presets.iter().any(|p| p.id == candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }
}
