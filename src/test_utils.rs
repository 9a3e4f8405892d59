//! Shared test utilities for Sunshift unit tests.
//!
//! This module provides common test infrastructure used across multiple test
//! modules. It is only compiled during testing (`#[cfg(test)]`).

use crate::bridge::{GammaBridge, GammaState};
use crate::error::{StringError, SunshiftError};
use parking_lot::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize tests that modify the `XDG_CONFIG_HOME`
/// environment variable. This prevents race conditions when multiple tests
/// run in parallel and try to set different config roots.
static CONFIG_HOME_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Helper function to create a temporary test directory using tempfile.
/// Returns a `TempDir` that automatically cleans up when dropped.
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// RAII guard that sets the `XDG_CONFIG_HOME` environment variable for a test
/// scope and restores the original value when dropped.
///
/// # Safety Considerations
///
/// This guard uses `std::env::set_var` and `std::env::remove_var`, which are
/// marked unsafe because they can cause data races when other threads are
/// reading environment variables concurrently.
///
/// **Safety Invariants:**
/// 1. Each test gets its own unique `TempDir`, so parallel tests write to different paths
/// 2. The guard is RAII-based and restores the original value on drop, preventing
///    environment pollution between tests
/// 3. The `CONFIG_HOME_LOCK` mutex ensures tests modify the variable serially
/// 4. Each test runs in its own thread with isolated stack frame
pub struct ConfigHomeGuard {
    original: Option<String>,
    // Lock guard must be held for the lifetime of this struct to ensure
    // exclusive access to XDG_CONFIG_HOME across parallel tests
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[expect(
    unsafe_code,
    reason = "Test-only code that modifies environment variables with documented safety invariants. Safe in parallel test execution."
)]
impl ConfigHomeGuard {
    /// Create a new guard that points `XDG_CONFIG_HOME` at the given temp directory.
    pub fn new(temp_dir: &TempDir) -> Self {
        // Acquire lock to serialize modifications across parallel tests.
        // A panicking test must not poison the lock for the rest of the suite.
        let lock = CONFIG_HOME_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let original = std::env::var("XDG_CONFIG_HOME").ok();
        // SAFETY: Each test gets its own TempDir; the guard restores the
        // original value on drop and the lock serializes all writers.
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }
        Self {
            original,
            _lock: lock,
        }
    }
}

#[expect(
    unsafe_code,
    reason = "Test-only code that restores environment variables with documented safety invariants. Safe in parallel test execution."
)]
impl Drop for ConfigHomeGuard {
    fn drop(&mut self) {
        // SAFETY: Drop runs in the thread that created the guard while the
        // serialization lock is still held.
        if let Some(ref original) = self.original {
            unsafe {
                std::env::set_var("XDG_CONFIG_HOME", original);
            }
        } else {
            unsafe {
                std::env::remove_var("XDG_CONFIG_HOME");
            }
        }
    }
}

/// One recorded bridge invocation
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeCall {
    /// `fetch_state` was called
    FetchState,
    /// `set_temperature` with the given Kelvin value
    SetTemperature(u16),
    /// `set_brightness` with the given fraction
    SetBrightness(f64),
    /// `set_gamma_state` with the given state
    SetGammaState(GammaState),
    /// `update_tray_icon` with the given Kelvin value
    UpdateTrayIcon(u16),
}

/// Scriptable in-memory bridge for tests
///
/// Records every call, serves a configurable backend state, and can be
/// switched into a failing mode to exercise error paths.
pub struct MockBridge {
    calls: Mutex<Vec<BridgeCall>>,
    backend_state: Mutex<GammaState>,
    failure: Mutex<Option<String>>,
}

impl Default for MockBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBridge {
    /// Create a bridge that always succeeds and serves the default state
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            backend_state: Mutex::new(GammaState::default()),
            failure: Mutex::new(None),
        }
    }

    /// State returned by subsequent `fetch_state` calls
    pub fn set_backend_state(&self, state: GammaState) {
        *self.backend_state.lock() = state;
    }

    /// Make every subsequent call fail with the given message
    pub fn fail_all(&self, message: &str) {
        *self.failure.lock() = Some(message.to_string());
    }

    /// Restore the always-succeeding mode
    pub fn succeed(&self) {
        *self.failure.lock() = None;
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<BridgeCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: BridgeCall) -> crate::error::Result<()> {
        self.calls.lock().push(call);
        match self.failure.lock().as_ref() {
            Some(message) => Err(SunshiftError::BridgeCallFailed(StringError::new(
                message.clone(),
            ))),
            None => Ok(()),
        }
    }
}

impl GammaBridge for MockBridge {
    fn fetch_state(&self) -> crate::error::Result<GammaState> {
        self.record(BridgeCall::FetchState)?;
        Ok(*self.backend_state.lock())
    }

    fn set_temperature(&self, temperature: u16) -> crate::error::Result<()> {
        self.record(BridgeCall::SetTemperature(temperature))?;
        self.backend_state.lock().temperature = temperature;
        Ok(())
    }

    fn set_brightness(&self, brightness: f64) -> crate::error::Result<()> {
        self.record(BridgeCall::SetBrightness(brightness))?;
        self.backend_state.lock().brightness = brightness;
        Ok(())
    }

    fn set_gamma_state(&self, state: &GammaState) -> crate::error::Result<()> {
        self.record(BridgeCall::SetGammaState(*state))?;
        *self.backend_state.lock() = *state;
        Ok(())
    }

    fn update_tray_icon(&self, temperature: u16) -> crate::error::Result<()> {
        self.record(BridgeCall::UpdateTrayIcon(temperature))
    }
}
