//! Integration tests for Sunshift
//!
//! Drives the application controller end to end against a scriptable
//! in-memory bridge: polling, optimistic updates, presets, tray events,
//! notifications, and configuration persistence.

use parking_lot::Mutex;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};
use sunshift::{
    bridge::{GammaBridge, GammaState, TrayEvent},
    config::AppConfig,
    controller::{AppController, ViewState},
    error::{StringError, SunshiftError, get_user_friendly_error},
    store::NotificationKind,
};

/// Scriptable bridge recording every call
struct RecordingBridge {
    backend_state: Mutex<GammaState>,
    calls: Mutex<Vec<String>>,
    failing: Mutex<bool>,
}

impl RecordingBridge {
    fn new() -> Self {
        Self {
            backend_state: Mutex::new(GammaState::default()),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(false),
        }
    }

    fn set_backend_state(&self, state: GammaState) {
        *self.backend_state.lock() = state;
    }

    fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: &str) -> sunshift::Result<()> {
        self.calls.lock().push(call.to_string());
        if *self.failing.lock() {
            Err(SunshiftError::BridgeCallFailed(StringError::new(
                "relay unreachable",
            )))
        } else {
            Ok(())
        }
    }
}

impl GammaBridge for RecordingBridge {
    fn fetch_state(&self) -> sunshift::Result<GammaState> {
        self.record("fetch_state")?;
        Ok(*self.backend_state.lock())
    }

    fn set_temperature(&self, temperature: u16) -> sunshift::Result<()> {
        self.record(&format!("set_temperature({temperature})"))?;
        self.backend_state.lock().temperature = temperature;
        Ok(())
    }

    fn set_brightness(&self, brightness: f64) -> sunshift::Result<()> {
        self.record(&format!("set_brightness({brightness})"))?;
        self.backend_state.lock().brightness = brightness;
        Ok(())
    }

    fn set_gamma_state(&self, state: &GammaState) -> sunshift::Result<()> {
        self.record(&format!(
            "set_gamma_state({}, {})",
            state.temperature, state.brightness
        ))?;
        *self.backend_state.lock() = *state;
        Ok(())
    }

    fn update_tray_icon(&self, temperature: u16) -> sunshift::Result<()> {
        self.record(&format!("update_tray_icon({temperature})"))
    }
}

fn setup(
    bridge: &Arc<RecordingBridge>,
) -> (
    AppController,
    mpsc::Receiver<ViewState>,
    mpsc::SyncSender<TrayEvent>,
) {
    let (tray_tx, tray_rx) = mpsc::sync_channel(16);
    let (state_tx, state_rx) = mpsc::sync_channel(64);
    let dyn_bridge: Arc<dyn GammaBridge> = Arc::clone(bridge) as Arc<dyn GammaBridge>;
    let controller = AppController::new(AppConfig::default(), dyn_bridge, tray_rx, state_tx);
    (controller, state_rx, tray_tx)
}

fn latest_state(receiver: &mpsc::Receiver<ViewState>) -> ViewState {
    let mut latest = None;
    while let Ok(state) = receiver.try_recv() {
        latest = Some(state);
    }
    latest.expect("no state snapshot was sent")
}

/// Polling replaces the cached state with whatever the backend holds,
/// and a failed poll records an error without touching the cache.
#[test]
fn test_poll_reconciles_and_failure_preserves_cache() {
    let bridge = Arc::new(RecordingBridge::new());
    bridge.set_backend_state(GammaState {
        temperature: 4300,
        brightness: 0.85,
    });
    let (mut controller, state_rx, _tray_tx) = setup(&bridge);

    controller.refresh();
    let state = latest_state(&state_rx);
    assert_eq!(state.gamma.temperature, 4300);
    assert!(state.connected);
    assert!(state.error.is_none());

    bridge.set_failing(true);
    controller.refresh();
    let state = latest_state(&state_rx);
    assert_eq!(state.gamma.temperature, 4300, "failed poll keeps the cache");
    assert!(!state.connected);
    assert!(state.error.is_some());
}

/// A slider move is applied optimistically and forwarded to the backend.
#[test]
fn test_manual_change_round_trip() {
    let bridge = Arc::new(RecordingBridge::new());
    let (mut controller, state_rx, _tray_tx) = setup(&bridge);

    controller.set_temperature(3200);
    controller.set_brightness(0.4);

    let state = latest_state(&state_rx);
    assert_eq!(state.gamma.temperature, 3200);
    assert!((state.gamma.brightness - 0.4).abs() < f64::EPSILON);
    let calls = bridge.calls();
    assert!(calls.contains(&"set_temperature(3200)".to_string()));
    assert!(calls.contains(&"set_brightness(0.4)".to_string()));
}

/// A failed set keeps the optimistic value; the next successful poll
/// reconciles the cache with the backend.
#[test]
fn test_failed_set_is_reconciled_by_next_poll() {
    let bridge = Arc::new(RecordingBridge::new());
    bridge.set_backend_state(GammaState {
        temperature: 5000,
        brightness: 0.9,
    });
    let (mut controller, state_rx, _tray_tx) = setup(&bridge);
    controller.refresh();

    bridge.set_failing(true);
    controller.set_temperature(2500);
    let state = latest_state(&state_rx);
    assert_eq!(state.gamma.temperature, 2500, "optimistic value stays");
    assert!(!state.connected);

    bridge.set_failing(false);
    controller.refresh();
    let state = latest_state(&state_rx);
    assert_eq!(state.gamma.temperature, 5000, "poll reconciles the cache");
    assert!(state.connected);
}

/// Applying a built-in preset pushes both values in one command and marks
/// the preset active; a later manual change exits it.
#[test]
fn test_preset_lifecycle() {
    let bridge = Arc::new(RecordingBridge::new());
    let (mut controller, state_rx, _tray_tx) = setup(&bridge);

    controller.apply_preset("night");
    let state = latest_state(&state_rx);
    assert_eq!(state.gamma.temperature, 3000);
    assert!((state.gamma.brightness - 0.6).abs() < f64::EPSILON);
    assert_eq!(state.active_preset.as_deref(), Some("night"));
    assert!(
        bridge
            .calls()
            .contains(&"set_gamma_state(3000, 0.6)".to_string())
    );

    controller.set_temperature(3100);
    let state = latest_state(&state_rx);
    assert_eq!(state.active_preset, None, "manual change exits the preset");
}

/// An unknown preset id never reaches the backend and surfaces a local error.
#[test]
fn test_unknown_preset_is_local() {
    let bridge = Arc::new(RecordingBridge::new());
    let (mut controller, state_rx, _tray_tx) = setup(&bridge);

    controller.apply_preset("twilight");

    let state = latest_state(&state_rx);
    assert_eq!(state.error.as_deref(), Some("Preset not found"));
    assert!(bridge.calls().is_empty());
}

/// User presets can be saved from the current state, applied, and removed.
#[test]
fn test_user_preset_save_apply_remove() {
    let bridge = Arc::new(RecordingBridge::new());
    let (mut controller, state_rx, _tray_tx) = setup(&bridge);
    controller.set_temperature(3900);
    controller.set_brightness(0.55);

    controller.save_preset("Cellar");
    let state = latest_state(&state_rx);
    let preset = state
        .presets
        .iter()
        .find(|p| p.name == "Cellar")
        .expect("saved preset missing")
        .clone();
    assert_eq!(preset.temperature, 3900);
    assert!(!preset.builtin);

    controller.apply_preset(&preset.id);
    let state = latest_state(&state_rx);
    assert_eq!(state.active_preset.as_deref(), Some(preset.id.as_str()));

    controller.remove_preset(&preset.id);
    let state = latest_state(&state_rx);
    assert!(state.presets.iter().all(|p| p.id != preset.id));
    assert_eq!(state.active_preset, None);
}

/// Tray events drive the same actions as the GUI, with notifications.
#[test]
fn test_tray_events() {
    let bridge = Arc::new(RecordingBridge::new());
    let (mut controller, state_rx, _tray_tx) = setup(&bridge);

    controller.handle_tray_event(TrayEvent::ApplyPreset("evening".to_string()));
    let state = latest_state(&state_rx);
    assert_eq!(state.active_preset.as_deref(), Some("evening"));
    assert_eq!(state.notifications.len(), 1);
    assert_eq!(state.notifications[0].kind, NotificationKind::Success);

    controller.handle_tray_event(TrayEvent::ToggleQuickControl);
    let state = latest_state(&state_rx);
    assert!(state.quick_control_visible);

    // The shortcut only ever reveals the panel
    controller.handle_tray_event(TrayEvent::ToggleQuickControl);
    let state = latest_state(&state_rx);
    assert!(state.quick_control_visible);
}

/// The notification queue holds at most ten entries, newest first, and
/// entries expire by severity.
#[test]
fn test_notification_cap_and_expiry() {
    let bridge = Arc::new(RecordingBridge::new());
    let (mut controller, state_rx, _tray_tx) = setup(&bridge);

    for _ in 0..12 {
        controller.handle_tray_event(TrayEvent::ApplyPreset("day".to_string()));
    }
    let state = latest_state(&state_rx);
    assert_eq!(state.notifications.len(), 10);

    // Success notifications expire after 5s
    controller.prune_notifications(Instant::now() + Duration::from_secs(6));
    let state = latest_state(&state_rx);
    assert!(state.notifications.is_empty());
}

/// The full event loop wires tray events and polling together.
#[test]
fn test_event_loop_end_to_end() {
    let bridge = Arc::new(RecordingBridge::new());
    bridge.set_backend_state(GammaState {
        temperature: 4800,
        brightness: 0.95,
    });
    let (controller, state_rx, tray_tx) = setup(&bridge);
    let controller = Arc::new(Mutex::new(controller));

    let handle = AppController::spawn_event_loop(Arc::clone(&controller));
    tray_tx
        .send(TrayEvent::ApplyPreset("reading".to_string()))
        .unwrap();
    drop(tray_tx);
    handle.join().unwrap();

    let state = latest_state(&state_rx);
    assert_eq!(state.active_preset.as_deref(), Some("reading"));
    assert!(bridge.calls().contains(&"fetch_state".to_string()));
}

/// User-facing error messages stay stable for the cases the UI special-cases.
#[test]
fn test_user_friendly_errors() {
    let missing = SunshiftError::PresetNotFound("x".to_string());
    assert_eq!(get_user_friendly_error(&missing), "Preset not found");

    let bridge_down = SunshiftError::BridgeCallFailed(StringError::new("boom"));
    assert!(get_user_friendly_error(&bridge_down).contains("wl-gammarelay-rs"));
}

/// Configuration survives a serialize/deserialize round trip with edits.
#[test]
fn test_config_persistence_integration() {
    let mut config = AppConfig::default();
    config.preferences.poll_interval_secs = 15;
    config.preferences.auto_mode = false;
    config.window_state.x = 32;

    let json = serde_json::to_string_pretty(&config).unwrap();
    let loaded: AppConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(loaded.preferences.poll_interval_secs, 15);
    assert!(!loaded.preferences.auto_mode);
    assert_eq!(loaded.window_state.x, 32);
}
