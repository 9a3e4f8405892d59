//! Application controller implementation
//!
//! This module implements the main application logic controller that
//! coordinates between the gamma bridge, the state stores, and the GUI.

use crate::bridge::{GammaBridge, GammaState, TrayEvent};
use crate::config::{AppConfig, ConfigManager};
use crate::store::{ActiveTab, GammaStore, NotificationKind, Preset, Theme, ThemeMode, UiStore};
use parking_lot::Mutex;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

/// State snapshot for GUI updates
///
/// A complete, self-contained picture of what the GUI should render. The
/// controller publishes a fresh snapshot after every action and poll;
/// intermediate snapshots may be dropped when the GUI lags, each one is
/// whole on its own.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Cached gamma state (optimistic during in-flight changes)
    pub gamma: GammaState,
    /// Whether a backend fetch is in flight
    pub loading: bool,
    /// Display string of the most recent failure, if any
    pub error: Option<String>,
    /// Whether the last bridge call succeeded
    pub connected: bool,
    /// The preset set, built-ins first
    pub presets: Vec<Preset>,
    /// Id of the currently active preset, if any
    pub active_preset: Option<String>,
    /// Inert auto-mode flag
    pub auto_mode: bool,
    /// Currently selected tab
    pub active_tab: ActiveTab,
    /// Resolved theme
    pub theme: Theme,
    /// Selected theme mode
    pub theme_mode: ThemeMode,
    /// Whether the quick control surface is shown
    pub quick_control_visible: bool,
    /// Live notifications, newest first
    pub notifications: Vec<crate::store::Notification>,
}

/// Application logic controller
pub struct AppController {
    /// Application configuration (public for GUI access)
    pub config: AppConfig,
    /// Gamma state store
    gamma: GammaStore,
    /// UI state store
    ui: UiStore,
    /// Bridge to the gamma backend
    bridge: Arc<dyn GammaBridge>,
    /// Tray event receiver (taken when the event loop starts)
    tray_receiver: Option<mpsc::Receiver<TrayEvent>>,
    /// State sender to GUI
    gui_state_sender: mpsc::SyncSender<ViewState>,
    /// Temperature last pushed to the tray icon
    last_tray_temperature: Option<u16>,
    /// Connection status after the previous bridge-touching action
    was_connected: bool,
}

impl AppController {
    /// Create a new application controller
    ///
    /// Applies the persisted theme mode and auto-mode flag from `config`.
    /// No backend call happens here; the event loop fires the first poll.
    pub fn new(
        config: AppConfig,
        bridge: Arc<dyn GammaBridge>,
        tray_receiver: mpsc::Receiver<TrayEvent>,
        gui_state_sender: mpsc::SyncSender<ViewState>,
    ) -> Self {
        let gamma_store = GammaStore::new(Arc::clone(&bridge));
        let mut ui_store = UiStore::new();
        ui_store.set_theme_mode(config.preferences.theme_mode);

        let mut controller = Self {
            config,
            gamma: gamma_store,
            ui: ui_store,
            bridge,
            tray_receiver: Some(tray_receiver),
            gui_state_sender,
            last_tray_temperature: None,
            was_connected: false,
        };
        controller
            .gamma
            .set_auto_mode(controller.config.preferences.auto_mode);
        controller
    }

    /// Poll interval from the loaded preferences
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.config.preferences.poll_interval_secs.max(1))
    }

    /// Read access to the gamma store for tests and the GUI layer
    pub fn gamma(&self) -> &GammaStore {
        &self.gamma
    }

    /// Read access to the UI store for tests and the GUI layer
    pub fn ui(&self) -> &UiStore {
        &self.ui
    }

    /// Take ownership of the tray event receiver if it hasn't been taken yet.
    /// Returns None if already taken. Caller should treat None as a no-op.
    fn take_tray_receiver(&mut self) -> Option<mpsc::Receiver<TrayEvent>> {
        self.tray_receiver.take()
    }

    /// Poll the backend and reconcile the cached gamma state
    pub fn refresh(&mut self) {
        self.gamma.fetch_state();
        self.after_bridge_action();
    }

    /// Set the color temperature from a slider move
    pub fn set_temperature(&mut self, temperature: u16) {
        self.gamma.set_temperature(temperature);
        self.after_bridge_action();
    }

    /// Set the brightness from a slider move
    pub fn set_brightness(&mut self, brightness: f64) {
        self.gamma.set_brightness(brightness);
        self.after_bridge_action();
    }

    /// Replace the whole gamma state in one action
    pub fn set_gamma_state(&mut self, state: GammaState) {
        self.gamma.set_gamma_state(state);
        self.after_bridge_action();
    }

    /// Apply a preset by id
    pub fn apply_preset(&mut self, preset_id: &str) {
        self.gamma.apply_preset(preset_id);
        self.after_bridge_action();
    }

    /// Save the current gamma state as a new user preset
    pub fn save_preset(&mut self, name: &str) {
        use tracing::info;

        let state = self.gamma.state();
        let id = self
            .gamma
            .add_preset(name, state.temperature, state.brightness);
        info!("Saved preset {name:?} as {id}");
        self.ui.add_notification(
            NotificationKind::Success,
            "Preset saved",
            &format!("{name} is now available in the preset list"),
        );
        self.send_state_update();
    }

    /// Remove a preset by id
    pub fn remove_preset(&mut self, preset_id: &str) {
        self.gamma.remove_preset(preset_id);
        self.send_state_update();
    }

    /// Select a tab in the main window
    pub fn select_tab(&mut self, tab: ActiveTab) {
        self.ui.set_active_tab(tab);
        self.send_state_update();
    }

    /// Set the theme mode and persist it
    pub fn set_theme_mode(&mut self, mode: ThemeMode) {
        self.ui.set_theme_mode(mode);
        self.config.preferences.theme_mode = mode;
        self.save_config();
        self.send_state_update();
    }

    /// Flip the inert auto-mode flag and persist it
    pub fn set_auto_mode(&mut self, enabled: bool) {
        self.gamma.set_auto_mode(enabled);
        self.config.preferences.auto_mode = enabled;
        self.save_config();
        self.send_state_update();
    }

    /// Show or hide the quick control surface
    pub fn set_quick_control_visible(&mut self, visible: bool) {
        self.ui.set_quick_control_visible(visible);
        self.send_state_update();
    }

    /// Remember and persist the window position
    pub fn set_window_position(&mut self, x: i32, y: i32) {
        self.ui.set_window_position(x, y);
        self.config.window_state.x = x;
        self.config.window_state.y = y;
        self.save_config();
    }

    /// Dismiss a notification by id
    pub fn dismiss_notification(&mut self, id: &str) {
        self.ui.remove_notification(id);
        self.send_state_update();
    }

    /// Clear the gamma store's error field
    pub fn clear_error(&mut self) {
        self.gamma.clear_error();
        self.send_state_update();
    }

    /// Handle a tray event from the backend's tray surface
    pub fn handle_tray_event(&mut self, event: TrayEvent) {
        use tracing::info;

        match event {
            TrayEvent::ApplyPreset(preset_id) => {
                info!("Tray requested preset: {preset_id}");
                let name = self
                    .gamma
                    .presets()
                    .iter()
                    .find(|p| p.id == preset_id)
                    .map(|p| p.name.clone());
                self.gamma.apply_preset(&preset_id);
                match (name, self.gamma.error()) {
                    (Some(name), None) => {
                        self.ui.add_notification(
                            NotificationKind::Success,
                            "Preset applied",
                            &format!("Switched to {name}"),
                        );
                    }
                    (_, error) => {
                        let message = error.unwrap_or("Preset not found").to_string();
                        self.ui.add_notification(
                            NotificationKind::Error,
                            "Preset failed",
                            &message,
                        );
                    }
                }
                self.after_bridge_action();
            }
            TrayEvent::ToggleQuickControl => {
                // The tray shortcut always surfaces the panel; the panel's
                // own close affordances are the only way to hide it.
                info!("Tray requested quick control");
                self.ui.set_quick_control_visible(true);
                self.send_state_update();
            }
        }
    }

    /// Drop expired notifications; sends a snapshot only when something changed
    pub fn prune_notifications(&mut self, now: Instant) {
        let before = self.ui.notifications().len();
        self.ui.prune_expired(now);
        if self.ui.notifications().len() != before {
            self.send_state_update();
        }
    }

    /// Send initial state to GUI.
    /// Call once after initialization to populate the window before the
    /// first poll lands.
    pub fn send_initial_state(&mut self) {
        use tracing::info;

        info!("Sending initial state update to populate GUI");
        self.send_state_update();
    }

    /// Bookkeeping shared by every action that touched the bridge:
    /// disconnect notification, tray icon sync, GUI snapshot.
    fn after_bridge_action(&mut self) {
        use tracing::{info, warn};

        let connected = self.gamma.connected();
        if self.was_connected && !connected {
            warn!("Backend connection lost");
            self.ui.add_notification(
                NotificationKind::Warning,
                "Backend unreachable",
                "Lost contact with the gamma backend; retrying on the next poll",
            );
        } else if !self.was_connected && connected {
            info!("Backend connection established");
        }
        self.was_connected = connected;

        if connected {
            self.sync_tray_icon();
        }
        self.send_state_update();
    }

    /// Push the cached temperature to the tray icon when it changed.
    /// Best-effort: failures are logged and retried on the next change.
    fn sync_tray_icon(&mut self) {
        use tracing::{debug, warn};

        let temperature = self.gamma.state().temperature;
        if self.last_tray_temperature == Some(temperature) {
            return;
        }
        match self.bridge.update_tray_icon(temperature) {
            Ok(()) => {
                debug!("Tray icon updated for {temperature}K");
                self.last_tray_temperature = Some(temperature);
            }
            Err(e) => {
                warn!("Failed to update tray icon: {e}");
            }
        }
    }

    /// Persist the configuration.
    /// Logs warning and continues with in-memory config if save fails.
    fn save_config(&self) {
        use tracing::warn;

        if let Err(e) = ConfigManager::save(&self.config) {
            warn!(
                "Failed to save configuration to disk: {}. Continuing with in-memory config. \
                 Changes will be lost on application restart.",
                e
            );
        }
    }

    /// Send current state snapshot to GUI
    fn send_state_update(&self) {
        use tracing::{debug, warn};

        let state = ViewState {
            gamma: self.gamma.state(),
            loading: self.gamma.loading(),
            error: self.gamma.error().map(str::to_string),
            connected: self.gamma.connected(),
            presets: self.gamma.presets().to_vec(),
            active_preset: self.gamma.active_preset().map(str::to_string),
            auto_mode: self.gamma.auto_mode(),
            active_tab: self.ui.active_tab(),
            theme: self.ui.current_theme(),
            theme_mode: self.ui.theme_mode(),
            quick_control_visible: self.ui.quick_control_visible(),
            notifications: self.ui.notifications().to_vec(),
        };

        // try_send: a full channel means the GUI is busy; dropping this
        // snapshot is safe since the next action or poll sends a fresh one.
        match self.gui_state_sender.try_send(state) {
            Ok(()) => debug!("State update sent to GUI"),
            Err(mpsc::TrySendError::Full(_)) => debug!("GUI busy; snapshot dropped"),
            Err(mpsc::TrySendError::Disconnected(_)) => {
                warn!("GUI state channel disconnected");
            }
        }
    }

    /// Spawn the event loop in a background thread. Only locks the controller
    /// while handling individual events, preventing GUI callbacks from being
    /// blocked.
    ///
    /// The loop services tray events with a 100ms wakeup, fires a backend
    /// poll at the configured interval (first poll immediately), and prunes
    /// expired notifications on every wakeup.
    pub fn spawn_event_loop(controller: Arc<Mutex<AppController>>) -> std::thread::JoinHandle<()> {
        let (tray_receiver, poll_interval) = {
            let mut controller_guard = controller.lock();
            let receiver = controller_guard
                .take_tray_receiver()
                .expect("AppController tray receiver already taken");
            (receiver, controller_guard.poll_interval())
        };

        std::thread::spawn(move || {
            use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
            use tracing::{info, warn};

            info!(
                "Entering main event loop (tray events + {}s poll)",
                poll_interval.as_secs()
            );
            let mut last_poll: Option<Instant> = None;
            loop {
                // First poll fires immediately, then at the configured interval
                let poll_due = last_poll.is_none_or(|at| at.elapsed() >= poll_interval);
                if poll_due {
                    let mut controller_guard = controller.lock();
                    controller_guard.refresh();
                    drop(controller_guard);
                    last_poll = Some(Instant::now());
                }

                // Wait for tray events with timeout to keep the poll ticking
                match tray_receiver.recv_timeout(Duration::from_millis(100)) {
                    Ok(event) => {
                        let mut controller_guard = controller.lock();
                        controller_guard.handle_tray_event(event);
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        // Timeout is normal - just continue to the next tick
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        warn!("Tray event channel disconnected. Exiting event loop.");
                        break;
                    }
                }

                // Drain any queued tray events (non-blocking)
                loop {
                    match tray_receiver.try_recv() {
                        Ok(event) => {
                            let mut controller_guard = controller.lock();
                            controller_guard.handle_tray_event(event);
                        }
                        Err(TryRecvError::Empty) => break,
                        Err(TryRecvError::Disconnected) => break,
                    }
                }

                let mut controller_guard = controller.lock();
                controller_guard.prune_notifications(Instant::now());
            }
            info!("Main event loop exited");
        })
    }
}
