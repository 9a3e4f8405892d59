//! GUI controller implementation
//!
//! Bridges the Slint main window and the application controller: window
//! callbacks lock the controller and invoke actions; a forwarding thread
//! applies published [`ViewState`] snapshots back onto the window through
//! the Slint event loop.

use crate::{MainWindow, NotificationItem, PresetItem};
use parking_lot::Mutex;
use slint::{ComponentHandle, ModelRc, SharedString, Timer, TimerMode, VecModel};
use std::sync::{Arc, mpsc};
use std::time::Duration;
use sunshift::bridge::{BRIGHTNESS_MAX, BRIGHTNESS_MIN, TEMPERATURE_MAX, TEMPERATURE_MIN};
use sunshift::controller::{AppController, ViewState};
use sunshift::error::{Result, SunshiftError};
use sunshift::schedule;
use sunshift::store::{ActiveTab, NotificationKind, Theme, ThemeMode};
use tracing::{debug, warn};

/// Viewbox dimensions the schedule chart paths are scaled to
const CHART_WIDTH: f64 = 240.0;
const CHART_HEIGHT: f64 = 100.0;

/// Slint GUI controller
pub struct GuiController {
    window: MainWindow,
    app_controller: Arc<Mutex<AppController>>,
    // Kept alive for the lifetime of the window; drives the clock and ring
    _clock_timer: Timer,
}

impl GuiController {
    /// Create the main window, wire its callbacks to the application
    /// controller, and start the snapshot forwarding thread.
    pub fn new(
        app_controller: Arc<Mutex<AppController>>,
        state_receiver: mpsc::Receiver<ViewState>,
    ) -> Result<Self> {
        let window = MainWindow::new().map_err(|e| SunshiftError::GuiError(e.to_string()))?;

        // Restore the persisted window position
        {
            let controller = app_controller.lock();
            let ws = &controller.config.window_state;
            window
                .window()
                .set_position(slint::PhysicalPosition::new(ws.x, ws.y));
        }

        // Static preview data for the Schedule tab
        let points = schedule::preview_points();
        window.set_temperature_commands(
            schedule::temperature_path(&points, CHART_WIDTH, CHART_HEIGHT).into(),
        );
        window.set_brightness_commands(
            schedule::brightness_path(&points, CHART_WIDTH, CHART_HEIGHT).into(),
        );

        Self::wire_callbacks(&window, &app_controller);
        Self::spawn_state_forwarder(&window, state_receiver);
        let clock_timer = Self::start_clock(&window);

        Ok(Self {
            window,
            app_controller,
            _clock_timer: clock_timer,
        })
    }

    /// Run the Slint event loop until the window closes
    pub fn run(&self) -> Result<()> {
        self.window
            .run()
            .map_err(|e| SunshiftError::GuiError(e.to_string()))?;

        // Persist the final window position on the way out
        let position = self.window.window().position();
        self.app_controller
            .lock()
            .set_window_position(position.x, position.y);
        Ok(())
    }

    fn wire_callbacks(window: &MainWindow, app_controller: &Arc<Mutex<AppController>>) {
        {
            let controller = Arc::clone(app_controller);
            window.on_temperature_edited(move |value| {
                let clamped = value.clamp(i32::from(TEMPERATURE_MIN), i32::from(TEMPERATURE_MAX));
                #[expect(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    reason = "value is clamped to the u16 temperature range above"
                )]
                controller.lock().set_temperature(clamped as u16);
            });
        }
        {
            let controller = Arc::clone(app_controller);
            window.on_brightness_edited(move |value| {
                let clamped = f64::from(value).clamp(BRIGHTNESS_MIN, BRIGHTNESS_MAX);
                controller.lock().set_brightness(clamped);
            });
        }
        {
            let controller = Arc::clone(app_controller);
            window.on_preset_clicked(move |id| {
                controller.lock().apply_preset(id.as_str());
            });
        }
        {
            let controller = Arc::clone(app_controller);
            window.on_preset_removed(move |id| {
                controller.lock().remove_preset(id.as_str());
            });
        }
        {
            let controller = Arc::clone(app_controller);
            window.on_preset_saved(move |name| {
                controller.lock().save_preset(name.as_str());
            });
        }
        {
            let controller = Arc::clone(app_controller);
            window.on_tab_selected(move |index| {
                let tab = match index {
                    1 => ActiveTab::Schedule,
                    2 => ActiveTab::Settings,
                    _ => ActiveTab::Overview,
                };
                controller.lock().select_tab(tab);
            });
        }
        {
            let controller = Arc::clone(app_controller);
            window.on_theme_mode_selected(move |value| {
                let mode = match value.as_str() {
                    "Light" => ThemeMode::Light,
                    "Dark" => ThemeMode::Dark,
                    _ => ThemeMode::Auto,
                };
                controller.lock().set_theme_mode(mode);
            });
        }
        {
            let controller = Arc::clone(app_controller);
            window.on_auto_mode_toggled(move |enabled| {
                controller.lock().set_auto_mode(enabled);
            });
        }
        {
            let controller = Arc::clone(app_controller);
            window.on_notification_dismissed(move |id| {
                controller.lock().dismiss_notification(id.as_str());
            });
        }
        {
            let controller = Arc::clone(app_controller);
            window.on_error_dismissed(move || {
                controller.lock().clear_error();
            });
        }
        {
            let controller = Arc::clone(app_controller);
            window.on_quick_control_closed(move || {
                controller.lock().set_quick_control_visible(false);
            });
        }
    }

    /// Forward state snapshots from the controller thread onto the Slint
    /// event loop. The thread exits when the channel closes or the window
    /// is gone.
    fn spawn_state_forwarder(window: &MainWindow, state_receiver: mpsc::Receiver<ViewState>) {
        let weak = window.as_weak();
        std::thread::spawn(move || {
            while let Ok(state) = state_receiver.recv() {
                let result = weak.upgrade_in_event_loop(move |window| {
                    apply_view_state(&window, &state);
                });
                if result.is_err() {
                    debug!("Window gone; state forwarder exiting");
                    break;
                }
            }
            debug!("State forwarder thread exited");
        });
    }

    /// Drive the clock readout and day-progress ring once a second
    fn start_clock(window: &MainWindow) -> Timer {
        let weak = window.as_weak();
        let timer = Timer::default();
        let tick = move || {
            let Some(window) = weak.upgrade() else {
                return;
            };
            let now = chrono::Local::now();
            let time = now.time();
            window.set_clock_text(now.format("%H:%M").to_string().into());
            #[expect(
                clippy::cast_possible_truncation,
                reason = "day fraction is in 0.0..1.0, safely representable as f32"
            )]
            window.set_day_fraction(schedule::day_fraction(time) as f32);
            window.set_phase_label(schedule::phase_label(chrono::Timelike::hour(&time)).into());
        };
        tick();
        timer.start(TimerMode::Repeated, Duration::from_secs(1), tick);
        timer
    }
}

/// Apply one snapshot onto the window
fn apply_view_state(window: &MainWindow, state: &ViewState) {
    window.set_temperature(i32::from(state.gamma.temperature));
    #[expect(
        clippy::cast_possible_truncation,
        reason = "brightness is in 0.1..1.0, safely representable as f32"
    )]
    window.set_brightness(state.gamma.brightness as f32);
    window.set_loading(state.loading);
    window.set_connected(state.connected);
    window.set_error_text(state.error.clone().unwrap_or_default().into());
    window.set_auto_mode(state.auto_mode);
    window.set_quick_control_visible(state.quick_control_visible);

    window.set_active_tab(match state.active_tab {
        ActiveTab::Overview => 0,
        ActiveTab::Schedule => 1,
        ActiveTab::Settings => 2,
    });
    window.set_dark_theme(state.theme == Theme::Dark);
    window.set_theme_mode(
        match state.theme_mode {
            ThemeMode::Auto => "auto",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
        .into(),
    );

    let presets: Vec<PresetItem> = state
        .presets
        .iter()
        .map(|preset| PresetItem {
            id: preset.id.as_str().into(),
            name: preset.name.as_str().into(),
            temperature: i32::from(preset.temperature),
            #[expect(
                clippy::cast_possible_truncation,
                reason = "preset brightness is in 0.1..1.0, safely representable as f32"
            )]
            brightness: preset.brightness as f32,
            builtin: preset.builtin,
            active: state.active_preset.as_deref() == Some(preset.id.as_str()),
        })
        .collect();
    window.set_presets(ModelRc::new(VecModel::from(presets)));

    let notifications: Vec<NotificationItem> = state
        .notifications
        .iter()
        .map(|notification| NotificationItem {
            id: notification.id.as_str().into(),
            kind: SharedString::from(match notification.kind {
                NotificationKind::Info => "info",
                NotificationKind::Success => "success",
                NotificationKind::Warning => "warning",
                NotificationKind::Error => "error",
            }),
            title: notification.title.as_str().into(),
            message: notification.message.as_str().into(),
        })
        .collect();
    window.set_notifications(ModelRc::new(VecModel::from(notifications)));

    if !state.connected {
        warn!("Rendering disconnected state");
    }
}
