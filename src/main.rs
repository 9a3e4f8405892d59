//! Sunshift - color temperature and brightness applet
//!
//! Front-end for the `wl-gammarelay-rs` gamma backend. All gamma math and
//! scheduling lives in the backend; this process renders state, forwards
//! user actions over D-Bus, and polls the backend to stay honest.

#![expect(
    missing_docs,
    reason = "Slint-generated code from include_modules! lacks doc comments"
)]
#![allow(clippy::unwrap_used)] // Slint-generated code from include_modules! uses .unwrap() extensively

// GUI module is only in the binary, not the library
mod gui;

use anyhow::{Context, Result};
use gui::GuiController;
use parking_lot::Mutex;
use std::sync::{Arc, mpsc};
use sunshift::{
    bridge::{GammaRelayBridge, TrayEvent, spawn_dbus_event_listener},
    config::ConfigManager,
    controller::{AppController, ViewState},
    error::{SunshiftError, get_user_friendly_error},
    utils,
};
use tracing::{error, info, warn};

// Include Slint-generated code
slint::include_modules!();

/// Main entry point for the application
///
/// Delegates to [`run`] and translates any startup or runtime failure into
/// a user-facing message before exiting.
fn main() -> Result<()> {
    if let Err(e) = run() {
        error!("Sunshift terminated with error: {e:#}");

        let message = if let Some(app_error) = e.downcast_ref::<SunshiftError>() {
            get_user_friendly_error(app_error)
        } else {
            format!("{e:#}")
        };
        eprintln!("Sunshift failed:\n\n{message}");
        return Err(e);
    }
    Ok(())
}

/// Application body
///
/// Performs initialization including logging, configuration load, bridge
/// setup, event subscription, and multi-threaded component startup.
fn run() -> Result<()> {
    utils::init_logging().context("Failed to initialize logging system")?;

    info!("Sunshift v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = ConfigManager::load().context("Failed to load application configuration")?;
    info!(
        "Configuration loaded (poll interval: {}s)",
        config.preferences.poll_interval_secs
    );

    let channel_capacity = 32;
    let (tray_event_tx, tray_event_rx) = mpsc::sync_channel::<TrayEvent>(channel_capacity);
    let (view_state_tx, view_state_rx) = mpsc::sync_channel::<ViewState>(channel_capacity);

    info!("Creating gamma bridge");
    let bridge = Arc::new(GammaRelayBridge::new());

    // Tray events are best-effort: without the subscription the applet still
    // works, only the tray shortcuts go dead for this session.
    let _event_subscription = match spawn_dbus_event_listener(tray_event_tx) {
        Ok(subscription) => {
            info!("Subscribed to tray events");
            Some(subscription)
        }
        Err(e) => {
            warn!("Failed to subscribe to tray events: {e}. Continuing without tray shortcuts.");
            None
        }
    };

    info!("Creating application controller");
    let app_controller = AppController::new(config, bridge, tray_event_rx, view_state_tx);
    let app_controller_handle = Arc::new(Mutex::new(app_controller));

    info!("Creating GUI controller");
    let gui_controller = GuiController::new(Arc::clone(&app_controller_handle), view_state_rx)
        .context("Failed to create GUI controller")?;

    info!("Starting application controller thread");
    let _controller_handle = AppController::spawn_event_loop(Arc::clone(&app_controller_handle));

    info!("Sending initial state to populate GUI");
    {
        let mut controller_guard = app_controller_handle.lock();
        controller_guard.send_initial_state();
    }

    info!("Starting GUI event loop");
    gui_controller
        .run()
        .context("GUI event loop terminated with error")?;

    info!("Sunshift shutting down");

    Ok(())
}
