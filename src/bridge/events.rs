//! Inbound event subscription
//!
//! The backend's tray surface emits `ApplyPreset` and `ToggleQuickControl`
//! signals. This module subscribes to them on a background thread and
//! forwards them into an mpsc channel for the application controller.
//!
//! The subscription is scoped: dropping the [`EventSubscription`] guard
//! requests teardown. The listener thread checks the flag after every
//! received signal and also exits when the forwarding channel closes, so
//! every teardown path releases the subscription.

use crate::bridge::TrayEvent;
use crate::bridge::dbus::TRAY_INTERFACE;
use crate::error::{Result, SunshiftError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};
use zbus::blocking::{Connection, MessageIterator};
use zbus::{MatchRule, message};

/// RAII guard for an active event subscription
///
/// Dropping the guard signals the listener thread to stop. The thread is
/// detached rather than joined: it may be parked inside a blocking signal
/// wait and will observe the flag on the next delivery or channel close.
pub struct EventSubscription {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl EventSubscription {
    fn new(stop: Arc<AtomicBool>, handle: JoinHandle<()>) -> Self {
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Whether the listener thread is still running
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        debug!("Tray event subscription released");
        // Detach; the thread exits on the next signal or channel close.
        drop(self.handle.take());
    }
}

/// Subscribe to tray signals on the session bus and forward them to `sender`
///
/// Returns the subscription guard, or an error when the bus is unreachable
/// or the match rule cannot be installed. Callers are expected to log the
/// error and continue without tray shortcuts.
pub fn spawn_dbus_event_listener(
    sender: mpsc::SyncSender<TrayEvent>,
) -> Result<EventSubscription> {
    let connection = Connection::session()?;
    let rule = MatchRule::builder()
        .msg_type(message::Type::Signal)
        .interface(TRAY_INTERFACE)
        .map_err(|e| SunshiftError::EventSubscriptionFailed(Box::new(e)))?
        .build();
    let messages = MessageIterator::for_match_rule(rule, &connection, None)
        .map_err(SunshiftError::DbusError)?;

    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);
    let handle = thread::spawn(move || {
        info!("Tray event listener started");
        listen(messages, &sender, &stop_flag);
        info!("Tray event listener stopped");
    });

    Ok(EventSubscription::new(stop, handle))
}

fn listen(
    messages: MessageIterator,
    sender: &mpsc::SyncSender<TrayEvent>,
    stop: &AtomicBool,
) {
    for message in messages {
        if stop.load(Ordering::SeqCst) {
            break;
        }
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                warn!("Tray event stream error: {e}");
                break;
            }
        };
        let Some(event) = decode_signal(&message) else {
            continue;
        };
        if sender.send(event).is_err() {
            debug!("Tray event channel closed; stopping listener");
            break;
        }
    }
}

fn decode_signal(message: &zbus::message::Message) -> Option<TrayEvent> {
    let header = message.header();
    let member = header.member()?;
    match member.as_str() {
        "ApplyPreset" => match message.body().deserialize::<String>() {
            Ok(preset_id) => Some(TrayEvent::ApplyPreset(preset_id)),
            Err(e) => {
                warn!("Malformed ApplyPreset signal: {e}");
                None
            }
        },
        "ToggleQuickControl" => Some(TrayEvent::ToggleQuickControl),
        other => {
            debug!("Ignoring unknown tray signal: {other}");
            None
        }
    }
}
