//! Application logic controller module
//!
//! This module coordinates between the gamma bridge, the two state stores,
//! and the GUI, implementing the core application logic.
//!
//! # Overview
//!
//! The application controller is the central coordinator that:
//! - **Receives tray events** from the D-Bus event listener
//! - **Drives the gamma store** for every user action
//! - **Polls the backend** to reconcile optimistic state
//! - **Sends state snapshots** to the GUI for display
//! - **Persists preferences** when they change
//!
//! # Architecture
//!
//! - `AppController`: Main controller owning both stores
//! - `ViewState`: State snapshot sent to GUI for display updates
//! - **Event-driven design**: Reacts to tray events from the listener thread
//! - **Thread-safe**: Shared as Arc<Mutex<>> between GUI callbacks and the
//!   event loop thread
//!
//! # Event Flow
//!
//! ```text
//! EventListener → TrayEvent → AppController → GammaBridge
//!                                   ↓
//!                              ViewState → GUI
//! ```
//!
//! # Polling
//!
//! The event loop wakes every 100ms to service tray events and fires a
//! backend poll at the configured interval (first poll immediately). The
//! poll replaces the cached gamma state with whatever the backend holds,
//! which is also how optimistic values left behind by failed calls get
//! reconciled.

pub mod app_controller;

pub use app_controller::{AppController, ViewState};
