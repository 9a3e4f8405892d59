//! Sunshift - color temperature and brightness applet for Wayland
//!
//! Front-end for the `wl-gammarelay-rs` gamma backend. The applet never
//! touches the display stack itself; every change goes through a narrow
//! D-Bus bridge and the backend's state is polled back to keep the UI
//! honest. Uses a multi-threaded event-driven architecture with a D-Bus
//! event listener forwarding tray events, `AppController` coordinating the
//! state stores, and a Slint GUI rendering published snapshots.
//!
//! # Requirements
//!
//! - A Wayland session with `wl-gammarelay-rs` running on the session bus

// Module declarations
pub mod bridge;
pub mod config;
pub mod controller;
pub mod error;
pub mod schedule;
pub mod store;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{Result, SunshiftError};
