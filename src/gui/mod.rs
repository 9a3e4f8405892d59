//! GUI module
//!
//! Provides the Slint-based graphical user interface: main window, quick
//! control overlay, and state synchronization with the application
//! controller. The tray surface itself is owned by the backend; this module
//! only renders what the controller publishes.

pub mod gui_controller;

pub use gui_controller::GuiController;
