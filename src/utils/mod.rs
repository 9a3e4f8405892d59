//! Utility modules
//!
//! Provides logging setup with startup rotation.

pub mod logging;

pub use logging::init_logging;
