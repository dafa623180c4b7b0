//! Utility functions module
//!
//! This module contains utility functions used throughout the application.

pub mod format;
#[cfg(feature = "server")]
pub mod signals;

// Re-export main functions
pub use format::{format_remaining, format_uptime};
#[cfg(feature = "server")]
pub use signals::shutdown_signal;
