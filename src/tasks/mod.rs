//! Background tasks module
//!
//! This module contains the tasks that drive the countdown alongside the
//! state container.

pub mod countdown;
pub mod wake_up_recovery;

// Re-export main types
pub use countdown::CountdownTicker;
pub use wake_up_recovery::wake_up_recovery_task;
