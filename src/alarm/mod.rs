//! Alarm subsystem
//!
//! An expired countdown rings through an [`AlertSink`] on a fixed interval
//! until the user dismisses it. Output failures never reach the state machine.

pub mod controller;
pub mod sink;

pub use controller::AlarmController;
pub use sink::{AlertSink, LogAlertSink, TerminalAlertSink, ALARM_VIBRATION_PATTERN};
