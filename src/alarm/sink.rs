//! Alert outputs
//!
//! Every method is best-effort. Implementations return an error when an
//! output is blocked or missing; callers log it and carry on.

use std::io::Write;

use tracing::info;

use crate::error::AlertError;

/// Haptic pattern for one alarm burst, in milliseconds (on, off, on, ...)
pub const ALARM_VIBRATION_PATTERN: [u64; 6] = [400, 200, 400, 200, 400, 600];

/// Where alarm and chime output goes
pub trait AlertSink: Send + Sync {
    /// One audible alarm burst
    fn sound_alarm(&self, step_id: u32) -> Result<(), AlertError>;

    /// One haptic pulse pattern
    fn vibrate(&self, pattern: &[u64]) -> Result<(), AlertError>;

    /// System-level notification
    fn notify(&self, title: &str, body: &str) -> Result<(), AlertError>;

    /// Short confirmation sound when a step is checked off
    fn chime(&self) -> Result<(), AlertError>;

    /// Cut any output still playing
    fn silence(&self) -> Result<(), AlertError> {
        Ok(())
    }
}

/// Sink that only writes to the log. Useful on headless hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn sound_alarm(&self, step_id: u32) -> Result<(), AlertError> {
        info!("ALARM: timer for step {} is done", step_id);
        Ok(())
    }

    fn vibrate(&self, _pattern: &[u64]) -> Result<(), AlertError> {
        Err(AlertError::Unsupported("haptic"))
    }

    fn notify(&self, title: &str, body: &str) -> Result<(), AlertError> {
        info!("{}: {}", title, body);
        Ok(())
    }

    fn chime(&self) -> Result<(), AlertError> {
        Ok(())
    }
}

/// Rings the terminal bell on stderr and mirrors notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalAlertSink;

impl TerminalAlertSink {
    fn bell(times: usize) -> Result<(), AlertError> {
        let mut stderr = std::io::stderr().lock();
        stderr
            .write_all("\x07".repeat(times).as_bytes())
            .and_then(|_| stderr.flush())
            .map_err(|e| AlertError::Failed(e.to_string()))
    }
}

impl AlertSink for TerminalAlertSink {
    fn sound_alarm(&self, _step_id: u32) -> Result<(), AlertError> {
        Self::bell(2)
    }

    fn vibrate(&self, _pattern: &[u64]) -> Result<(), AlertError> {
        Err(AlertError::Unsupported("haptic"))
    }

    fn notify(&self, title: &str, body: &str) -> Result<(), AlertError> {
        info!("{}: {}", title, body);
        Ok(())
    }

    fn chime(&self) -> Result<(), AlertError> {
        Self::bell(1)
    }
}
