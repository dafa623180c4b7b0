//! Countdown state and its lifecycle
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            v
//!        Alarming -> (dismissed) -> Idle | Running (next step)
//! ```
//!
//! While running, the remaining time is always derived from a wall-clock
//! anchor (`ends_at - now`), never accumulated tick by tick, so a throttled
//! or suspended host cannot make the countdown drift.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    #[default]
    Idle,
    Running,
    Paused,
    /// Countdown reached zero; stays here until explicitly dismissed.
    Alarming,
}

/// Result of observing a countdown
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing is counting down (idle, paused or already alarming)
    NotRunning,
    Counting { remaining_seconds: f64 },
    /// The countdown hit zero on this observation. Reported exactly once.
    Expired { step_id: u32 },
}

/// State of the single active countdown.
///
/// `active_step_id` is `None` exactly when `mode` is `Idle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TimerState {
    pub active_step_id: Option<u32>,
    pub remaining_seconds: f64,
    pub total_duration_seconds: f64,
    pub mode: TimerMode,
    /// Absolute end time; only set while `Running`
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
}

impl TimerState {
    /// Create an idle timer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.mode == TimerMode::Idle
    }

    pub fn is_running(&self) -> bool {
        self.mode == TimerMode::Running
    }

    pub fn is_alarming(&self) -> bool {
        self.mode == TimerMode::Alarming
    }

    /// Whole seconds left, as shown to the user
    pub fn display_seconds(&self) -> u64 {
        self.remaining_seconds.max(0.0).trunc() as u64
    }

    /// Anchor a new countdown for `step_id`, replacing whatever was active.
    pub fn start(
        &mut self,
        step_id: u32,
        duration_seconds: f64,
        now: DateTime<Utc>,
    ) -> Result<(), TimerError> {
        if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
            return Err(TimerError::NonPositiveDuration(duration_seconds));
        }
        *self = Self {
            active_step_id: Some(step_id),
            remaining_seconds: duration_seconds,
            total_duration_seconds: duration_seconds,
            mode: TimerMode::Running,
            ends_at: Some(anchor(now, duration_seconds)),
        };
        Ok(())
    }

    /// Freeze the countdown. Only valid while running.
    ///
    /// The remaining time is refreshed from the anchor first. If that shows the
    /// countdown already elapsed, the timer expires instead of pausing.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<TickOutcome> {
        if self.mode != TimerMode::Running {
            return None;
        }
        if let outcome @ TickOutcome::Expired { .. } = self.tick(now) {
            return Some(outcome);
        }
        self.mode = TimerMode::Paused;
        self.ends_at = None;
        Some(TickOutcome::NotRunning)
    }

    /// Re-anchor a paused countdown at `now + remaining`. Only valid while paused.
    pub fn resume(&mut self, now: DateTime<Utc>) -> bool {
        if self.mode != TimerMode::Paused {
            return false;
        }
        self.ends_at = Some(anchor(now, self.remaining_seconds));
        self.mode = TimerMode::Running;
        true
    }

    /// Recompute the remaining time from the anchor.
    ///
    /// Transitions to `Alarming` the first time the remaining time reaches
    /// zero; later ticks in `Alarming` report `NotRunning`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.mode != TimerMode::Running {
            return TickOutcome::NotRunning;
        }
        let (Some(ends_at), Some(step_id)) = (self.ends_at, self.active_step_id) else {
            // A running timer without an anchor cannot make progress
            self.reset();
            return TickOutcome::NotRunning;
        };

        let left = (ends_at - now).num_milliseconds() as f64 / 1000.0;
        self.remaining_seconds = left.max(0.0);

        if self.remaining_seconds <= 0.0 {
            self.mode = TimerMode::Alarming;
            self.ends_at = None;
            TickOutcome::Expired { step_id }
        } else {
            TickOutcome::Counting {
                remaining_seconds: self.remaining_seconds,
            }
        }
    }

    /// Stored durations are finite and never negative
    pub fn has_valid_durations(&self) -> bool {
        [self.remaining_seconds, self.total_duration_seconds]
            .iter()
            .all(|s| s.is_finite() && *s >= 0.0)
    }

    /// Drop any countdown and go back to idle
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

fn anchor(now: DateTime<Utc>, seconds: f64) -> DateTime<Utc> {
    // NaN and negatives collapse to zero; `as` saturates huge values
    let millis = (seconds.max(0.0) * 1000.0).round() as i64;
    let delta = TimeDelta::try_milliseconds(millis).unwrap_or(TimeDelta::MAX);
    now.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC)
}
