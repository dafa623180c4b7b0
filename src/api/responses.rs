//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{Progress, Snapshot},
    utils::format_remaining,
};

/// Response for every command endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    /// False when the request was ignored because it would break an invariant
    pub applied: bool,
    pub timestamp: DateTime<Utc>,
    pub session: Snapshot,
}

impl ActionResponse {
    pub fn new(applied: bool, session: Snapshot) -> Self {
        Self {
            applied,
            timestamp: Utc::now(),
            session,
        }
    }
}

/// Full status with display helpers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub session: Snapshot,
    pub progress: Progress,
    /// Remaining time as `MM:SS`
    pub timer_display: String,
    pub alarm_ringing: Option<u32>,
    pub sound_enabled: bool,
    pub uptime: String,
}

impl StatusResponse {
    pub fn new(session: Snapshot, alarm_ringing: Option<u32>, sound_enabled: bool, uptime: String) -> Self {
        Self {
            progress: session.progress(),
            timer_display: format_remaining(session.timer.remaining_seconds),
            session,
            alarm_ringing,
            sound_enabled,
            uptime,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartTimerRequest {
    pub step_id: u32,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundRequest {
    pub enabled: bool,
}
