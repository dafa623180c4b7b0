//! Transition events broadcast to observers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observable state transition. Several may be emitted by a single
/// operation (completing a step and chaining into the next timer, for example)
/// but they always describe one atomic mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CookingEvent {
    StepCompleted {
        step_id: u32,
        at: DateTime<Utc>,
    },
    StepReopened {
        step_id: u32,
        at: DateTime<Utc>,
    },
    TimerStarted {
        step_id: u32,
        duration_seconds: f64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        step_id: u32,
        remaining_seconds: f64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        step_id: u32,
        remaining_seconds: f64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    AlarmRaised {
        step_id: u32,
        at: DateTime<Utc>,
    },
    AlarmDismissed {
        step_id: u32,
        at: DateTime<Utc>,
    },
    StepsReset {
        at: DateTime<Utc>,
    },
    RecipeSwitched {
        recipe_id: String,
        at: DateTime<Utc>,
    },
    SoundToggled {
        enabled: bool,
        at: DateTime<Utc>,
    },
}

impl CookingEvent {
    /// True when this event means a new countdown was anchored
    pub fn arms_countdown(&self) -> bool {
        matches!(
            self,
            CookingEvent::TimerStarted { .. } | CookingEvent::TimerResumed { .. }
        )
    }
}
