//! Durable snapshot of a cooking session

use serde::{Deserialize, Serialize};

use super::{Step, StepSequence, TimerState};

/// Everything needed to resume mid-cook: the steps, the timer and the
/// audio preference.
///
/// Written on every state change, read once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Snapshot {
    /// Recipe the steps were seeded from
    #[serde(default)]
    pub recipe_id: Option<String>,
    pub steps: StepSequence,
    #[serde(default)]
    pub timer: TimerState,
    /// Chime and alarm audio turned off by the user
    #[serde(default)]
    pub muted: bool,
}

/// Completion summary for progress displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// Position of the first incomplete step, `None` when everything is done
    pub current_index: Option<usize>,
}

impl Snapshot {
    pub fn steps(&self) -> &[Step] {
        self.steps.steps()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            completed: self.steps.completed_count(),
            total: self.steps.len(),
            current_index: self.steps.current_position(),
        }
    }
}

impl Progress {
    /// 0.0 ..= 100.0
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }
}
