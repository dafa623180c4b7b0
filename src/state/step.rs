//! Step records and the ordered step sequence

use serde::{Deserialize, Serialize};

/// One instruction in the cooking sequence, optionally paired with a timed wait
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: u32,
    pub description: String,
    /// Positive number of seconds, or `None` when the step has no timer
    #[serde(default)]
    pub timer_duration_seconds: Option<u32>,
    #[serde(default)]
    pub completed: bool,
}

impl Step {
    pub fn new(id: u32, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            timer_duration_seconds: None,
            completed: false,
        }
    }

    /// Attach a timer. A zero duration means "no timer".
    pub fn with_timer(mut self, seconds: u32) -> Self {
        self.timer_duration_seconds = (seconds > 0).then_some(seconds);
        self
    }

    /// Timer duration in seconds if the step declares a positive one
    pub fn timer_seconds(&self) -> Option<f64> {
        self.timer_duration_seconds
            .filter(|&s| s > 0)
            .map(f64::from)
    }
}

/// Ordered list of steps. Order in the list is the sequence order; ids are
/// lookup keys only.
///
/// This is the sole owner of `Step` records and the only place the
/// `completed` flag is written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepSequence {
    steps: Vec<Step>,
}

impl StepSequence {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn position(&self, step_id: u32) -> Option<usize> {
        self.steps.iter().position(|s| s.id == step_id)
    }

    pub fn get(&self, step_id: u32) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn at(&self, position: usize) -> Option<&Step> {
        self.steps.get(position)
    }

    /// The step immediately after `step_id` in sequence order
    pub fn next_after(&self, step_id: u32) -> Option<&Step> {
        self.position(step_id).and_then(|p| self.steps.get(p + 1))
    }

    /// Gating rule: a step may be completed iff every step before it is
    /// completed. Evaluated fresh on every call. Unknown ids are never
    /// completable.
    pub fn can_complete(&self, step_id: u32) -> bool {
        match self.position(step_id) {
            Some(position) => self.steps[..position].iter().all(|s| s.completed),
            None => false,
        }
    }

    pub(crate) fn set_completed(&mut self, step_id: u32, completed: bool) -> bool {
        match self.steps.iter_mut().find(|s| s.id == step_id) {
            Some(step) => {
                step.completed = completed;
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear_completed(&mut self) {
        for step in &mut self.steps {
            step.completed = false;
        }
    }

    pub fn completed_count(&self) -> usize {
        self.steps.iter().filter(|s| s.completed).count()
    }

    /// Position of the first step that is not yet completed
    pub fn current_position(&self) -> Option<usize> {
        self.steps.iter().position(|s| !s.completed)
    }

    pub fn all_completed(&self) -> bool {
        self.steps.iter().all(|s| s.completed)
    }
}
