//! Synchronous cooking core: steps plus the single countdown
//!
//! Every operation takes the current instant and returns the events it
//! produced. An empty list means the request was rejected by a guard and
//! nothing changed.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::{
    chaining::complete_and_chain, Snapshot, Step, StepSequence, TickOutcome, TimerMode,
    TimerState,
};
use crate::{error::TimerError, events::CookingEvent};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CookingSession {
    recipe_id: Option<String>,
    steps: StepSequence,
    timer: TimerState,
    muted: bool,
}

impl CookingSession {
    /// Fresh session with every step incomplete and the timer idle
    pub fn new(recipe_id: Option<String>, steps: Vec<Step>) -> Self {
        let mut steps = StepSequence::new(steps);
        steps.clear_completed();
        Self {
            recipe_id,
            steps,
            timer: TimerState::new(),
            muted: false,
        }
    }

    /// Resume from a persisted snapshot, repairing a timer that no longer
    /// points at a known step or carries unusable durations.
    pub fn restore(snapshot: Snapshot) -> Self {
        let mut session = Self {
            recipe_id: snapshot.recipe_id,
            steps: snapshot.steps,
            timer: snapshot.timer,
            muted: snapshot.muted,
        };
        let dangling = match session.timer.active_step_id {
            Some(id) => session.timer.is_idle() || session.steps.get(id).is_none(),
            None => !session.timer.is_idle(),
        };
        if dangling {
            warn!("Restored timer does not match any step, resetting it");
            session.timer.reset();
        } else if !session.timer.has_valid_durations() {
            warn!(
                "Restored timer has invalid durations (remaining={}, total={}), resetting it",
                session.timer.remaining_seconds, session.timer.total_duration_seconds
            );
            session.timer.reset();
        }
        session
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            recipe_id: self.recipe_id.clone(),
            steps: self.steps.clone(),
            timer: self.timer.clone(),
            muted: self.muted,
        }
    }

    pub fn recipe_id(&self) -> Option<&str> {
        self.recipe_id.as_deref()
    }

    pub fn steps(&self) -> &StepSequence {
        &self.steps
    }

    pub fn timer(&self) -> &TimerState {
        &self.timer
    }

    /// Audio preference; survives restarts and recipe switches
    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn can_complete(&self, step_id: u32) -> bool {
        self.steps.can_complete(step_id)
    }

    /// Flip a step's completion flag.
    ///
    /// Completing is gated on every earlier step being done and chains into
    /// the next step's timer. Reopening is always allowed and drops a timer
    /// anchored at this step or any later one.
    pub fn toggle(&mut self, step_id: u32, now: DateTime<Utc>) -> Vec<CookingEvent> {
        let mut events = Vec::new();
        let Some(position) = self.steps.position(step_id) else {
            debug!("Ignoring toggle for unknown step {}", step_id);
            return events;
        };

        if self.steps.at(position).is_some_and(|s| s.completed) {
            self.steps.set_completed(step_id, false);
            events.push(CookingEvent::StepReopened { step_id, at: now });
            info!("Step {} reopened", step_id);

            let invalidated = self
                .timer
                .active_step_id
                .and_then(|active| self.steps.position(active))
                .is_some_and(|active_position| active_position >= position);
            if invalidated {
                info!("Timer for a later step invalidated by reopening step {}", step_id);
                self.timer.reset();
                events.push(CookingEvent::TimerReset { at: now });
            }
            return events;
        }

        if !self.steps.can_complete(step_id) {
            debug!("Step {} is gated by an earlier incomplete step", step_id);
            return events;
        }
        complete_and_chain(&mut self.steps, &mut self.timer, step_id, now, &mut events);
        events
    }

    /// Manually start a countdown for a known step
    pub fn start_timer(
        &mut self,
        step_id: u32,
        duration_seconds: f64,
        now: DateTime<Utc>,
    ) -> Result<Vec<CookingEvent>, TimerError> {
        if self.steps.get(step_id).is_none() {
            debug!("Ignoring timer start for unknown step {}", step_id);
            return Ok(Vec::new());
        }
        self.timer.start(step_id, duration_seconds, now)?;
        info!("Timer started for step {} ({}s)", step_id, duration_seconds);
        Ok(vec![CookingEvent::TimerStarted {
            step_id,
            duration_seconds,
            at: now,
        }])
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Vec<CookingEvent> {
        match self.timer.pause(now) {
            Some(TickOutcome::Expired { step_id }) => vec![alarm_raised(step_id, now)],
            Some(_) => {
                let step_id = self.timer.active_step_id.unwrap_or_default();
                info!("Timer paused for step {} with {:.1}s left", step_id, self.timer.remaining_seconds);
                vec![CookingEvent::TimerPaused {
                    step_id,
                    remaining_seconds: self.timer.remaining_seconds,
                    at: now,
                }]
            }
            None => {
                debug!("Ignoring pause while timer is {:?}", self.timer.mode);
                Vec::new()
            }
        }
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> Vec<CookingEvent> {
        if !self.timer.resume(now) {
            debug!("Ignoring resume while timer is {:?}", self.timer.mode);
            return Vec::new();
        }
        let step_id = self.timer.active_step_id.unwrap_or_default();
        info!("Timer resumed for step {}", step_id);
        vec![CookingEvent::TimerResumed {
            step_id,
            remaining_seconds: self.timer.remaining_seconds,
            at: now,
        }]
    }

    /// Recompute the countdown from its anchor
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<CookingEvent> {
        match self.timer.tick(now) {
            TickOutcome::Expired { step_id } => vec![alarm_raised(step_id, now)],
            _ => Vec::new(),
        }
    }

    /// Acknowledge the alarm for `step_id`: complete it and chain.
    ///
    /// Only acts while the timer is alarming for that step, so repeated
    /// dismissals cannot restart a chained countdown.
    pub fn dismiss_alarm(&mut self, step_id: u32, now: DateTime<Utc>) -> Vec<CookingEvent> {
        if self.timer.mode != TimerMode::Alarming || self.timer.active_step_id != Some(step_id) {
            debug!("No alarm ringing for step {}, nothing to dismiss", step_id);
            return Vec::new();
        }
        info!("Alarm dismissed for step {}", step_id);
        let mut events = vec![CookingEvent::AlarmDismissed { step_id, at: now }];
        complete_and_chain(&mut self.steps, &mut self.timer, step_id, now, &mut events);
        if self.timer.is_alarming() {
            // Step vanished from the sequence; never leave the alarm stuck
            self.timer.reset();
            events.push(CookingEvent::TimerReset { at: now });
        }
        events
    }

    pub fn reset_timer(&mut self, now: DateTime<Utc>) -> Vec<CookingEvent> {
        if self.timer.is_idle() {
            return Vec::new();
        }
        info!("Timer reset");
        self.timer.reset();
        vec![CookingEvent::TimerReset { at: now }]
    }

    /// Start over: every step incomplete, timer idle
    pub fn reset_all(&mut self, now: DateTime<Utc>) -> Vec<CookingEvent> {
        info!("Resetting all {} steps", self.steps.len());
        self.steps.clear_completed();
        self.timer.reset();
        vec![CookingEvent::StepsReset { at: now }]
    }

    pub fn set_muted(&mut self, muted: bool, now: DateTime<Utc>) -> Vec<CookingEvent> {
        if self.muted == muted {
            return Vec::new();
        }
        self.muted = muted;
        vec![CookingEvent::SoundToggled {
            enabled: !muted,
            at: now,
        }]
    }

    /// Replace the steps with a new recipe's, reset as in `reset_all`
    pub fn switch_recipe(
        &mut self,
        recipe_id: impl Into<String>,
        steps: Vec<Step>,
        now: DateTime<Utc>,
    ) -> Vec<CookingEvent> {
        let recipe_id = recipe_id.into();
        info!("Switching to recipe '{}' ({} steps)", recipe_id, steps.len());
        *self = Self {
            muted: self.muted,
            ..Self::new(Some(recipe_id.clone()), steps)
        };
        vec![
            CookingEvent::RecipeSwitched { recipe_id, at: now },
            CookingEvent::StepsReset { at: now },
        ]
    }
}

fn alarm_raised(step_id: u32, now: DateTime<Utc>) -> CookingEvent {
    info!("Timer for step {} expired, alarm raised", step_id);
    CookingEvent::AlarmRaised { step_id, at: now }
}
