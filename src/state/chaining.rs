//! Step completion and next-timer chaining

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{StepSequence, TimerState};
use crate::events::CookingEvent;

/// Mark `step_id` completed and decide what the timer does next, as one
/// mutation of `steps` and `timer`.
///
/// If the step right after it exists, is not completed, and declares a
/// positive duration, its countdown is started. Otherwise the timer goes idle.
pub(crate) fn complete_and_chain(
    steps: &mut StepSequence,
    timer: &mut TimerState,
    step_id: u32,
    now: DateTime<Utc>,
    events: &mut Vec<CookingEvent>,
) {
    if !steps.set_completed(step_id, true) {
        return;
    }
    events.push(CookingEvent::StepCompleted { step_id, at: now });
    if steps.all_completed() {
        info!("All {} steps completed", steps.len());
    }

    let next = steps
        .next_after(step_id)
        .filter(|next| !next.completed)
        .and_then(|next| next.timer_seconds().map(|secs| (next.id, secs)));

    match next {
        Some((next_id, duration)) => {
            if timer.start(next_id, duration, now).is_ok() {
                info!("Step {} done, chaining timer for step {} ({}s)", step_id, next_id, duration);
                events.push(CookingEvent::TimerStarted {
                    step_id: next_id,
                    duration_seconds: duration,
                    at: now,
                });
            }
        }
        None => {
            if !timer.is_idle() {
                debug!("Step {} done, no timed step follows; clearing timer", step_id);
                timer.reset();
                events.push(CookingEvent::TimerReset { at: now });
            }
        }
    }
}
