//! Wake-up recovery background task

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use tokio::time::interval;
use tracing::{debug, info};

use crate::state::AppState;

/// Wall-clock time that may pass beyond monotonic time before we call it a suspension
pub const SUSPEND_THRESHOLD: Duration = Duration::from_secs(2);

/// Background task that notices host suspension and re-anchors the countdown.
///
/// The monotonic clock stops while the host sleeps; the wall clock does not.
/// When the two drift apart between checks, the session is treated as having
/// just returned to the foreground.
pub async fn wake_up_recovery_task(state: Arc<AppState>, check_every: Duration) {
    info!("Starting wake-up recovery task (every {:?})", check_every);

    let mut interval = interval(check_every);
    let mut last_mono = Instant::now();
    let mut last_wall = state.now();

    loop {
        interval.tick().await;

        let mono = Instant::now();
        let wall = state.now();
        if let Some(gap) = suspension_gap(mono - last_mono, last_wall, wall) {
            info!("System wake-up detected after ~{}s, re-anchoring countdown", gap.as_secs());
            state.on_foreground();
        }
        last_mono = mono;
        last_wall = wall;
    }
}

/// How long the host was suspended between two checks, if noticeably so
pub fn suspension_gap(
    mono_elapsed: Duration,
    wall_before: DateTime<Utc>,
    wall_after: DateTime<Utc>,
) -> Option<Duration> {
    let wall_elapsed = (wall_after - wall_before).to_std().ok()?;
    let gap = wall_elapsed.checked_sub(mono_elapsed)?;
    if gap > SUSPEND_THRESHOLD {
        Some(gap)
    } else {
        debug!("Clock skew of {:?} is within tolerance", gap);
        None
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::{
        alarm::LogAlertSink,
        clock::ManualClock,
        recipe::RecipeLibrary,
        state::{CookingSession, SessionOptions, Step, TimerMode},
    };

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn detects_wall_clock_jump() {
        let gap = suspension_gap(Duration::from_secs(5), t0(), t0() + TimeDelta::seconds(605));
        assert_eq!(gap, Some(Duration::from_secs(600)));
    }

    #[test]
    fn ignores_normal_progress_and_backwards_clocks() {
        assert_eq!(
            suspension_gap(Duration::from_secs(5), t0(), t0() + TimeDelta::milliseconds(5500)),
            None
        );
        assert_eq!(
            suspension_gap(Duration::from_secs(5), t0(), t0() - TimeDelta::seconds(30)),
            None
        );
    }

    #[tokio::test(start_paused = true)]
    async fn wake_up_expires_countdown_that_ran_out_while_asleep() {
        let clock = Arc::new(ManualClock::new(t0()));
        let state = AppState::new(
            CookingSession::new(None, vec![Step::new(1, "a"), Step::new(2, "b").with_timer(30)]),
            RecipeLibrary::new(),
            clock.clone(),
            Arc::new(LogAlertSink),
            SessionOptions {
                // Keep the regular poll out of the way
                tick_interval: Duration::from_secs(3600),
                ..SessionOptions::default()
            },
        );
        state.toggle(1);

        let task = tokio::spawn(wake_up_recovery_task(Arc::clone(&state), Duration::from_secs(5)));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(state.snapshot().timer.mode, TimerMode::Running);

        clock.advance_secs(600);
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(state.snapshot().timer.mode, TimerMode::Alarming);
        assert_eq!(state.alarm_ringing(), Some(2));
        task.abort();
    }
}
