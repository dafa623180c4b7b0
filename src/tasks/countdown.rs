//! Recurring countdown poll
//!
//! While a timer runs, a single task recomputes it from the wall-clock anchor
//! every `period`. Arming a new countdown aborts the previous task first, and
//! every poll carries a generation number so a stale task can never touch a
//! newer countdown.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex, PoisonError, Weak,
    },
    time::Duration,
};

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::debug;

use crate::state::AppState;

#[derive(Debug)]
pub struct CountdownTicker {
    period: Duration,
    generation: AtomicU64,
    armed: Mutex<Option<(u64, JoinHandle<()>)>>,
}

impl CountdownTicker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            generation: AtomicU64::new(0),
            armed: Mutex::new(None),
        }
    }

    /// Cancel any pending poll and schedule a fresh one. Returns its generation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&self, state: Weak<AppState>) -> u64 {
        let mut armed = self.armed.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((previous, handle)) = armed.take() {
            debug!("Cancelling countdown poll generation {}", previous);
            handle.abort();
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let handle = tokio::spawn(countdown_task(state, generation, self.period));
        *armed = Some((generation, handle));
        debug!("Armed countdown poll generation {} every {:?}", generation, self.period);
        generation
    }

    pub fn cancel(&self) {
        if let Some((generation, handle)) = self
            .armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            debug!("Cancelling countdown poll generation {}", generation);
            handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// True when `generation` belongs to the poll that is currently scheduled
    pub fn is_current(&self, generation: u64) -> bool {
        self.armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|(current, _)| *current == generation)
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        if let Some((_, handle)) = self
            .armed
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

async fn countdown_task(state: Weak<AppState>, generation: u64, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; the countdown was just anchored.
    interval.tick().await;

    loop {
        interval.tick().await;
        let Some(state) = state.upgrade() else {
            break;
        };
        if !state.countdown_tick(generation) {
            break;
        }
    }
    debug!("Countdown poll generation {} finished", generation);
}
