//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use super::{CookingSession, Snapshot};
use crate::{
    alarm::{AlarmController, AlertSink},
    clock::Clock,
    error::{RecipeError, TimerError},
    events::CookingEvent,
    persistence::{spawn_snapshot_writer, SnapshotStore},
    recipe::{Recipe, RecipeLibrary, RecipeProvider},
    tasks::CountdownTicker,
};

/// Runtime knobs for a session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// How often a running countdown is recomputed
    pub tick_interval: Duration,
    /// Gap between alarm bursts
    pub alarm_interval: Duration,
    pub sound_enabled: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(250),
            alarm_interval: Duration::from_millis(900),
            sound_enabled: true,
        }
    }
}

/// The single state container for a cooking session.
///
/// Every mutation goes through one mutex, so operations never interleave.
/// After each one the countdown poll and the alarm are reconciled with the
/// new timer mode, observers are notified, and the snapshot channel (which
/// also feeds persistence) is updated.
///
/// Operations that arm the countdown or the alarm spawn tokio tasks and
/// must be called from within a runtime.
pub struct AppState {
    session: Mutex<CookingSession>,
    recipes: Mutex<RecipeLibrary>,
    clock: Arc<dyn Clock>,
    ticker: CountdownTicker,
    alarm: AlarmController,
    /// Server metadata
    pub start_time: Instant,
    /// Latest snapshot for subscribers and the persistence writer
    snapshot_tx: watch::Sender<Snapshot>,
    /// Keep the receiver alive to prevent channel closure
    _snapshot_rx: watch::Receiver<Snapshot>,
    event_tx: broadcast::Sender<CookingEvent>,
    self_ref: Weak<AppState>,
}

impl AppState {
    pub fn new(
        mut session: CookingSession,
        recipes: RecipeLibrary,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn AlertSink>,
        options: SessionOptions,
    ) -> Arc<Self> {
        if !options.sound_enabled {
            session.set_muted(true, clock.now());
        }
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
        let sound_enabled = !session.muted();
        let (event_tx, _) = broadcast::channel(100);

        Arc::new_cyclic(|self_ref| Self {
            session: Mutex::new(session),
            recipes: Mutex::new(recipes),
            clock,
            ticker: CountdownTicker::new(options.tick_interval),
            alarm: AlarmController::new(sink, options.alarm_interval, sound_enabled),
            start_time: Instant::now(),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
            event_tx,
            self_ref: self_ref.clone(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, CookingSession> {
        self.session.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            warn!("Session lock was poisoned, recovering last state");
            poisoned.into_inner()
        })
    }

    fn lock_recipes(&self) -> MutexGuard<'_, RecipeLibrary> {
        self.recipes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one mutation and everything that follows from it, under the lock
    fn apply<F>(&self, action: &str, mutate: F) -> Vec<CookingEvent>
    where
        F: FnOnce(&mut CookingSession, DateTime<Utc>) -> Vec<CookingEvent>,
    {
        let mut session = self.lock();
        let now = self.clock.now();
        let events = mutate(&mut session, now);
        if events.is_empty() {
            debug!("{}: rejected by guard", action);
        }
        self.reconcile(&session, &events);
        events
    }

    fn reconcile(&self, session: &CookingSession, events: &[CookingEvent]) {
        let timer = session.timer();
        self.alarm.set_sound_enabled(!session.muted());

        if timer.is_running() {
            if events.iter().any(CookingEvent::arms_countdown) || !self.ticker.is_armed() {
                self.ticker.arm(self.self_ref.clone());
            }
        } else {
            self.ticker.cancel();
        }

        match timer.active_step_id.filter(|_| timer.is_alarming()) {
            Some(step_id) => self.alarm.start(step_id),
            None => {
                self.alarm.stop();
            }
        }

        if events
            .iter()
            .any(|e| matches!(e, CookingEvent::StepCompleted { .. }))
        {
            self.alarm.chime();
        }

        let snapshot = session.snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });

        for event in events {
            // No subscribers is fine
            let _ = self.event_tx.send(event.clone());
        }
    }

    /// Called by the countdown poll. Returns false when the poll should stop.
    pub(crate) fn countdown_tick(&self, generation: u64) -> bool {
        let mut session = self.lock();
        if !self.ticker.is_current(generation) {
            debug!("Dropping stale countdown poll generation {}", generation);
            return false;
        }
        let now = self.clock.now();
        let events = session.tick(now);
        self.reconcile(&session, &events);
        session.timer().is_running()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    pub fn can_complete(&self, step_id: u32) -> bool {
        self.lock().can_complete(step_id)
    }

    /// Follow snapshot changes. The current value is available immediately.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CookingEvent> {
        self.event_tx.subscribe()
    }

    pub fn alarm_ringing(&self) -> Option<u32> {
        self.alarm.ringing_step()
    }

    pub fn sound_enabled(&self) -> bool {
        self.alarm.sound_enabled()
    }

    pub fn recipes(&self) -> Vec<Recipe> {
        self.lock_recipes().recipes()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        crate::utils::format_uptime(self.start_time.elapsed())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Toggle a step's completion. Returns false when the guard rejected it.
    pub fn toggle(&self, step_id: u32) -> bool {
        !self
            .apply("toggle", |s, now| s.toggle(step_id, now))
            .is_empty()
    }

    pub fn start_timer(&self, step_id: u32, duration_seconds: f64) -> Result<bool, TimerError> {
        let mut result = Ok(false);
        self.apply("start_timer", |s, now| {
            match s.start_timer(step_id, duration_seconds, now) {
                Ok(events) => {
                    result = Ok(!events.is_empty());
                    events
                }
                Err(e) => {
                    warn!("Rejected timer start for step {}: {}", step_id, e);
                    result = Err(e);
                    Vec::new()
                }
            }
        });
        result
    }

    pub fn pause(&self) -> bool {
        !self.apply("pause", |s, now| s.pause(now)).is_empty()
    }

    pub fn resume(&self) -> bool {
        !self.apply("resume", |s, now| s.resume(now)).is_empty()
    }

    /// Silence the alarm for `step_id`, complete the step and chain.
    pub fn dismiss_alarm(&self, step_id: u32) -> bool {
        if self.alarm.ringing_step() == Some(step_id) {
            self.alarm.stop();
        }
        !self
            .apply("dismiss_alarm", |s, now| s.dismiss_alarm(step_id, now))
            .is_empty()
    }

    pub fn reset_timer(&self) -> bool {
        !self.apply("reset_timer", |s, now| s.reset_timer(now)).is_empty()
    }

    pub fn reset_all(&self) {
        self.apply("reset_all", |s, now| s.reset_all(now));
    }

    /// Seed the steps from `recipe`, starting over
    pub fn switch_recipe(&self, recipe: &Recipe) -> Result<(), RecipeError> {
        recipe.validate()?;
        let steps = recipe.to_steps();
        self.apply("switch_recipe", |s, now| {
            s.switch_recipe(recipe.id.clone(), steps, now)
        });
        Ok(())
    }

    /// Switch to a recipe from the library
    pub fn activate_recipe(&self, recipe_id: &str) -> Result<(), RecipeError> {
        let recipe = self
            .lock_recipes()
            .recipe(recipe_id)
            .ok_or_else(|| RecipeError::NotFound(recipe_id.to_string()))?;
        self.switch_recipe(&recipe)
    }

    pub fn import_recipe(&self, recipe: Recipe) -> Result<(), RecipeError> {
        self.lock_recipes().import(recipe)
    }

    pub fn delete_recipe(&self, recipe_id: &str) -> Result<Recipe, RecipeError> {
        self.lock_recipes().delete(recipe_id)
    }

    /// Mute or unmute chime and alarm audio. The choice is persisted.
    pub fn set_sound_enabled(&self, enabled: bool) -> bool {
        let applied = !self
            .apply("set_sound", |s, now| s.set_muted(!enabled, now))
            .is_empty();
        if applied {
            info!("Sound {}", if enabled { "enabled" } else { "disabled" });
        }
        applied
    }

    /// The host came back to the foreground (or woke from suspension).
    ///
    /// Recomputes the countdown from its anchor right away instead of waiting
    /// for the next poll, then makes sure the poll and the alarm match the
    /// timer mode. Also used once at cold start to re-arm a persisted
    /// countdown or alarm.
    pub fn on_foreground(&self) {
        self.apply("foreground", |s, now| {
            let events = s.tick(now);
            debug!("Re-anchored countdown: {:?}", s.timer());
            events
        });
    }

    /// Persist every snapshot change to `store` in the background
    pub fn persist_to(&self, store: Arc<dyn SnapshotStore>) -> JoinHandle<()> {
        spawn_snapshot_writer(store, self.subscribe())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("session", &*self.lock())
            .field("ticker", &self.ticker)
            .field("alarm", &self.alarm)
            .finish_non_exhaustive()
    }
}
