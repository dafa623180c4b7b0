//! End-to-end session behaviour through the runtime state container

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::DateTime;
use cook_along::{
    alarm::AlertSink,
    error::AlertError,
    persistence::{MemoryStore, SnapshotStore},
    recipe::RecipeLibrary,
    AppState, CookingEvent, CookingSession, ManualClock, SessionOptions, Snapshot, Step,
    TimerMode,
};
use tokio::{sync::broadcast, time::sleep};

#[derive(Default)]
struct RecordingSink {
    alarm_bursts: AtomicUsize,
    notifications: AtomicUsize,
    chimes: AtomicUsize,
}

impl AlertSink for RecordingSink {
    fn sound_alarm(&self, _step_id: u32) -> Result<(), AlertError> {
        self.alarm_bursts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn vibrate(&self, _pattern: &[u64]) -> Result<(), AlertError> {
        Err(AlertError::Unsupported("haptic"))
    }

    fn notify(&self, _title: &str, _body: &str) -> Result<(), AlertError> {
        self.notifications.fetch_add(1, Ordering::SeqCst);
        Err(AlertError::Failed("permission denied".into()))
    }

    fn chime(&self) -> Result<(), AlertError> {
        self.chimes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct Harness {
    state: Arc<AppState>,
    clock: Arc<ManualClock>,
    sink: Arc<RecordingSink>,
}

fn harness_with(session: CookingSession) -> Harness {
    let clock = Arc::new(ManualClock::new(
        DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
    ));
    let sink = Arc::new(RecordingSink::default());
    let state = AppState::new(
        session,
        RecipeLibrary::with_builtin(),
        clock.clone(),
        sink.clone(),
        SessionOptions::default(),
    );
    Harness { state, clock, sink }
}

fn harness(steps: Vec<Step>) -> Harness {
    harness_with(CookingSession::new(Some("test".into()), steps))
}

fn completed(snapshot: &Snapshot) -> Vec<bool> {
    snapshot.steps().iter().map(|s| s.completed).collect()
}

fn drain(rx: &mut broadcast::Receiver<CookingEvent>) -> Vec<CookingEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test(start_paused = true)]
async fn scenario_prep_simmer_serve() {
    let h = harness(vec![
        Step::new(1, "prep"),
        Step::new(2, "simmer").with_timer(300),
        Step::new(3, "serve"),
    ]);

    assert!(h.state.toggle(1));
    let snapshot = h.state.snapshot();
    assert_eq!(completed(&snapshot), [true, false, false]);
    assert_eq!(snapshot.timer.active_step_id, Some(2));
    assert_eq!(snapshot.timer.remaining_seconds, 300.0);
    assert_eq!(snapshot.timer.mode, TimerMode::Running);

    h.clock.advance_secs(300);
    sleep(Duration::from_millis(600)).await;
    assert_eq!(h.state.snapshot().timer.mode, TimerMode::Alarming);
    assert_eq!(h.state.alarm_ringing(), Some(2));

    // Gated while alarming: step 3 cannot be completed yet
    assert!(!h.state.toggle(3));

    assert!(h.state.dismiss_alarm(2));
    let snapshot = h.state.snapshot();
    assert_eq!(completed(&snapshot), [true, true, false]);
    assert_eq!(snapshot.timer.mode, TimerMode::Idle);
    assert_eq!(snapshot.timer.active_step_id, None);
    assert_eq!(h.state.alarm_ringing(), None);
}

#[tokio::test(start_paused = true)]
async fn background_gap_expires_exactly_once() {
    let h = harness(vec![Step::new(1, "a"), Step::new(2, "b").with_timer(120)]);
    let mut events = h.state.subscribe_events();
    h.state.toggle(1);

    // Simulate the host being suspended: wall clock jumps, then many polls run
    h.clock.advance_secs(3600);
    sleep(Duration::from_secs(5)).await;

    let alarms = drain(&mut events)
        .into_iter()
        .filter(|e| matches!(e, CookingEvent::AlarmRaised { .. }))
        .count();
    assert_eq!(alarms, 1);

    let snapshot = h.state.snapshot();
    assert_eq!(snapshot.timer.mode, TimerMode::Alarming);
    assert_eq!(snapshot.timer.remaining_seconds, 0.0);
    assert_eq!(h.sink.notifications.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn remaining_time_follows_the_wall_clock_not_the_poll_count() {
    let h = harness(vec![Step::new(1, "a").with_timer(100)]);
    h.state.start_timer(1, 100.0).unwrap();

    // Many polls with no wall-clock progress change nothing
    sleep(Duration::from_secs(10)).await;
    assert_eq!(h.state.snapshot().timer.remaining_seconds, 100.0);

    h.clock.advance(Duration::from_millis(42_500));
    sleep(Duration::from_millis(300)).await;
    assert_eq!(h.state.snapshot().timer.remaining_seconds, 57.5);
}

#[tokio::test(start_paused = true)]
async fn pause_preserves_remaining_across_delay() {
    let h = harness(vec![Step::new(1, "a").with_timer(100)]);
    h.state.start_timer(1, 100.0).unwrap();

    h.clock.advance_secs(30);
    assert!(h.state.pause());
    let paused = h.state.snapshot().timer;
    assert_eq!(paused.mode, TimerMode::Paused);
    assert_eq!(paused.remaining_seconds, 70.0);

    h.clock.advance_secs(10_000);
    sleep(Duration::from_secs(2)).await;
    h.state.on_foreground();
    assert_eq!(h.state.snapshot().timer.remaining_seconds, 70.0);

    assert!(h.state.resume());
    assert_eq!(h.state.snapshot().timer.remaining_seconds, 70.0);
    assert!(!h.state.resume());

    h.clock.advance_secs(70);
    sleep(Duration::from_millis(300)).await;
    assert_eq!(h.state.snapshot().timer.mode, TimerMode::Alarming);
}

#[tokio::test(start_paused = true)]
async fn dismissal_chains_next_timer_atomically() {
    let h = harness(vec![
        Step::new(1, "sear").with_timer(60),
        Step::new(2, "braise").with_timer(900),
        Step::new(3, "rest"),
    ]);
    h.state.start_timer(1, 60.0).unwrap();
    h.clock.advance_secs(60);
    h.state.on_foreground();
    assert_eq!(h.state.alarm_ringing(), Some(1));

    let mut snapshots = h.state.subscribe();
    snapshots.borrow_and_update();
    assert!(h.state.dismiss_alarm(1));

    // Exactly one snapshot version covers the completion and the new countdown
    assert!(snapshots.has_changed().unwrap());
    let observed = snapshots.borrow_and_update().clone();
    assert!(!snapshots.has_changed().unwrap());
    assert_eq!(completed(&observed), [true, false, false]);
    assert_eq!(observed.timer.mode, TimerMode::Running);
    assert_eq!(observed.timer.active_step_id, Some(2));
    assert_eq!(observed.timer.remaining_seconds, 900.0);
    assert_eq!(h.state.alarm_ringing(), None);

    // Dismissing again must not restart the chained countdown
    h.clock.advance_secs(100);
    assert!(!h.state.dismiss_alarm(1));
    h.state.on_foreground();
    assert_eq!(h.state.snapshot().timer.remaining_seconds, 800.0);
}

#[tokio::test(start_paused = true)]
async fn alarm_keeps_ringing_until_dismissed() {
    let h = harness(vec![Step::new(1, "a").with_timer(5), Step::new(2, "b")]);
    h.state.start_timer(1, 5.0).unwrap();
    h.clock.advance_secs(5);
    h.state.on_foreground();

    sleep(Duration::from_secs(60)).await;
    let bursts = h.sink.alarm_bursts.load(Ordering::SeqCst);
    assert!(bursts > 50, "alarm should repeat, got {bursts} bursts");
    assert_eq!(h.state.snapshot().timer.mode, TimerMode::Alarming);

    h.state.dismiss_alarm(1);
    sleep(Duration::from_secs(10)).await;
    assert_eq!(h.sink.alarm_bursts.load(Ordering::SeqCst), bursts);
}

#[tokio::test(start_paused = true)]
async fn reopening_an_earlier_step_cancels_the_countdown() {
    let h = harness(vec![
        Step::new(1, "a"),
        Step::new(2, "b"),
        Step::new(3, "c").with_timer(30),
    ]);
    h.state.toggle(1);
    h.state.toggle(2);
    assert_eq!(h.state.snapshot().timer.active_step_id, Some(3));

    assert!(h.state.toggle(2));
    assert_eq!(h.state.snapshot().timer.mode, TimerMode::Idle);

    // No stale poll may resurrect the countdown
    h.clock.advance_secs(60);
    sleep(Duration::from_secs(2)).await;
    assert_eq!(h.state.snapshot().timer.mode, TimerMode::Idle);
    assert_eq!(h.state.alarm_ringing(), None);
}

#[tokio::test(start_paused = true)]
async fn restarting_a_timer_replaces_the_pending_poll() {
    let h = harness(vec![Step::new(1, "a").with_timer(10), Step::new(2, "b").with_timer(50)]);
    h.state.start_timer(1, 10.0).unwrap();
    h.state.start_timer(2, 50.0).unwrap();

    h.clock.advance_secs(20);
    sleep(Duration::from_secs(1)).await;
    let timer = h.state.snapshot().timer;
    assert_eq!(timer.active_step_id, Some(2));
    assert_eq!(timer.mode, TimerMode::Running);
    assert_eq!(timer.remaining_seconds, 30.0);
}

#[tokio::test(start_paused = true)]
async fn reset_all_starts_over() {
    let h = harness(vec![Step::new(1, "a"), Step::new(2, "b").with_timer(5)]);
    h.state.toggle(1);
    h.clock.advance_secs(5);
    h.state.on_foreground();
    assert!(h.state.alarm_ringing().is_some());

    h.state.reset_all();
    let snapshot = h.state.snapshot();
    assert!(snapshot.steps().iter().all(|s| !s.completed));
    assert_eq!(snapshot.timer.mode, TimerMode::Idle);
    assert_eq!(h.state.alarm_ringing(), None);
}

#[tokio::test(start_paused = true)]
async fn completing_a_step_chimes_unless_muted() {
    let h = harness(vec![Step::new(1, "a"), Step::new(2, "b"), Step::new(3, "c")]);
    h.state.toggle(1);
    assert_eq!(h.sink.chimes.load(Ordering::SeqCst), 1);

    h.state.set_sound_enabled(false);
    h.state.toggle(2);
    assert_eq!(h.sink.chimes.load(Ordering::SeqCst), 1);

    // Reopening is not a completion
    h.state.set_sound_enabled(true);
    h.state.toggle(2);
    assert_eq!(h.sink.chimes.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn cold_start_rearms_persisted_alarm() {
    let mut session = CookingSession::new(
        Some("test".into()),
        vec![Step::new(1, "a").with_timer(30), Step::new(2, "b")],
    );
    let t0 = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    session.start_timer(1, 30.0, t0).unwrap();
    session.tick(t0 + chrono::TimeDelta::seconds(30));
    let store = MemoryStore::with_snapshot(session.snapshot());

    let restored = CookingSession::restore(store.load().unwrap().unwrap());
    let h = harness_with(restored);
    assert_eq!(h.state.alarm_ringing(), None);

    h.state.on_foreground();
    assert_eq!(h.state.alarm_ringing(), Some(1));
    sleep(Duration::from_secs(3)).await;
    assert!(h.sink.alarm_bursts.load(Ordering::SeqCst) >= 3);
}

#[tokio::test(start_paused = true)]
async fn cold_start_expires_countdown_that_ended_while_down() {
    let mut session = CookingSession::new(
        Some("test".into()),
        vec![Step::new(1, "a"), Step::new(2, "b").with_timer(30)],
    );
    let t0 = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    session.toggle(1, t0 - chrono::TimeDelta::seconds(600));

    let h = harness_with(CookingSession::restore(session.snapshot()));
    h.state.on_foreground();

    let snapshot = h.state.snapshot();
    assert_eq!(snapshot.timer.mode, TimerMode::Alarming);
    assert_eq!(h.state.alarm_ringing(), Some(2));
}

#[tokio::test]
async fn snapshots_are_persisted_in_the_background() {
    let h = harness(vec![Step::new(1, "a"), Step::new(2, "b")]);
    let store = Arc::new(MemoryStore::new());
    let _writer = h.state.persist_to(store.clone());

    h.state.toggle(1);

    let expected = h.state.snapshot();
    for _ in 0..100 {
        if store.saved().as_ref() == Some(&expected) {
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(store.saved(), Some(expected));
    assert!(store.writes() >= 1);
}

#[tokio::test(start_paused = true)]
async fn mute_survives_a_restart() {
    let h = harness(vec![Step::new(1, "a"), Step::new(2, "b")]);
    assert!(h.state.set_sound_enabled(false));
    assert!(!h.state.set_sound_enabled(false));

    let saved = h.state.snapshot();
    assert!(saved.muted);

    let restarted = harness_with(CookingSession::restore(saved));
    assert!(!restarted.state.sound_enabled());
    restarted.state.toggle(1);
    assert_eq!(restarted.sink.chimes.load(Ordering::SeqCst), 0);

    restarted.state.set_sound_enabled(true);
    assert!(!restarted.state.snapshot().muted);
    restarted.state.toggle(2);
    assert_eq!(restarted.sink.chimes.load(Ordering::SeqCst), 1);
}
