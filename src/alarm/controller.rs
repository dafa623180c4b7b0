//! Repeating alarm that rings until dismissed

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
    time::Duration,
};

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info, warn};

use super::sink::{AlertSink, ALARM_VIBRATION_PATTERN};
use crate::error::AlertError;

struct Ringing {
    step_id: u32,
    handle: JoinHandle<()>,
}

/// Owns the one repeating alarm task.
///
/// The alarm has no timeout. It keeps bursting at `interval` until `stop`
/// is called.
pub struct AlarmController {
    sink: Arc<dyn AlertSink>,
    interval: Duration,
    sound_enabled: Arc<AtomicBool>,
    ringing: Mutex<Option<Ringing>>,
}

impl AlarmController {
    pub fn new(sink: Arc<dyn AlertSink>, interval: Duration, sound_enabled: bool) -> Self {
        Self {
            sink,
            interval,
            sound_enabled: Arc::new(AtomicBool::new(sound_enabled)),
            ringing: Mutex::new(None),
        }
    }

    /// Start ringing for `step_id`. Already ringing for the same step is a no-op.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, step_id: u32) {
        let mut ringing = self.ringing.lock().unwrap_or_else(PoisonError::into_inner);
        if ringing.as_ref().is_some_and(|r| r.step_id == step_id) {
            return;
        }
        if let Some(previous) = ringing.take() {
            previous.handle.abort();
        }

        info!("Alarm ringing for step {}", step_id);
        let handle = tokio::spawn(alarm_task(
            Arc::clone(&self.sink),
            Arc::clone(&self.sound_enabled),
            self.interval,
            step_id,
        ));
        *ringing = Some(Ringing { step_id, handle });
    }

    /// Stop all alarm output. Returns false when nothing was ringing.
    pub fn stop(&self) -> bool {
        let stopped = self
            .ringing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match stopped {
            Some(ringing) => {
                ringing.handle.abort();
                report(self.sink.silence(), "silence");
                info!("Alarm stopped for step {}", ringing.step_id);
                true
            }
            None => false,
        }
    }

    pub fn ringing_step(&self) -> Option<u32> {
        self.ringing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|r| r.step_id)
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled.load(Ordering::Relaxed)
    }

    pub fn set_sound_enabled(&self, enabled: bool) {
        self.sound_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Step-completion chime, skipped when sound is off
    pub fn chime(&self) {
        if self.sound_enabled() {
            report(self.sink.chime(), "chime");
        }
    }
}

impl Drop for AlarmController {
    fn drop(&mut self) {
        if let Some(ringing) = self
            .ringing
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            ringing.handle.abort();
        }
    }
}

impl std::fmt::Debug for AlarmController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlarmController")
            .field("interval", &self.interval)
            .field("sound_enabled", &self.sound_enabled())
            .field("ringing_step", &self.ringing_step())
            .finish()
    }
}

async fn alarm_task(
    sink: Arc<dyn AlertSink>,
    sound_enabled: Arc<AtomicBool>,
    interval: Duration,
    step_id: u32,
) {
    report(
        sink.notify("Timer done", &format!("Step {} is ready. Dismiss the alarm to continue.", step_id)),
        "notification",
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut bursts: u64 = 0;

    loop {
        ticker.tick().await;
        bursts += 1;
        if sound_enabled.load(Ordering::Relaxed) {
            report(sink.sound_alarm(step_id), "alarm sound");
        }
        report(sink.vibrate(&ALARM_VIBRATION_PATTERN), "vibration");
        debug!("Alarm burst {} for step {}", bursts, step_id);
    }
}

fn report(result: Result<(), AlertError>, what: &str) {
    match result {
        Ok(()) => {}
        Err(AlertError::Unsupported(_)) => debug!("Skipping {}: not supported", what),
        Err(e) => warn!("Best-effort {} failed: {}", what, e),
    }
}
