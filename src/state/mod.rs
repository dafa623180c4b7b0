//! State management module
//!
//! This module contains the step sequence, the countdown, the chaining rule
//! that ties them together, and the runtime container that serializes every
//! mutation.

pub mod app_state;
mod chaining;
pub mod session;
pub mod snapshot;
pub mod step;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, SessionOptions};
pub use session::CookingSession;
pub use snapshot::{Progress, Snapshot};
pub use step::{Step, StepSequence};
pub use timer_state::{TickOutcome, TimerMode, TimerState};
