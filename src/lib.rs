//! Cook Along - a guided cooking session with wall-clock timers
//!
//! This library walks a user through an ordered list of cooking steps. Steps
//! must be completed in order; a step may carry a timed wait whose countdown
//! is anchored to wall-clock time, survives suspension and restarts, and ends
//! in a sticky alarm that blocks progress until dismissed. Completing a step
//! automatically starts the next step's timer when it has one.

pub mod alarm;
pub mod clock;
pub mod error;
pub mod events;
pub mod persistence;
pub mod recipe;
pub mod state;
pub mod tasks;
pub mod utils;

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod config;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use events::CookingEvent;
pub use state::{AppState, CookingSession, SessionOptions, Snapshot, Step, TimerMode, TimerState};

#[cfg(feature = "server")]
pub use api::create_router;
#[cfg(feature = "server")]
pub use config::Config;
