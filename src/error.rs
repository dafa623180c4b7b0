//! Error types for the cooking core
//!
//! Guard rejections are not errors: operations that would break an invariant
//! are ignored and reported through a `false` return or an empty event list.
//! The types here cover invalid input and best-effort boundaries only.

use std::path::PathBuf;
use thiserror::Error;

/// Rejected timer input. The timer state is never mutated when this is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum TimerError {
    #[error("timer duration must be a positive number of seconds, got {0}")]
    NonPositiveDuration(f64),
}

/// Snapshot persistence failures. Logged and swallowed by the writer task.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to access snapshot file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Recipe shape problems found on import or activation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecipeError {
    #[error("recipe '{0}' has no steps")]
    Empty(String),

    #[error("recipe '{recipe}' repeats step id {step_id}")]
    DuplicateStep { recipe: String, step_id: u32 },

    #[error("no recipe with id '{0}'")]
    NotFound(String),
}

/// Best-effort alert output failure (audio blocked, no haptics, notification denied).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlertError {
    #[error("{0} output is not available on this host")]
    Unsupported(&'static str),

    #[error("alert output failed: {0}")]
    Failed(String),
}
