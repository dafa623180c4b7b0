//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::{recipe::builtin::CHICKEN_CURRY_ID, state::SessionOptions};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "cook-along")]
#[command(about = "Step-by-step cooking guide with persistent timers and alarms")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding the saved session (defaults to the platform data dir)
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// JSON file with an array of recipes to add to the library
    #[arg(long)]
    pub recipes: Option<PathBuf>,

    /// Recipe to start with when there is no saved session
    #[arg(long, default_value = CHICKEN_CURRY_ID)]
    pub recipe: String,

    /// Countdown refresh interval in milliseconds
    #[arg(long, default_value = "250")]
    pub tick_ms: u64,

    /// Gap between alarm bursts in milliseconds
    #[arg(long, default_value = "900")]
    pub alarm_interval_ms: u64,

    /// How often to check for host suspension, in seconds
    #[arg(long, default_value = "5")]
    pub wake_check_secs: u64,

    /// Disable chime and alarm sounds
    #[arg(long)]
    pub mute: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Where the session snapshot lives
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("cook-along")
        })
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            tick_interval: Duration::from_millis(self.tick_ms.max(1)),
            alarm_interval: Duration::from_millis(self.alarm_interval_ms.max(1)),
            sound_enabled: !self.mute,
        }
    }

    pub fn wake_check_interval(&self) -> Duration {
        Duration::from_secs(self.wake_check_secs.max(1))
    }
}
