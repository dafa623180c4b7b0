//! Cook Along - step-by-step cooking guide with persistent timers
//!
//! This is the host binary: it restores the saved session, drives the
//! countdown and alarm, and serves the session operations over HTTP.

use std::{fs, sync::Arc};

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use cook_along::{
    alarm::TerminalAlertSink,
    api::create_router,
    clock::SystemClock,
    config::Config,
    persistence::{load_or_none, JsonFileStore, SnapshotStore, SNAPSHOT_KEY},
    recipe::{Recipe, RecipeLibrary, RecipeProvider},
    state::{AppState, CookingSession},
    tasks::wake_up_recovery_task,
    utils::shutdown_signal,
};

fn load_library(config: &Config) -> anyhow::Result<RecipeLibrary> {
    let mut library = RecipeLibrary::with_builtin();
    if let Some(path) = &config.recipes {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recipes from {}", path.display()))?;
        let recipes: Vec<Recipe> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid recipe file {}", path.display()))?;
        for recipe in recipes {
            let id = recipe.id.clone();
            if let Err(e) = library.import(recipe) {
                warn!("Skipping recipe '{}': {}", id, e);
            }
        }
    }
    Ok(library)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("cook_along={},tower_http=info", config.log_level()))
        .init();

    info!("Starting cook-along v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, tick={}ms, alarm every {}ms, mute={}",
        config.host, config.port, config.tick_ms, config.alarm_interval_ms, config.mute
    );

    let library = load_library(&config)?;
    let store: Arc<dyn SnapshotStore> =
        Arc::new(JsonFileStore::in_dir(config.state_dir(), SNAPSHOT_KEY));

    let session = match load_or_none(store.as_ref()) {
        Some(snapshot) => {
            info!("Resuming saved session ({} steps)", snapshot.steps().len());
            CookingSession::restore(snapshot)
        }
        None => {
            let recipe = library
                .recipe(&config.recipe)
                .with_context(|| format!("Unknown recipe '{}'", config.recipe))?;
            info!("Starting new session with recipe '{}'", recipe.id);
            CookingSession::new(Some(recipe.id.clone()), recipe.to_steps())
        }
    };

    let state = AppState::new(
        session,
        library,
        Arc::new(SystemClock),
        Arc::new(TerminalAlertSink),
        config.session_options(),
    );

    // Re-anchor a persisted countdown and re-arm a persisted alarm
    state.on_foreground();
    let _writer = state.persist_to(Arc::clone(&store));

    let wake_state = Arc::clone(&state);
    let wake_every = config.wake_check_interval();
    tokio::spawn(async move {
        wake_up_recovery_task(wake_state, wake_every).await;
    });

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /status                 - Steps, timer and progress");
    info!("  POST /steps/:id/toggle       - Complete or reopen a step");
    info!("  POST /alarm/:id/dismiss      - Stop the alarm and continue");
    info!("  POST /timer/pause|resume|reset");
    info!("  POST /reset                  - Start over");
    info!("  POST /recipes/:id/activate   - Switch recipe");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Flush the final state synchronously; the writer may be mid-cycle
    if let Err(e) = store.save(&state.snapshot()) {
        warn!("Failed to save session on shutdown: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
