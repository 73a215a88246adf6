//! Tomato Timer - a pomodoro countdown server
//!
//! This is the main entry point for the tomato-timer application.

use std::sync::Arc;
use anyhow::Context;
use chrono::Utc;
use tokio::{net::TcpListener, runtime::Handle};
use tracing::{error, info};

use tomato_timer::{
    api::create_router,
    config::Config,
    services::CommandWakeScheduler,
    state::AppState,
    store::{FileTimerStore, InMemoryTimerStore, LocalTimer, TimerStore},
    tasks::{resume_core, session_persistence_task, suspend},
    timer::{Countdown, PomodoroTimer},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("tomato_timer={},tower_http=info", config.log_level()))
        .init();

    config.validate()?;

    info!("Starting tomato-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, focus={}min, break={}min, tick={}s",
          config.host, config.port, config.focus, config.break_minutes, config.tick);

    // Single-record store for the session
    let store: Arc<dyn TimerStore> = match config.state_path() {
        Some(path) => {
            info!("Persisting session to {}", path.display());
            Arc::new(FileTimerStore::new(&path)
                .with_context(|| format!("Failed to open state file {}", path.display()))?)
        }
        None => {
            info!("Keeping session in memory only");
            Arc::new(InMemoryTimerStore::new())
        }
    };
    let local_timer = LocalTimer::new(store);

    // Rebuild the countdown from any saved session
    let plan = resume_core(
        &local_timer,
        config.focus_duration(),
        config.break_duration(),
        config.tick,
        Utc::now(),
    );
    let runtime = Handle::current();
    let countdown = Countdown::spawn(&runtime, plan.core, config.tick_period()?)
        .context("Failed to start countdown engine")?;

    let mut timer = PomodoroTimer::new(countdown);
    if !config.no_notify {
        timer = timer.with_scheduler(Arc::new(CommandWakeScheduler::new(
            config.notify_command.clone(),
            runtime.clone(),
        )));
    }

    // Create application state
    let state = Arc::new(AppState::new(timer, local_timer, config.port, config.host.clone()));

    // Start the session persistence background task
    let persistence_state = Arc::clone(&state);
    tokio::spawn(async move {
        session_persistence_task(persistence_state).await;
    });

    if plan.resume_running {
        info!("Resuming running session");
        state.start().context("Failed to resume running session")?;
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start  - Start or resume the current interval");
    info!("  POST /pause  - Pause the current interval");
    info!("  POST /stop   - Stop and reset the current interval");
    info!("  POST /skip   - Switch between focus and break");
    info!("  GET  /status - Current session and server status");
    info!("  GET  /health - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        signal = shutdown_signal() => {
            match signal {
                Ok(_) => info!("Shutdown signal received"),
                Err(e) => error!("Signal handling failed: {}", e),
            }
        }
    }

    // Snapshot the session so the next start can pick it up
    if let Err(e) = suspend(&state).await {
        error!("{:#}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
