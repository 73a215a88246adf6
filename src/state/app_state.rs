//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use crate::{
    error::TimerError,
    store::LocalTimer,
    timer::{PomodoroTimer, SessionResult, TimerState},
};

/// Main application state shared by the HTTP handlers and background tasks
pub struct AppState {
    /// Session controller driving the countdown engine
    pub timer: PomodoroTimer,
    /// Persistence adapter for suspend/resume
    pub local_timer: LocalTimer,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Errors reported by the timer or the store, for client visibility
    pub errors: Mutex<Vec<String>>,
}

impl AppState {
    pub fn new(timer: PomodoroTimer, local_timer: LocalTimer, port: u16, host: String) -> Self {
        Self {
            timer,
            local_timer,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            errors: Mutex::new(Vec::new()),
        }
    }

    /// Start or resume the current interval
    pub fn start(self: &Arc<Self>) -> Result<(), TimerError> {
        self.record_action("start");
        self.timer.start(self.session_receiver())
    }

    pub fn pause(&self) -> Result<(), TimerError> {
        self.record_action("pause");
        self.timer.pause()
    }

    pub fn stop(&self) -> Result<(), TimerError> {
        self.record_action("stop");
        self.timer.stop()
    }

    /// Switch between focus and break
    pub fn skip(self: &Arc<Self>) -> Result<(), TimerError> {
        self.record_action("skip");
        self.timer.skip(self.session_receiver())
    }

    /// Receiver registered with the timer; holds the state weakly so the engine
    /// never keeps the application alive
    fn session_receiver(self: &Arc<Self>) -> impl FnMut(SessionResult) + Send + 'static {
        let state = Arc::downgrade(self);
        let mut previous = None;

        move |result: SessionResult| {
            let Some(state) = state.upgrade() else {
                return;
            };

            match result {
                Ok(session) => {
                    let transition = (session.state, session.is_break);
                    if previous != Some(transition) {
                        info!(
                            "{} interval {} ({:.1}s remaining)",
                            if session.is_break { "Break" } else { "Focus" },
                            session.state.as_str(),
                            session.remaining_seconds().max(0.0)
                        );
                        previous = Some(transition);
                    } else if session.state == TimerState::Running {
                        debug!("Tick: {:.1}s elapsed", session.interval.elapsed_seconds());
                    }
                }
                Err(e) => {
                    error!("Timer error: {}", e);
                    state.add_error(e.to_string());
                }
            }
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Add an error to the state
    pub fn add_error(&self, error: String) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.push(error);
        }
    }

    /// Current errors
    pub fn get_errors(&self) -> Vec<String> {
        self.errors.lock().map(|errors| errors.clone()).unwrap_or_default()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
