//! Tomato Timer - a pomodoro countdown engine with suspend-safe persistence
//!
//! The core is a two-slot countdown (focus and break) driven by a fixed tick,
//! wrapped by a session controller and backed by a single-record store. The
//! server binary exposes it over HTTP and saves/restores the session across
//! restarts.

pub mod config;
pub mod error;
pub mod timer;
pub mod store;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{CountdownError, IntervalError, StoreError, TimerError};
pub use state::AppState;
pub use api::create_router;
pub use timer::{Countdown, CountdownCore, Interval, PomodoroTimer, Session, TimerState};
pub use store::{FileTimerStore, InMemoryTimerStore, LocalTimer, TimerStore};
pub use utils::signals::shutdown_signal;
