//! Single-record session storage
//!
//! `TimerStore` is the contract the persistence adapter talks to; the store
//! holds at most one `PersistedSession` and is overwritten wholesale.

pub mod file_store;
pub mod local_timer;
pub mod memory_store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{IntervalError, StoreError},
    timer::{Interval, Session, TimerState},
};

pub use file_store::FileTimerStore;
pub use local_timer::{LocalTimer, Restore};
pub use memory_store::InMemoryTimerStore;

/// A store holding at most one persisted session
pub trait TimerStore: Send + Sync {
    /// The persisted record, if any
    fn retrieve(&self) -> Result<Option<PersistedSession>, StoreError>;

    /// Remove the persisted record; removing nothing is not an error
    fn delete_state(&self) -> Result<(), StoreError>;

    fn insert(&self, session: &PersistedSession) -> Result<(), StoreError>;
}

/// Timer state as written to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistedState {
    Stop,
    Pause,
    Running,
}

/// On-store record layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub elapsed_seconds: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub state: PersistedState,
    pub is_break: bool,
}

impl From<TimerState> for PersistedState {
    fn from(state: TimerState) -> Self {
        match state {
            TimerState::Stopped => PersistedState::Stop,
            TimerState::Paused => PersistedState::Pause,
            TimerState::Running => PersistedState::Running,
        }
    }
}

impl From<PersistedState> for TimerState {
    fn from(state: PersistedState) -> Self {
        match state {
            PersistedState::Stop => TimerState::Stopped,
            PersistedState::Pause => TimerState::Paused,
            PersistedState::Running => TimerState::Running,
        }
    }
}

impl From<&Session> for PersistedSession {
    fn from(session: &Session) -> Self {
        Self {
            elapsed_seconds: session.interval.elapsed_seconds(),
            start_date: session.interval.start_date(),
            end_date: session.interval.end_date(),
            state: session.state.into(),
            is_break: session.is_break,
        }
    }
}

impl TryFrom<PersistedSession> for Session {
    type Error = IntervalError;

    fn try_from(record: PersistedSession) -> Result<Self, Self::Error> {
        let interval = Interval::new(record.elapsed_seconds, record.start_date, record.end_date)?;
        Ok(Session::new(interval, record.state.into(), record.is_break))
    }
}
