//! Error types shared across the timer engine and its persistence layer

use std::{io, path::PathBuf};
use thiserror::Error;

/// An interval whose fields violate `end >= start` or `elapsed >= 0`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntervalError {
    #[error("interval ends before it starts")]
    EndBeforeStart,

    #[error("elapsed seconds must be a finite, non-negative number, got {0}")]
    InvalidElapsed(f64),
}

/// Failures reported by the countdown engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CountdownError {
    /// The engine task is gone; nothing can drive the countdown any more
    #[error("countdown task is no longer running")]
    Terminated,

    #[error("tick produced a non-finite elapsed time")]
    NonFiniteElapsed,

    #[error("tick period must be longer than zero")]
    ZeroPeriod,
}

/// The single failure kind surfaced by the session controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("timer failed: {source}")]
pub struct TimerError {
    #[from]
    source: CountdownError,
}

impl TimerError {
    /// The engine failure behind this error
    pub fn cause(&self) -> &CountdownError {
        &self.source
    }
}

/// Failures of the single-record session store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read timer state at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write timer state at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to delete timer state at {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed timer state record: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("persisted timer state is invalid: {0}")]
    InvalidRecord(#[from] IntervalError),

    #[error("timer state store is unavailable: {0}")]
    Unavailable(String),
}
