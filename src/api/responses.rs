//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Session, TimerState};

/// Session as reported to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub state: TimerState,
    pub is_break: bool,
    pub elapsed_seconds: f64,
    pub remaining_seconds: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl From<Session> for SessionView {
    fn from(session: Session) -> Self {
        Self {
            state: session.state,
            is_break: session.is_break,
            elapsed_seconds: session.interval.elapsed_seconds(),
            remaining_seconds: session.remaining_seconds().max(0.0),
            start_date: session.interval.start_date(),
            end_date: session.interval.end_date(),
        }
    }
}

/// API response structure for timer control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub session: SessionView,
}

impl ApiResponse {
    /// Create a response carrying the session after the command was applied
    pub fn new(message: String, session: Session) -> Self {
        Self {
            status: session.state.as_str().to_string(),
            message,
            timestamp: Utc::now(),
            session: session.into(),
        }
    }
}

/// Status response with server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub session: SessionView,
    pub errors: Vec<String>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
