//! Timer state, slot and session snapshot types

use serde::{Deserialize, Serialize};

use super::Interval;

/// Engine-observable timer state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    #[default]
    Stopped,
    Running,
    Paused,
}

impl TimerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Stopped => "stopped",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
        }
    }

    /// Check if the countdown is advancing
    pub fn is_running(&self) -> bool {
        matches!(self, TimerState::Running)
    }
}

/// One of the two alternating interval buffers owned by the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    #[default]
    Primary,
    Secondary,
}

impl Slot {
    pub(crate) fn index(self) -> usize {
        match self {
            Slot::Primary => 0,
            Slot::Secondary => 1,
        }
    }

    pub(crate) fn from_index(index: usize) -> Self {
        if index == 0 {
            Slot::Primary
        } else {
            Slot::Secondary
        }
    }

    /// The other slot
    pub fn other(self) -> Self {
        match self {
            Slot::Primary => Slot::Secondary,
            Slot::Secondary => Slot::Primary,
        }
    }
}

/// What the engine emits: the active interval, its state and which slot it lives in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountdownSnapshot {
    pub interval: Interval,
    pub state: TimerState,
    pub slot: Slot,
}

/// The unit persisted and restored: interval, state and whether the break slot is active
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Session {
    pub interval: Interval,
    pub state: TimerState,
    pub is_break: bool,
}

impl Session {
    pub fn new(interval: Interval, state: TimerState, is_break: bool) -> Self {
        Self {
            interval,
            state,
            is_break,
        }
    }

    /// The engine slot this session occupies; focus is primary, break is secondary
    pub fn slot(&self) -> Slot {
        if self.is_break {
            Slot::Secondary
        } else {
            Slot::Primary
        }
    }

    /// Seconds left in the session's interval
    pub fn remaining_seconds(&self) -> f64 {
        self.interval.remaining_seconds()
    }
}

impl From<CountdownSnapshot> for Session {
    fn from(snapshot: CountdownSnapshot) -> Self {
        Self {
            interval: snapshot.interval,
            state: snapshot.state,
            is_break: snapshot.slot == Slot::Secondary,
        }
    }
}
