//! Countdown state machine
//!
//! Owns the two alternating interval buffers and applies start/pause/stop/skip
//! and tick transitions. It knows nothing about scheduling: the engine task in
//! `driver` decides when ticks happen and where emissions go.

use tracing::debug;

use super::{CountdownSnapshot, Interval, Slot, TimerState};
use crate::error::CountdownError;

/// Seconds added to elapsed time per tick unless told otherwise
pub const DEFAULT_INCREMENT: f64 = 1.0;

/// Two interval slots, the index of the active one, and the current state
#[derive(Debug, Clone)]
pub struct CountdownCore {
    slots: [Interval; 2],
    current: usize,
    state: TimerState,
    increment: f64,
}

impl CountdownCore {
    /// Create a stopped countdown with `primary` active and `secondary` queued
    pub fn new(primary: Interval, secondary: Interval, increment: f64) -> Self {
        Self {
            slots: [primary, secondary],
            current: 0,
            state: TimerState::Stopped,
            increment,
        }
    }

    /// Same as `new`, advancing by `DEFAULT_INCREMENT` per tick
    pub fn with_default_increment(primary: Interval, secondary: Interval) -> Self {
        Self::new(primary, secondary, DEFAULT_INCREMENT)
    }

    /// Make `slot` the active buffer with the given state.
    ///
    /// `Running` is restored as `Paused`; there is no live tick until `start`.
    pub fn with_active(mut self, slot: Slot, state: TimerState) -> Self {
        self.current = slot.index();
        self.state = match state {
            TimerState::Running => TimerState::Paused,
            other => other,
        };
        self
    }

    pub fn current(&self) -> &Interval {
        &self.slots[self.current]
    }

    /// The buffer that becomes active on the next skip
    pub fn queued(&self) -> &Interval {
        &self.slots[1 - self.current]
    }

    pub fn slot(&self) -> Slot {
        Slot::from_index(self.current)
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn snapshot(&self) -> CountdownSnapshot {
        CountdownSnapshot {
            interval: *self.current(),
            state: self.state,
            slot: self.slot(),
        }
    }

    /// Remaining seconds of the active interval
    pub fn remaining_seconds(&self) -> f64 {
        self.current().remaining_seconds()
    }

    /// Enter `Running`. Returns `None` when the active interval is already exhausted.
    pub fn start(&mut self) -> Option<CountdownSnapshot> {
        if !self.current().has_remaining() {
            debug!("Start ignored, current interval has no time left");
            return None;
        }
        self.state = TimerState::Running;
        Some(self.snapshot())
    }

    /// Freeze elapsed time. A second pause emits nothing.
    pub fn pause(&mut self) -> Option<CountdownSnapshot> {
        if self.state == TimerState::Paused {
            return None;
        }
        self.state = TimerState::Paused;
        Some(self.snapshot())
    }

    /// Reset the active interval's elapsed time and stop. Stopping a reset, stopped
    /// countdown emits nothing.
    pub fn stop(&mut self) -> Option<CountdownSnapshot> {
        if self.state == TimerState::Stopped && self.current().elapsed_seconds() == 0.0 {
            return None;
        }
        self.slots[self.current] = self.current().reset();
        self.state = TimerState::Stopped;
        Some(self.snapshot())
    }

    /// Zero the active interval, then flip to the queued one and stop
    pub fn skip(&mut self) -> CountdownSnapshot {
        self.slots[self.current] = self.current().reset();
        self.current = 1 - self.current;
        self.state = TimerState::Stopped;
        self.snapshot()
    }

    /// Advance the active interval by one increment.
    ///
    /// Stops on the tick where no strictly positive time remains. Returns `None`
    /// when the countdown is not running.
    pub fn tick(&mut self) -> Option<Result<CountdownSnapshot, CountdownError>> {
        if !self.state.is_running() {
            return None;
        }

        let advanced = self.current().adding(self.increment);
        if !advanced.elapsed_seconds().is_finite() {
            self.slots[self.current] = self.current().reset();
            self.state = TimerState::Stopped;
            return Some(Err(CountdownError::NonFiniteElapsed));
        }

        self.slots[self.current] = advanced;
        if !advanced.has_remaining() {
            self.state = TimerState::Stopped;
        }
        Some(Ok(self.snapshot()))
    }
}
