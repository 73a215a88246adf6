//! Interval value: one countdown session's elapsed/start/end triple

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::error::IntervalError;

/// Immutable snapshot of one countdown session.
///
/// `elapsed_seconds` is measured from `start_date`; the remaining time is
/// `end_date - (start_date + elapsed_seconds)` and goes to zero or below once
/// the interval is exhausted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    elapsed_seconds: f64,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
}

impl Interval {
    /// Create an interval, checking `end >= start` and a finite, non-negative elapsed time
    pub fn new(
        elapsed_seconds: f64,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Self, IntervalError> {
        if end_date < start_date {
            return Err(IntervalError::EndBeforeStart);
        }
        if !elapsed_seconds.is_finite() || elapsed_seconds < 0.0 {
            return Err(IntervalError::InvalidElapsed(elapsed_seconds));
        }

        Ok(Self {
            elapsed_seconds,
            start_date,
            end_date,
        })
    }

    /// A fresh interval of `length` starting at `start_date`
    pub fn starting_at(start_date: DateTime<Utc>, length: Duration) -> Self {
        let end_date = chrono::Duration::from_std(length)
            .ok()
            .and_then(|length| start_date.checked_add_signed(length))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            elapsed_seconds: 0.0,
            start_date,
            end_date,
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn end_date(&self) -> DateTime<Utc> {
        self.end_date
    }

    /// Same interval with `seconds` more elapsed
    pub fn adding(&self, seconds: f64) -> Self {
        Self {
            elapsed_seconds: self.elapsed_seconds + seconds,
            ..*self
        }
    }

    /// Same interval with no time elapsed
    pub fn reset(&self) -> Self {
        Self {
            elapsed_seconds: 0.0,
            ..*self
        }
    }

    /// Total length of the interval in seconds
    pub fn length_seconds(&self) -> f64 {
        (self.end_date - self.start_date)
            .to_std()
            .map(|length| length.as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Seconds left before the end date; zero or negative once exhausted
    pub fn remaining_seconds(&self) -> f64 {
        self.length_seconds() - self.elapsed_seconds
    }

    /// Whether any strictly positive time remains
    pub fn has_remaining(&self) -> bool {
        self.remaining_seconds() > 0.0
    }
}
