//! Host-side services the timer hands work to
//!
//! The countdown core never owns a wall-clock alarm; this module provides the
//! wake notification that fires when a running interval is due to end.

pub mod notifier;

// Re-export main types
pub use notifier::{send_notification, CommandWakeScheduler};
