//! Pomodoro countdown engine
//!
//! Leaves first: the `Interval` value, the pure `CountdownCore` state machine,
//! the tokio-driven `Countdown` engine and the `PomodoroTimer` session controller.

pub mod countdown;
pub mod driver;
pub mod interval;
pub mod pomodoro;
pub mod state;

pub use countdown::{CountdownCore, DEFAULT_INCREMENT};
pub use driver::{Countdown, CountdownResult, CountdownSink, WeakCountdown};
pub use interval::Interval;
pub use pomodoro::{PomodoroTimer, SessionResult, WakeScheduler};
pub use state::{CountdownSnapshot, Session, Slot, TimerState};
