//! Session controller
//!
//! `PomodoroTimer` adapts the engine's sink protocol into a uniform
//! start/pause/stop/skip API whose receivers get `Result<Session, TimerError>`.
//! Any engine failure forces a stop before it is surfaced.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::{Countdown, CountdownResult, CountdownSnapshot, Session, TimerState};
use crate::error::TimerError;

/// What session receivers get for every engine emission
pub type SessionResult = Result<Session, TimerError>;

/// Host-side wake alarm for the projected end of a running interval
pub trait WakeScheduler: Send + Sync {
    /// Arrange a wake-up `remaining_seconds` from now
    fn schedule(&self, remaining_seconds: f64, is_break: bool);

    /// Drop any pending wake-up
    fn cancel(&self);
}

/// Start/pause/stop/skip over a countdown engine
pub struct PomodoroTimer {
    countdown: Countdown,
    scheduler: Option<Arc<dyn WakeScheduler>>,
}

impl PomodoroTimer {
    pub fn new(countdown: Countdown) -> Self {
        Self {
            countdown,
            scheduler: None,
        }
    }

    /// Hand remaining time to `scheduler` on every running emission
    pub fn with_scheduler(mut self, scheduler: Arc<dyn WakeScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Start or resume the active interval; `receiver` replaces the registered one
    pub fn start<F>(&self, receiver: F) -> Result<(), TimerError>
    where
        F: FnMut(SessionResult) + Send + 'static,
    {
        let sink = self.session_sink(receiver);
        Ok(self.countdown.start(sink)?)
    }

    pub fn pause(&self) -> Result<(), TimerError> {
        Ok(self.countdown.pause()?)
    }

    pub fn stop(&self) -> Result<(), TimerError> {
        Ok(self.countdown.stop()?)
    }

    /// Switch between focus and break; `receiver` replaces the registered one
    pub fn skip<F>(&self, receiver: F) -> Result<(), TimerError>
    where
        F: FnMut(SessionResult) + Send + 'static,
    {
        let sink = self.session_sink(receiver);
        Ok(self.countdown.skip(sink)?)
    }

    /// Report remaining seconds of a running interval, e.g. right before suspension
    pub fn save_time<F>(&self, sink: F) -> Result<(), TimerError>
    where
        F: FnOnce(f64) + Send + 'static,
    {
        Ok(self.countdown.save_time(sink)?)
    }

    /// Current session snapshot
    pub fn session(&self) -> Session {
        Session::from(self.countdown.snapshot())
    }

    /// Session after every command issued so far has been applied
    pub async fn settle(&self) -> Result<Session, TimerError> {
        Ok(Session::from(self.countdown.settle().await?))
    }

    /// Watch engine snapshots as they are published
    pub fn subscribe(&self) -> watch::Receiver<CountdownSnapshot> {
        self.countdown.subscribe()
    }

    fn session_sink<F>(&self, mut receiver: F) -> impl FnMut(CountdownResult) + Send + 'static
    where
        F: FnMut(SessionResult) + Send + 'static,
    {
        let countdown = self.countdown.downgrade();
        let scheduler = self.scheduler.clone();

        move |result: CountdownResult| {
            let delivered = match result {
                Ok(snapshot) => {
                    let session = Session::from(snapshot);
                    if let Some(scheduler) = &scheduler {
                        match session.state {
                            TimerState::Running => {
                                scheduler.schedule(session.remaining_seconds(), session.is_break)
                            }
                            TimerState::Paused | TimerState::Stopped => scheduler.cancel(),
                        }
                    }
                    Ok(session)
                }
                Err(e) => {
                    warn!("Countdown failed, forcing stop: {}", e);
                    if let Some(countdown) = countdown.upgrade() {
                        if let Err(e) = countdown.stop() {
                            debug!("Forced stop not delivered: {}", e);
                        }
                    }
                    if let Some(scheduler) = &scheduler {
                        scheduler.cancel();
                    }
                    Err(TimerError::from(e))
                }
            };
            receiver(delivered);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::CountdownError,
        timer::{CountdownCore, Interval},
    };
    use chrono::{TimeZone, Utc};
    use std::{sync::Mutex, time::Duration};
    use tokio::{runtime::Handle, sync::mpsc, time};

    #[derive(Default)]
    struct RecordingScheduler {
        calls: Mutex<Vec<Option<(f64, bool)>>>,
    }

    impl WakeScheduler for RecordingScheduler {
        fn schedule(&self, remaining_seconds: f64, is_break: bool) {
            self.calls.lock().unwrap().push(Some((remaining_seconds, is_break)));
        }

        fn cancel(&self) {
            self.calls.lock().unwrap().push(None);
        }
    }

    fn interval(seconds: u64) -> Interval {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        Interval::starting_at(start, Duration::from_secs(seconds))
    }

    fn make_timer(increment: f64) -> PomodoroTimer {
        let core = CountdownCore::new(interval(1500), interval(300), increment);
        PomodoroTimer::new(Countdown::spawn(&Handle::current(), core, Duration::from_secs(1)).unwrap())
    }

    fn receiver() -> (
        impl FnMut(SessionResult) + Send + 'static,
        mpsc::UnboundedReceiver<SessionResult>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let on_result = move |result: SessionResult| {
            let _ = tx.send(result);
        };
        (on_result, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_delivers_focus_session() {
        let timer = make_timer(1.0);
        let (on_result, mut rx) = receiver();

        timer.start(on_result).unwrap();
        let session = rx.recv().await.unwrap().unwrap();

        assert_eq!(session.state, TimerState::Running);
        assert!(!session.is_break);
        assert_eq!(session.interval, interval(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_marks_break_and_back() {
        let timer = make_timer(1.0);
        let (on_result, mut rx) = receiver();

        timer.skip(on_result).unwrap();
        let session = rx.recv().await.unwrap().unwrap();
        assert!(session.is_break);
        assert_eq!(session.state, TimerState::Stopped);
        assert_eq!(session.interval, interval(300));

        let (on_result, mut rx) = receiver();
        timer.skip(on_result).unwrap();
        let session = rx.recv().await.unwrap().unwrap();
        assert!(!session.is_break);
        assert_eq!(timer.session(), session);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_and_stop_reuse_registered_receiver() {
        let timer = make_timer(1.0);
        let (on_result, mut rx) = receiver();

        timer.start(on_result).unwrap();
        time::sleep(Duration::from_millis(1500)).await;
        timer.pause().unwrap();
        timer.stop().unwrap();
        timer.settle().await.unwrap();

        let mut states = Vec::new();
        while let Ok(result) = rx.try_recv() {
            states.push(result.unwrap().state);
        }
        assert_eq!(
            states,
            vec![
                TimerState::Running,
                TimerState::Running,
                TimerState::Paused,
                TimerState::Stopped
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_engine_failure_forces_stop() {
        let timer = make_timer(f64::INFINITY);
        let (on_result, mut rx) = receiver();

        timer.start(on_result).unwrap();
        assert!(rx.recv().await.unwrap().is_ok());

        let failure = rx.recv().await.unwrap().unwrap_err();
        assert_eq!(failure.cause(), &CountdownError::NonFiniteElapsed);

        let session = timer.settle().await.unwrap();
        assert_eq!(session.state, TimerState::Stopped);
        assert_eq!(session.interval.elapsed_seconds(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_follows_running_and_stop() {
        let scheduler = Arc::new(RecordingScheduler::default());
        let timer = make_timer(1.0).with_scheduler(scheduler.clone());
        let (on_result, _rx) = receiver();

        timer.start(on_result).unwrap();
        time::sleep(Duration::from_millis(1500)).await;
        timer.stop().unwrap();
        timer.settle().await.unwrap();

        let calls = scheduler.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![Some((1500.0, false)), Some((1499.0, false)), None]);
    }
}
