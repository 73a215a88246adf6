//! Suspend snapshot: report remaining time and persist the session

use anyhow::{Context, Result};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::{state::AppState, timer::Session};

/// Snapshot the timer before the process goes away.
///
/// Reports the remaining seconds of a running interval, then saves the full
/// session so the next start can resume it.
pub async fn suspend(state: &AppState) -> Result<Session> {
    let (remaining_tx, remaining_rx) = oneshot::channel();
    if let Err(e) = state.timer.save_time(move |remaining| {
        let _ = remaining_tx.send(remaining);
    }) {
        warn!("Could not ask timer for remaining time: {}", e);
    }

    let session = state
        .timer
        .settle()
        .await
        .unwrap_or_else(|e| {
            warn!("Timer unavailable at suspension, saving last snapshot: {}", e);
            state.timer.session()
        });

    // The engine has either answered or dropped the sink by now
    match remaining_rx.await {
        Ok(remaining) => info!(
            "Suspending with {:.1}s left in {} interval",
            remaining,
            if session.is_break { "break" } else { "focus" }
        ),
        Err(_) => debug!("Timer not running at suspension"),
    }

    state
        .local_timer
        .save(&session)
        .context("Failed to persist session on suspend; it may be lost")?;
    info!("Session saved ({} at {:.1}s)", session.state.as_str(), session.interval.elapsed_seconds());

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        store::{InMemoryTimerStore, LocalTimer},
        timer::{Countdown, CountdownCore, Interval, PomodoroTimer, TimerState},
    };
    use chrono::Utc;
    use std::{sync::Arc, time::Duration};
    use tokio::{runtime::Handle, time};

    fn app_state(local_timer: LocalTimer) -> Arc<AppState> {
        let now = Utc::now();
        let core = CountdownCore::new(
            Interval::starting_at(now, Duration::from_secs(1500)),
            Interval::starting_at(now, Duration::from_secs(300)),
            1.0,
        );
        let countdown = Countdown::spawn(&Handle::current(), core, Duration::from_secs(1)).unwrap();
        Arc::new(AppState::new(PomodoroTimer::new(countdown), local_timer, 0, "test".into()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_suspend_saves_running_progress() {
        let local_timer = LocalTimer::new(Arc::new(InMemoryTimerStore::new()));
        let state = app_state(local_timer.clone());

        state.start().unwrap();
        time::sleep(Duration::from_millis(4500)).await;
        let session = suspend(&state).await.unwrap();

        assert_eq!(session.state, TimerState::Running);
        assert_eq!(session.interval.elapsed_seconds(), 4.0);
        assert_eq!(local_timer.load().unwrap(), Some(session));
    }

    #[tokio::test(start_paused = true)]
    async fn test_suspend_while_stopped_still_saves() {
        let local_timer = LocalTimer::new(Arc::new(InMemoryTimerStore::new()));
        let state = app_state(local_timer.clone());

        let session = suspend(&state).await.unwrap();
        assert_eq!(session.state, TimerState::Stopped);
        assert_eq!(local_timer.load().unwrap(), Some(session));
    }
}
