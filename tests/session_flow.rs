//! End-to-end: run a focus interval, suspend to disk, resume in a fresh engine

use std::{sync::Arc, time::Duration};
use chrono::Utc;
use tokio::{runtime::Handle, sync::mpsc, time};

use tomato_timer::{
    store::{FileTimerStore, LocalTimer},
    tasks::{resume_core, suspend},
    timer::{Countdown, PomodoroTimer, Slot, TimerState},
    AppState,
};

const FOCUS: Duration = Duration::from_secs(60);
const REST: Duration = Duration::from_secs(10);

fn app_state(local_timer: LocalTimer) -> (Arc<AppState>, bool) {
    let plan = resume_core(&local_timer, FOCUS, REST, 1.0, Utc::now());
    let countdown = Countdown::spawn(&Handle::current(), plan.core, Duration::from_secs(1)).unwrap();
    let state = Arc::new(AppState::new(
        PomodoroTimer::new(countdown),
        local_timer,
        0,
        "test".to_string(),
    ));
    (state, plan.resume_running)
}

#[tokio::test(start_paused = true)]
async fn test_running_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let local_timer = LocalTimer::new(Arc::new(FileTimerStore::new(&path).unwrap()));

    let (state, resume_running) = app_state(local_timer.clone());
    assert!(!resume_running);

    state.start().unwrap();
    time::sleep(Duration::from_millis(20_500)).await;
    let saved = suspend(&state).await.unwrap();
    assert_eq!(saved.interval.elapsed_seconds(), 20.0);
    drop(state);

    let (state, resume_running) = app_state(local_timer.clone());
    assert!(resume_running);
    assert_eq!(state.timer.session().state, TimerState::Paused);
    assert_eq!(state.timer.session().interval, saved.interval);

    state.start().unwrap();
    time::sleep(Duration::from_millis(5_500)).await;
    let session = state.timer.settle().await.unwrap();
    assert_eq!(session.state, TimerState::Running);
    assert_eq!(session.interval.elapsed_seconds(), 25.0);
}

#[tokio::test(start_paused = true)]
async fn test_focus_runs_out_then_break_is_skipped_to() {
    let dir = tempfile::tempdir().unwrap();
    let local_timer = LocalTimer::new(Arc::new(
        FileTimerStore::new(&dir.path().join("session.json")).unwrap(),
    ));
    let plan = resume_core(&local_timer, FOCUS, REST, 1.0, Utc::now());
    let countdown = Countdown::spawn(&Handle::current(), plan.core, Duration::from_secs(1)).unwrap();
    let timer = PomodoroTimer::new(countdown);

    let (tx, mut rx) = mpsc::unbounded_channel();
    timer
        .start(move |result| {
            let _ = tx.send(result);
        })
        .unwrap();

    let mut stopped = 0;
    let mut last_elapsed = -1.0;
    for _ in 0..=60 {
        let session = rx.recv().await.unwrap().unwrap();
        assert!(session.interval.elapsed_seconds() >= last_elapsed);
        last_elapsed = session.interval.elapsed_seconds();
        if session.state == TimerState::Stopped {
            stopped += 1;
        }
    }
    assert_eq!(stopped, 1);
    assert_eq!(last_elapsed, 60.0);

    let (tx, mut rx) = mpsc::unbounded_channel();
    timer
        .skip(move |result| {
            let _ = tx.send(result);
        })
        .unwrap();
    let session = rx.recv().await.unwrap().unwrap();
    assert!(session.is_break);
    assert_eq!(session.slot(), Slot::Secondary);
    assert_eq!(session.remaining_seconds(), 10.0);
}
