//! Wake notification at the projected end of a running interval

use std::{sync::Mutex, time::Duration};
use tokio::{
    process::Command,
    runtime::Handle,
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tracing::{debug, info, warn};

use crate::timer::WakeScheduler;

/// Projected ends closer than this are treated as the same alarm
const RESCHEDULE_TOLERANCE: Duration = Duration::from_millis(500);

struct PendingWake {
    deadline: Instant,
    is_break: bool,
    task: JoinHandle<()>,
}

/// Runs a notification command once the running interval is due to end
pub struct CommandWakeScheduler {
    command: String,
    runtime: Handle,
    pending: Mutex<Option<PendingWake>>,
}

impl CommandWakeScheduler {
    pub fn new(command: impl Into<String>, runtime: Handle) -> Self {
        Self {
            command: command.into(),
            runtime,
            pending: Mutex::new(None),
        }
    }

    /// Deadline of the wake-up currently armed, if any
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.pending
            .lock()
            .ok()
            .and_then(|pending| pending.as_ref().map(|p| p.deadline))
    }
}

impl WakeScheduler for CommandWakeScheduler {
    fn schedule(&self, remaining_seconds: f64, is_break: bool) {
        let remaining = Duration::try_from_secs_f64(remaining_seconds.max(0.0)).unwrap_or_default();
        let deadline = Instant::now() + remaining;

        let mut pending = match self.pending.lock() {
            Ok(pending) => pending,
            Err(e) => {
                warn!("Failed to lock pending wake-up: {}", e);
                return;
            }
        };

        if let Some(current) = pending.as_ref() {
            let drift = if deadline > current.deadline {
                deadline - current.deadline
            } else {
                current.deadline - deadline
            };
            if current.is_break == is_break && drift < RESCHEDULE_TOLERANCE {
                return;
            }
        }
        if let Some(previous) = pending.take() {
            previous.task.abort();
        }

        debug!("Wake-up scheduled in {:.1}s (break={})", remaining.as_secs_f64(), is_break);
        let command = self.command.clone();
        let task = self.runtime.spawn(async move {
            sleep_until(deadline).await;
            if let Err(e) = send_notification(&command, is_break).await {
                warn!("Failed to send wake notification: {}", e);
            }
        });

        *pending = Some(PendingWake {
            deadline,
            is_break,
            task,
        });
    }

    fn cancel(&self) {
        match self.pending.lock() {
            Ok(mut pending) => {
                if let Some(previous) = pending.take() {
                    previous.task.abort();
                    debug!("Pending wake-up cancelled");
                }
            }
            Err(e) => warn!("Failed to lock pending wake-up: {}", e),
        }
    }
}

impl Drop for CommandWakeScheduler {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(previous) = pending.take() {
                previous.task.abort();
            }
        }
    }
}

/// Run the notification command for the end of a focus or break interval
pub async fn send_notification(command: &str, is_break: bool) -> Result<(), String> {
    let message = if is_break {
        "Break is over, time to focus"
    } else {
        "Focus interval finished, take a break"
    };
    info!("Sending wake notification: {}", message);

    let output = Command::new(command)
        .args(["Pomodoro", message])
        .output()
        .await
        .map_err(|e| format!("Failed to execute {}: {}", command, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{} failed: {}", command, stderr));
    }

    Ok(())
}
