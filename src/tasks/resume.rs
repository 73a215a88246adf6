//! Resume: rebuild the countdown from the persisted session on startup

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{info, warn};

use crate::{
    store::{LocalTimer, Restore},
    timer::{CountdownCore, Interval, TimerState},
};

/// How to bring the countdown back after a restart
#[derive(Debug, Clone)]
pub struct ResumePlan {
    pub core: CountdownCore,
    /// The saved session was running and should be started again
    pub resume_running: bool,
}

/// Build the countdown core from whatever the store holds.
///
/// Fresh focus and break intervals start at `now`. A persisted session with
/// time left replaces the interval of its slot; a finished one is discarded.
/// Store failures are logged and treated as "no prior session".
pub fn resume_core(
    local_timer: &LocalTimer,
    focus: Duration,
    rest: Duration,
    increment: f64,
    now: DateTime<Utc>,
) -> ResumePlan {
    let mut slots = [
        Interval::starting_at(now, focus),
        Interval::starting_at(now, rest),
    ];

    let restored = local_timer.restore().unwrap_or_else(|e| {
        warn!("Could not read persisted session, starting fresh: {}", e);
        Restore::NoRecord
    });

    let session = match restored {
        Restore::Active(session) => session,
        Restore::Stale(_) => {
            info!("Discarding finished session");
            if let Err(e) = local_timer.clear() {
                warn!("Failed to clear finished session: {}", e);
            }
            return fresh(slots, increment);
        }
        Restore::NoRecord => return fresh(slots, increment),
    };

    let slot = session.slot();
    slots[slot.index()] = session.interval;
    let [primary, secondary] = slots;

    info!(
        "Resuming {} {} interval at {:.1}s",
        session.state.as_str(),
        if session.is_break { "break" } else { "focus" },
        session.interval.elapsed_seconds()
    );

    ResumePlan {
        core: CountdownCore::new(primary, secondary, increment).with_active(slot, session.state),
        resume_running: session.state == TimerState::Running,
    }
}

fn fresh(slots: [Interval; 2], increment: f64) -> ResumePlan {
    let [primary, secondary] = slots;
    ResumePlan {
        core: CountdownCore::new(primary, secondary, increment),
        resume_running: false,
    }
}
