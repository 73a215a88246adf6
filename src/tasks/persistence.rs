//! Session persistence background task

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::{state::AppState, timer::Session};

/// Save the session whenever its state or active slot changes.
///
/// Ticks alone do not trigger a save; the suspend path writes the final
/// elapsed time on shutdown.
pub async fn session_persistence_task(state: Arc<AppState>) {
    info!("Starting session persistence task");

    let mut snapshots = state.timer.subscribe();
    let mut persisted = {
        let snapshot = snapshots.borrow_and_update();
        (snapshot.state, snapshot.slot)
    };

    while snapshots.changed().await.is_ok() {
        let snapshot = *snapshots.borrow_and_update();
        let transition = (snapshot.state, snapshot.slot);
        if transition == persisted {
            continue;
        }

        let session = Session::from(snapshot);
        match state.local_timer.save(&session) {
            Ok(()) => {
                debug!("Persisted {} session", session.state.as_str());
                persisted = transition;
            }
            Err(e) => {
                error!("Failed to persist session: {}", e);
                state.add_error(format!("Session save failed: {}", e));
            }
        }
    }

    debug!("Session persistence task finished");
}
