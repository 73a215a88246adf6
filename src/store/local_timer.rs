//! Persistence adapter: saves and restores the session through a `TimerStore`

use std::sync::Arc;
use tracing::{debug, info};

use super::{PersistedSession, TimerStore};
use crate::{error::StoreError, timer::Session};

/// Outcome of looking for a prior session
#[derive(Debug, Clone, PartialEq)]
pub enum Restore {
    /// Nothing was persisted
    NoRecord,
    /// A session with time left
    Active(Session),
    /// A session whose interval has no time left
    Stale(Session),
}

#[derive(Clone)]
pub struct LocalTimer {
    store: Arc<dyn TimerStore>,
}

impl LocalTimer {
    pub fn new(store: Arc<dyn TimerStore>) -> Self {
        Self { store }
    }

    /// Replace the persisted record with `session`.
    ///
    /// The old record is deleted before the new one is inserted. If the insert
    /// fails the store is left empty: treat an error here as "state possibly
    /// lost", not "state unchanged".
    pub fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.store.delete_state()?;
        self.store.insert(&PersistedSession::from(session))?;
        debug!(
            "Saved {} session ({:.1}s elapsed, break={})",
            session.state.as_str(),
            session.interval.elapsed_seconds(),
            session.is_break
        );
        Ok(())
    }

    /// The persisted session, or `None` when nothing was saved
    pub fn load(&self) -> Result<Option<Session>, StoreError> {
        match self.store.retrieve()? {
            Some(record) => Ok(Some(Session::try_from(record)?)),
            None => Ok(None),
        }
    }

    /// Load and classify the persisted session
    pub fn restore(&self) -> Result<Restore, StoreError> {
        let restored = match self.load()? {
            None => Restore::NoRecord,
            Some(session) if session.interval.has_remaining() => Restore::Active(session),
            Some(session) => Restore::Stale(session),
        };

        match &restored {
            Restore::NoRecord => info!("No prior timer session"),
            Restore::Active(session) => info!(
                "Found {} session with {:.1}s remaining",
                session.state.as_str(),
                session.remaining_seconds()
            ),
            Restore::Stale(_) => info!("Found a finished timer session"),
        }

        Ok(restored)
    }

    /// Drop the persisted record
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.delete_state()
    }
}
