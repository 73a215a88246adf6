//! In-process single-slot store, for runs that should not touch disk

use std::sync::Mutex;

use super::{PersistedSession, TimerStore};
use crate::error::StoreError;

#[derive(Debug, Default)]
pub struct InMemoryTimerStore {
    slot: Mutex<Option<PersistedSession>>,
}

impl InMemoryTimerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<PersistedSession>>, StoreError> {
        self.slot
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("Failed to lock timer state: {}", e)))
    }
}

impl TimerStore for InMemoryTimerStore {
    fn retrieve(&self) -> Result<Option<PersistedSession>, StoreError> {
        Ok(*self.lock()?)
    }

    fn delete_state(&self) -> Result<(), StoreError> {
        *self.lock()? = None;
        Ok(())
    }

    fn insert(&self, session: &PersistedSession) -> Result<(), StoreError> {
        *self.lock()? = Some(*session);
        Ok(())
    }
}
