//! JSON file-backed session store
//!
//! The record lives in a single file; deleting removes the file.

use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::debug;

use super::{PersistedSession, TimerStore};
use crate::error::StoreError;

pub struct FileTimerStore {
    path: PathBuf,
}

impl FileTimerStore {
    /// Use `path` for the record, creating its parent directory
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl TimerStore for FileTimerStore {
    fn retrieve(&self) -> Result<Option<PersistedSession>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&content)?))
    }

    fn delete_state(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed timer state at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Delete {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn insert(&self, session: &PersistedSession) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!("Wrote timer state to {}", self.path.display());
        Ok(())
    }
}
