use crate::error::StorageError;
use crate::storage::Storage;
use lexdec_core::Trial;
use tracing::{debug, warn};

/// Well-known key of the completed run's trial list.
pub const SESSION_KEY: &str = "lexdec-session-trials";

/// Holds at most one completed run, last write wins.
#[derive(Debug, Clone)]
pub struct SessionStore<S: Storage> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn save(&mut self, trials: &[Trial]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(trials)?;
        self.storage.set(SESSION_KEY, &raw)?;
        debug!(trials = trials.len(), "session saved");
        Ok(())
    }

    /// The saved trials, or `None` when nothing usable is stored.
    pub fn load(&self) -> Option<Vec<Trial>> {
        let raw = match self.storage.get(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "session storage unreadable");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(trials) => Some(trials),
            Err(e) => {
                debug!(error = %e, "discarding malformed session record");
                None
            }
        }
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove(SESSION_KEY)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }
}
