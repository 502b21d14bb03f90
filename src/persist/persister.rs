use super::envelope::{self, STORE_KEY};
use super::{SharedStorage, StorageError};
use crate::state::{Action, StoreState, Subscriber};
use log::*;

/// Bridges the store and its storage: reads the persisted state at start-up
/// and writes the envelope after each transition.
///
#[derive(Clone)]
pub struct Persister {
    storage: SharedStorage,
    key: String,
}

impl Persister {
    pub fn new(storage: SharedStorage) -> Persister {
        Persister::with_key(storage, STORE_KEY)
    }

    pub fn with_key(storage: SharedStorage, key: impl Into<String>) -> Persister {
        Persister {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    /// Load the persisted state. Missing, unreadable, or malformed data all
    /// give an empty state; the result is always marked hydrated.
    ///
    pub fn hydrate(&self) -> StoreState {
        let state = match self.load() {
            Ok(Some(state)) => {
                info!("Loaded {} form(s) from storage", state.forms().len());
                state
            }
            Ok(None) => {
                debug!("No persisted store under '{}'", self.key);
                StoreState::default()
            }
            Err(e) => {
                error!("Error loading persisted store: {}", e);
                StoreState::default()
            }
        };
        state.reduce(Action::MarkHydrated)
    }

    /// Read and decode the persisted state, if any.
    ///
    pub fn load(&self) -> Result<Option<StoreState>, StorageError> {
        match self.storage.get_item(&self.key)? {
            Some(raw) => envelope::decode(&raw).map(Some),
            None => Ok(None),
        }
    }

    pub fn save(&self, state: &StoreState) -> Result<(), StorageError> {
        let raw = envelope::encode(state)?;
        self.storage.set_item(&self.key, &raw)?;
        debug!("Persisted {} form(s)", state.forms().len());
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_item(&self.key)
    }
}

/// Write-through persistence. Failures are logged and the in-memory state
/// stays authoritative until the next successful write.
///
impl Subscriber for Persister {
    fn notify(&mut self, state: &StoreState) {
        if let Err(e) = self.save(state) {
            error!("Failed to persist store: {}", e);
        }
    }
}
