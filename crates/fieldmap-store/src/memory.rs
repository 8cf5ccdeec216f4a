//! In-memory store.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use fieldmap_model::{Mapping, MappingHistory, MappingUpdate, NewHistory, NewMapping};

use crate::MappingStore;
use crate::error::Result;
use crate::state::StoreState;

/// Store that keeps every record in process memory.
///
/// Writers are serialized by an [`RwLock`]; concurrent updates to the same
/// record are last-write-wins.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: StoreState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> StoreState {
        self.read().clone()
    }

    // Poisoning is ignored: no state mutation panics partway through.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MappingStore for MemoryStore {
    fn create_mapping(&self, mapping: NewMapping) -> Result<Mapping> {
        Ok(self.write().create_mapping(mapping, Utc::now()))
    }

    fn get_mapping(&self, id: u64) -> Result<Option<Mapping>> {
        Ok(self.read().mapping(id).cloned())
    }

    fn list_mappings(&self) -> Result<Vec<Mapping>> {
        Ok(self.read().mappings().cloned().collect())
    }

    fn update_mapping(&self, id: u64, update: MappingUpdate) -> Result<Option<Mapping>> {
        Ok(self.write().update_mapping(id, update))
    }

    fn delete_mapping(&self, id: u64) -> Result<bool> {
        Ok(self.write().delete_mapping(id))
    }

    fn create_history(&self, history: NewHistory) -> Result<MappingHistory> {
        Ok(self.write().create_history(history, Utc::now()))
    }

    fn get_history(&self, id: u64) -> Result<Option<MappingHistory>> {
        Ok(self.read().history(id).cloned())
    }

    fn history_for_mapping(&self, mapping_id: u64) -> Result<Vec<MappingHistory>> {
        Ok(self.read().history_for_mapping(mapping_id).cloned().collect())
    }
}
