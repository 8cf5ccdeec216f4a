//! JSON file store.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use fieldmap_model::{Mapping, MappingHistory, MappingUpdate, NewHistory, NewMapping};
use tracing::{debug, info};

use crate::MappingStore;
use crate::error::{Result, StoreError};
use crate::memory::MemoryStore;
use crate::state::StoreState;

/// Store persisted to a single JSON file.
///
/// The whole state is rewritten after every mutation that changes it. A mutation whose
/// write fails leaves both the file and the in-memory state unchanged.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing or empty file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = load_state(&path)?;
        Ok(Self {
            path,
            inner: MemoryStore::from_state(state),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the state, persist it, then commit it.
    /// A change that leaves the state as it was writes nothing.
    fn mutate<R>(&self, change: impl FnOnce(&mut StoreState) -> R) -> Result<R> {
        let mut state = self.inner.write();
        let mut next = state.clone();
        let result = change(&mut next);
        if next == *state {
            debug!(path = %self.path.display(), "store unchanged; skipping write");
            return Ok(result);
        }
        save_state(&next, &self.path)?;
        *state = next;
        Ok(result)
    }
}

impl MappingStore for JsonFileStore {
    fn create_mapping(&self, mapping: NewMapping) -> Result<Mapping> {
        self.mutate(|state| state.create_mapping(mapping, Utc::now()))
    }

    fn get_mapping(&self, id: u64) -> Result<Option<Mapping>> {
        self.inner.get_mapping(id)
    }

    fn list_mappings(&self) -> Result<Vec<Mapping>> {
        self.inner.list_mappings()
    }

    fn update_mapping(&self, id: u64, update: MappingUpdate) -> Result<Option<Mapping>> {
        self.mutate(|state| state.update_mapping(id, update))
    }

    fn delete_mapping(&self, id: u64) -> Result<bool> {
        self.mutate(|state| state.delete_mapping(id))
    }

    fn create_history(&self, history: NewHistory) -> Result<MappingHistory> {
        self.mutate(|state| state.create_history(history, Utc::now()))
    }

    fn get_history(&self, id: u64) -> Result<Option<MappingHistory>> {
        self.inner.get_history(id)
    }

    fn history_for_mapping(&self, mapping_id: u64) -> Result<Vec<MappingHistory>> {
        self.inner.history_for_mapping(mapping_id)
    }
}

fn load_state(path: &Path) -> Result<StoreState> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "store file not found; starting empty");
            return Ok(StoreState::default());
        }
        Err(source) => {
            return Err(StoreError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if text.trim().is_empty() {
        return Ok(StoreState::default());
    }
    serde_json::from_str(&text).map_err(|source| StoreError::Deserialization {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `state` to `path` through a temp file and rename.
fn save_state(state: &StoreState, path: &Path) -> Result<()> {
    let bytes =
        serde_json::to_vec_pretty(state).map_err(|source| StoreError::Serialization { source })?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            operation: "create directory for",
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = path.with_extension("json.tmp");
    let mut file = File::create(&temp_path).map_err(|source| StoreError::Io {
        operation: "create",
        path: temp_path.clone(),
        source,
    })?;
    file.write_all(&bytes).map_err(|source| StoreError::Io {
        operation: "write",
        path: temp_path.clone(),
        source,
    })?;
    file.sync_all().map_err(|source| StoreError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source,
    })?;

    fs::rename(&temp_path, path).map_err(|source| StoreError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), "saved mapping store");
    Ok(())
}
