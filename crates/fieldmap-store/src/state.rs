//! Store contents shared by every backend.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use fieldmap_model::{Mapping, MappingHistory, MappingUpdate, NewHistory, NewMapping};
use serde::{Deserialize, Serialize};

/// Every record held by a store, plus the next ids to hand out.
///
/// Ids start at 1 and are never reused, even after a delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    next_mapping_id: u64,
    next_history_id: u64,
    #[serde(default)]
    mappings: BTreeMap<u64, Mapping>,
    #[serde(default)]
    history: BTreeMap<u64, MappingHistory>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            next_mapping_id: 1,
            next_history_id: 1,
            mappings: BTreeMap::new(),
            history: BTreeMap::new(),
        }
    }
}

impl StoreState {
    pub(crate) fn create_mapping(&mut self, new: NewMapping, now: DateTime<Utc>) -> Mapping {
        let id = self.next_mapping_id;
        self.next_mapping_id += 1;
        let mapping = new.into_mapping(id, now);
        self.mappings.insert(id, mapping.clone());
        mapping
    }

    pub(crate) fn mapping(&self, id: u64) -> Option<&Mapping> {
        self.mappings.get(&id)
    }

    pub(crate) fn mappings(&self) -> impl Iterator<Item = &Mapping> {
        self.mappings.values()
    }

    pub(crate) fn update_mapping(&mut self, id: u64, update: MappingUpdate) -> Option<Mapping> {
        let mapping = self.mappings.get_mut(&id)?;
        update.apply_to(mapping);
        Some(mapping.clone())
    }

    pub(crate) fn delete_mapping(&mut self, id: u64) -> bool {
        self.mappings.remove(&id).is_some()
    }

    pub(crate) fn create_history(&mut self, new: NewHistory, now: DateTime<Utc>) -> MappingHistory {
        let id = self.next_history_id;
        self.next_history_id += 1;
        let history = new.into_history(id, now);
        self.history.insert(id, history.clone());
        history
    }

    pub(crate) fn history(&self, id: u64) -> Option<&MappingHistory> {
        self.history.get(&id)
    }

    pub(crate) fn history_for_mapping(&self, mapping_id: u64) -> impl Iterator<Item = &MappingHistory> {
        self.history
            .values()
            .filter(move |entry| entry.mapping_id == Some(mapping_id))
    }
}
