//! Storage for saved mappings and conversion history.
//!
//! [`MappingStore`] is the storage seam. [`MemoryStore`] keeps records in
//! process memory; [`JsonFileStore`] persists the same records to a JSON
//! file after every change. The mapping engine itself never touches a store.

#![deny(unsafe_code)]

mod error;
mod file;
mod memory;
mod state;

use fieldmap_model::{Mapping, MappingHistory, MappingUpdate, NewHistory, NewMapping};

pub use error::{Result, StoreError};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use state::StoreState;

/// Saved mappings and their conversion history.
///
/// Ids are assigned by the store, start at 1, and increase monotonically.
pub trait MappingStore {
    fn create_mapping(&self, mapping: NewMapping) -> Result<Mapping>;

    fn get_mapping(&self, id: u64) -> Result<Option<Mapping>>;

    /// All mappings, ordered by id.
    fn list_mappings(&self) -> Result<Vec<Mapping>>;

    /// Merge `update` into an existing mapping. `None` when `id` is unknown.
    fn update_mapping(&self, id: u64, update: MappingUpdate) -> Result<Option<Mapping>>;

    /// Returns whether a mapping was removed. Its history is kept.
    fn delete_mapping(&self, id: u64) -> Result<bool>;

    fn create_history(&self, history: NewHistory) -> Result<MappingHistory>;

    fn get_history(&self, id: u64) -> Result<Option<MappingHistory>>;

    /// History entries for one mapping, oldest first.
    fn history_for_mapping(&self, mapping_id: u64) -> Result<Vec<MappingHistory>>;
}
