//! Persisted mapping and history records.
//!
//! These shapes belong to the storage collaborator; the engine only reads
//! and writes the embedded [`MappingConfig`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::SourceFormat;
use crate::mapping::MappingConfig;

fn default_target_format() -> String {
    "JSON".to_string()
}

/// A saved, named mapping definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source_format: SourceFormat,
    #[serde(default = "default_target_format")]
    pub target_format: String,
    pub mapping_config: MappingConfig,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for [`Mapping`]; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMapping {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub source_format: SourceFormat,
    #[serde(default = "default_target_format")]
    pub target_format: String,
    pub mapping_config: MappingConfig,
}

impl NewMapping {
    pub fn new(
        name: impl Into<String>,
        source_format: SourceFormat,
        mapping_config: MappingConfig,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            source_format,
            target_format: default_target_format(),
            mapping_config,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn into_mapping(self, id: u64, created_at: DateTime<Utc>) -> Mapping {
        Mapping {
            id,
            name: self.name,
            description: self.description,
            source_format: self.source_format,
            target_format: self.target_format,
            mapping_config: self.mapping_config,
            created_at,
        }
    }
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source_format: Option<SourceFormat>,
    #[serde(default)]
    pub target_format: Option<String>,
    #[serde(default)]
    pub mapping_config: Option<MappingConfig>,
}

impl MappingUpdate {
    /// Merge this update into an existing record.
    pub fn apply_to(self, mapping: &mut Mapping) {
        if let Some(name) = self.name {
            mapping.name = name;
        }
        if let Some(description) = self.description {
            mapping.description = Some(description);
        }
        if let Some(source_format) = self.source_format {
            mapping.source_format = source_format;
        }
        if let Some(target_format) = self.target_format {
            mapping.target_format = target_format;
        }
        if let Some(config) = self.mapping_config {
            mapping.mapping_config = config;
        }
    }
}

/// Outcome of one conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingHistory {
    pub id: u64,
    pub mapping_id: Option<u64>,
    pub source_file_name: Option<String>,
    pub target_file_name: Option<String>,
    pub processed_at: DateTime<Utc>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Insert payload for [`MappingHistory`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHistory {
    pub mapping_id: Option<u64>,
    pub source_file_name: Option<String>,
    pub target_file_name: Option<String>,
    pub success: bool,
    pub error_message: Option<String>,
}

impl NewHistory {
    #[must_use]
    pub fn into_history(self, id: u64, processed_at: DateTime<Utc>) -> MappingHistory {
        MappingHistory {
            id,
            mapping_id: self.mapping_id,
            source_file_name: self.source_file_name,
            target_file_name: self.target_file_name,
            processed_at,
            success: self.success,
            error_message: self.error_message,
        }
    }
}
