//! Field mappings and mapping configurations.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::{Field, find_field};
use crate::transformation::Transformation;

/// One edge from a source path to a target path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub source_field: String,
    pub target_field: String,
    #[serde(default)]
    pub transformation: Transformation,
}

impl FieldMapping {
    /// Create a direct-copy mapping.
    pub fn direct(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source_field: source.into(),
            target_field: target.into(),
            transformation: Transformation::Direct,
        }
    }

    #[must_use]
    pub fn with_transformation(mut self, transformation: Transformation) -> Self {
        self.transformation = transformation;
        self
    }
}

/// Advisory problems in a mapping configuration.
///
/// None of these stop the output builder; they are reported so callers can
/// warn the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingIssue {
    /// A source field is mapped more than once.
    DuplicateSource { source: String, targets: Vec<String> },
    /// A source field is not present in the inferred source tree.
    UnknownSource { source: String },
    /// Two mappings write to the same or nested target paths; the later write wins.
    OverlappingTarget { first: String, second: String },
}

impl fmt::Display for MappingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateSource { source, targets } => write!(
                f,
                "source field '{source}' is mapped more than once ({})",
                targets.join(", ")
            ),
            Self::UnknownSource { source } => {
                write!(f, "source field '{source}' is not in the source schema")
            }
            Self::OverlappingTarget { first, second } => {
                write!(f, "target '{second}' overlaps earlier target '{first}'")
            }
        }
    }
}

/// Full persisted state of one mapping definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingConfig {
    #[serde(default)]
    pub source_fields: Vec<Field>,
    #[serde(default)]
    pub target_fields: Vec<Field>,
    #[serde(default)]
    pub field_mappings: Vec<FieldMapping>,
}

impl MappingConfig {
    /// The first mapping that reads from `source`.
    #[must_use]
    pub fn mapping_for_source(&self, source: &str) -> Option<&FieldMapping> {
        self.field_mappings
            .iter()
            .find(|mapping| mapping.source_field == source)
    }

    /// Report advisory issues. An empty `source_fields` tree skips the
    /// unknown-source check.
    #[must_use]
    pub fn validate(&self) -> Vec<MappingIssue> {
        let mut issues = Vec::new();

        let mut by_source: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for mapping in &self.field_mappings {
            by_source
                .entry(mapping.source_field.as_str())
                .or_default()
                .push(mapping.target_field.clone());
        }
        for (source, targets) in by_source {
            if targets.len() > 1 {
                issues.push(MappingIssue::DuplicateSource {
                    source: source.to_string(),
                    targets,
                });
            }
        }

        if !self.source_fields.is_empty() {
            for mapping in &self.field_mappings {
                if find_field(&self.source_fields, &mapping.source_field).is_none() {
                    issues.push(MappingIssue::UnknownSource {
                        source: mapping.source_field.clone(),
                    });
                }
            }
        }

        for (index, later) in self.field_mappings.iter().enumerate() {
            let overlap = self.field_mappings[..index]
                .iter()
                .find(|earlier| paths_overlap(&earlier.target_field, &later.target_field));
            if let Some(earlier) = overlap {
                issues.push(MappingIssue::OverlappingTarget {
                    first: earlier.target_field.clone(),
                    second: later.target_field.clone(),
                });
            }
        }

        issues
    }
}

/// True when one path equals the other or addresses a location inside it.
#[must_use]
pub fn paths_overlap(a: &str, b: &str) -> bool {
    fn contains(outer: &str, inner: &str) -> bool {
        inner
            .strip_prefix(outer)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.') || rest.starts_with('['))
    }
    contains(a, b) || contains(b, a)
}
