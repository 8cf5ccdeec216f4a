//! Output builder.

use fieldmap_model::{FieldMapping, paths_overlap};
use fieldmap_path::{get, remove, set};
use fieldmap_transform::{apply, is_inert};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

/// Counters collected while building one target document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Mappings whose result was placed in the target.
    pub written: usize,
    /// Mappings whose target path could not be placed.
    pub dropped: usize,
    /// Mappings whose source path resolved to nothing.
    pub missing_source: usize,
}

impl BuildReport {
    fn merge(&mut self, other: BuildReport) {
        self.written += other.written;
        self.dropped += other.dropped;
        self.missing_source += other.missing_source;
    }
}

/// Applies an ordered mapping list to source documents.
///
/// Mappings run in order and later writes to the same target win. A key
/// first written with an absent value keeps the position of that first
/// write; keys still absent once every mapping has run are left out.
#[derive(Debug, Clone, Copy)]
pub struct OutputBuilder<'m> {
    mappings: &'m [FieldMapping],
}

impl<'m> OutputBuilder<'m> {
    /// Prepare a builder, warning once for every mapping that will pass its
    /// value through because its transformation has no usable config.
    pub fn new(mappings: &'m [FieldMapping]) -> Self {
        for mapping in mappings.iter().filter(|m| is_inert(&m.transformation)) {
            warn!(
                source = %mapping.source_field,
                target = %mapping.target_field,
                kind = ?mapping.transformation.kind(),
                "transformation has no usable config; value passes through unchanged"
            );
        }
        Self { mappings }
    }

    #[must_use]
    pub fn mappings(&self) -> &'m [FieldMapping] {
        self.mappings
    }

    /// Build one target document from `source`.
    #[must_use]
    pub fn build(&self, source: &Value) -> Value {
        self.build_with_report(source).0
    }

    pub fn build_with_report(&self, source: &Value) -> (Value, BuildReport) {
        let mut target = Value::Object(Map::new());
        let mut report = BuildReport::default();
        // Targets whose latest write was absent; they hold a `null` placeholder.
        let mut absent: Vec<&str> = Vec::new();

        for mapping in self.mappings {
            let value = get(source, &mapping.source_field);
            if value.is_none() {
                report.missing_source += 1;
                trace!(source = %mapping.source_field, "source path resolved to nothing");
            }
            let result = apply(value, &mapping.transformation);
            let is_absent = result.is_none();
            if set(&mut target, &mapping.target_field, Some(result.unwrap_or(Value::Null))) {
                report.written += 1;
                absent.retain(|path| !paths_overlap(path, &mapping.target_field));
                if is_absent {
                    absent.push(&mapping.target_field);
                }
            } else {
                report.dropped += 1;
            }
        }

        for path in absent {
            remove(&mut target, path);
        }

        debug!(
            mappings = self.mappings.len(),
            written = report.written,
            dropped = report.dropped,
            missing_source = report.missing_source,
            "built target document"
        );
        (target, report)
    }

    /// Map every element of a top-level array; map any other document once.
    pub fn build_batch(&self, document: &Value) -> (Value, BuildReport) {
        match document {
            Value::Array(records) => {
                let mut report = BuildReport::default();
                let outputs = records
                    .iter()
                    .map(|record| {
                        let (output, record_report) = self.build_with_report(record);
                        report.merge(record_report);
                        output
                    })
                    .collect();
                (Value::Array(outputs), report)
            }
            other => self.build_with_report(other),
        }
    }
}

/// Build a target document from `source` by applying `mappings` in order.
///
/// Never fails: missing source paths yield absent values, and writes that
/// cannot be placed are skipped.
#[must_use]
pub fn build(source: &Value, mappings: &[FieldMapping]) -> Value {
    OutputBuilder::new(mappings).build(source)
}

/// [`build`], also returning counters for the run.
pub fn build_with_report(source: &Value, mappings: &[FieldMapping]) -> (Value, BuildReport) {
    OutputBuilder::new(mappings).build_with_report(source)
}

/// Build one target per record when `document` is a top-level array.
#[must_use]
pub fn build_batch(document: &Value, mappings: &[FieldMapping]) -> Value {
    OutputBuilder::new(mappings).build_batch(document).0
}
