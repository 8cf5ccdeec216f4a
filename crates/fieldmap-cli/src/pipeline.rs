//! Conversion stages shared by the CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use fieldmap_ingest::load_document;
use fieldmap_map::{BuildReport, OutputBuilder};
use fieldmap_model::{Mapping, MappingConfig, SourceFormat};
use fieldmap_store::MappingStore;
use serde_json::Value;
use tracing::{info, info_span, trace, warn};

use crate::logging::redact_value;

/// Where a mapping configuration was loaded from.
#[derive(Debug, Clone)]
pub enum MappingSource {
    /// A saved mapping in the store.
    Stored(Box<Mapping>),
    /// A JSON file on disk.
    File(MappingConfig),
}

impl MappingSource {
    #[must_use]
    pub fn config(&self) -> &MappingConfig {
        match self {
            Self::Stored(mapping) => &mapping.mapping_config,
            Self::File(config) => config,
        }
    }

    #[must_use]
    pub fn mapping_id(&self) -> Option<u64> {
        match self {
            Self::Stored(mapping) => Some(mapping.id),
            Self::File(_) => None,
        }
    }
}

/// Result of converting one source document.
#[derive(Debug, Clone)]
pub struct ConvertOutput {
    pub document: Value,
    /// Number of source records mapped (1 unless the source is a record array).
    pub records: usize,
    pub report: BuildReport,
}

/// Pick the source format: explicit flag, then file extension, then the
/// settings default.
pub fn resolve_format(
    path: &Path,
    explicit: Option<SourceFormat>,
    fallback: Option<SourceFormat>,
) -> Result<SourceFormat> {
    explicit
        .or_else(|| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .and_then(SourceFormat::from_extension)
        })
        .or(fallback)
        .ok_or_else(|| {
            anyhow!(
                "cannot determine the format of {}; pass --format",
                path.display()
            )
        })
}

pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read source file {}", path.display()))
}

/// What `--mapping` names: a saved mapping id or a JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingRef {
    Stored(u64),
    File(PathBuf),
}

impl MappingRef {
    /// A value that parses as an id is a stored mapping; anything else is a path.
    #[must_use]
    pub fn parse(reference: &str) -> Self {
        match reference.trim().parse::<u64>() {
            Ok(id) => Self::Stored(id),
            Err(_) => Self::File(PathBuf::from(reference)),
        }
    }

    #[must_use]
    pub fn needs_store(&self) -> bool {
        matches!(self, Self::Stored(_))
    }
}

/// Load the mapping `reference` names. A file may hold either a mapping
/// configuration or a full saved mapping record; a stored id needs `store`.
pub fn load_mapping(
    reference: &MappingRef,
    store: Option<&dyn MappingStore>,
) -> Result<MappingSource> {
    match reference {
        MappingRef::Stored(id) => {
            let Some(store) = store else {
                bail!("saved mapping {id} requested without a mapping store");
            };
            let mapping = store
                .get_mapping(*id)
                .context("read mapping store")?
                .ok_or_else(|| anyhow!("no saved mapping with id {id}"))?;
            Ok(MappingSource::Stored(Box::new(mapping)))
        }
        MappingRef::File(path) => {
            if !path.is_file() {
                bail!(
                    "mapping '{}' is neither a saved mapping id nor a file",
                    path.display()
                );
            }
            read_mapping_config(path).map(MappingSource::File)
        }
    }
}

pub fn read_mapping_config(path: &Path) -> Result<MappingConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read mapping file {}", path.display()))?;
    let mut value: Value = serde_json::from_str(&text)
        .with_context(|| format!("parse mapping file {}", path.display()))?;
    if let Some(embedded) = value.get_mut("mappingConfig") {
        value = embedded.take();
    }
    serde_json::from_value(value)
        .with_context(|| format!("invalid mapping configuration in {}", path.display()))
}

/// Warn about advisory problems in `config`. Returns how many were found.
pub fn report_issues(config: &MappingConfig) -> usize {
    let issues = config.validate();
    for issue in &issues {
        warn!(%issue, "mapping issue");
    }
    issues.len()
}

/// Load `content` as a document and build the target for every record.
pub fn convert(content: &str, format: SourceFormat, config: &MappingConfig) -> Result<ConvertOutput> {
    let source = {
        let _span = info_span!("load", %format).entered();
        load_document(content, format).context("load source document")?
    };
    let records = match &source {
        Value::Array(rows) => rows.len(),
        _ => 1,
    };

    let _span = info_span!("build", mappings = config.field_mappings.len(), records).entered();
    let builder = OutputBuilder::new(&config.field_mappings);
    let (document, report) = builder.build_batch(&source);
    trace!(
        output = %redact_value(&document.to_string()),
        "built target document"
    );
    info!(
        records,
        written = report.written,
        dropped = report.dropped,
        missing_source = report.missing_source,
        "conversion finished"
    );
    Ok(ConvertOutput {
        document,
        records,
        report,
    })
}

/// Write `document` as pretty JSON, to `output` or stdout.
pub fn write_output(document: &Value, output: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(document).context("serialize target document")?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create directory {}", parent.display()))?;
            }
            fs::write(path, text + "\n")
                .with_context(|| format!("write output file {}", path.display()))
        }
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
