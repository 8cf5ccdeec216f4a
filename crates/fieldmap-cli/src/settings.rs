//! Settings file support.
//!
//! Settings come from an optional TOML file. Command-line flags override
//! the file, and the file overrides the defaults.
//!
//! ```toml
//! store_path = "mappings.json"
//! default_source_format = "csv"
//!
//! [infer]
//! max_depth = 12
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use fieldmap_ingest::InferOptions;
use fieldmap_model::SourceFormat;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::debug;

/// Settings file looked up in the working directory when `--config` is absent.
pub const DEFAULT_SETTINGS_FILE: &str = "fieldmap.toml";

pub const DEFAULT_STORE_PATH: &str = "fieldmap-store.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// JSON file backing the mapping store.
    pub store_path: PathBuf,
    /// Format used when neither `--format` nor the file extension decides.
    #[serde(deserialize_with = "format_tag")]
    pub default_source_format: Option<SourceFormat>,
    pub infer: InferOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            default_source_format: None,
            infer: InferOptions::default(),
        }
    }
}

impl Settings {
    /// Load settings from `explicit`, or from [`DEFAULT_SETTINGS_FILE`] when it
    /// exists, or fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_SETTINGS_FILE);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_store_path(mut self, store_path: Option<PathBuf>) -> Self {
        if let Some(path) = store_path {
            self.store_path = path;
        }
        self
    }
}

fn format_tag<'de, D>(deserializer: D) -> Result<Option<SourceFormat>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = Option::<String>::deserialize(deserializer)?;
    tag.map(|tag| tag.parse().map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn reads_all_keys() {
        let settings = Settings::from_toml(
            r#"
            store_path = "data/store.json"
            default_source_format = "csv"

            [infer]
            max_depth = 4
            "#,
        )
        .unwrap();
        assert_eq!(settings.store_path, PathBuf::from("data/store.json"));
        assert_eq!(settings.default_source_format, Some(SourceFormat::Csv));
        assert_eq!(settings.infer.max_depth, 4);
    }

    #[test]
    fn rejects_unknown_format_and_keys() {
        assert!(Settings::from_toml(r#"default_source_format = "yaml""#).is_err());
        assert!(Settings::from_toml(r#"store = "x""#).is_err());
    }

    #[test]
    fn flag_overrides_store_path() {
        let settings = Settings::default().with_store_path(Some(PathBuf::from("other.json")));
        assert_eq!(settings.store_path, PathBuf::from("other.json"));
        let settings = settings.with_store_path(None);
        assert_eq!(settings.store_path, PathBuf::from("other.json"));
    }
}
