//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use fieldmap_model::SourceFormat;

#[derive(Parser)]
#[command(
    name = "fieldmap",
    version,
    about = "Infer field trees and convert documents with saved field mappings",
    long_about = "Infer the field tree of JSON, CSV, XML, and SAP IDoc sources, and convert\n\
                  source documents into target JSON using field mappings with per-field\n\
                  transformations."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow source values to appear in trace-level logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Settings file (default: fieldmap.toml in the working directory, if present).
    /// Must precede the subcommand.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Mapping store file (overrides `store_path` from the settings file).
    #[arg(long = "store", value_name = "PATH", global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the inferred field tree of a source file.
    Fields(FieldsArgs),

    /// Convert a source file into target JSON using a mapping.
    Convert(ConvertArgs),

    /// Manage saved mappings.
    Mappings {
        #[command(subcommand)]
        command: MappingsCommand,
    },

    /// Show conversion history for a saved mapping.
    History(HistoryArgs),
}

#[derive(Args)]
pub struct FieldsArgs {
    /// Source file to inspect.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Source format (default: from the file extension).
    #[arg(long = "format", value_parser = parse_source_format)]
    pub format: Option<SourceFormat>,

    /// Print the tree as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,

    /// Deepest level explored for JSON and XML (overrides the settings file).
    #[arg(long = "max-depth", value_name = "N")]
    pub max_depth: Option<usize>,
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Source file to convert.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Saved mapping id, or a JSON file with a mapping configuration.
    #[arg(long = "mapping", value_name = "ID|PATH")]
    pub mapping: String,

    /// Source format (default: from the file extension).
    #[arg(long = "format", value_parser = parse_source_format)]
    pub format: Option<SourceFormat>,

    /// Output file (default: stdout).
    #[arg(long = "output", short = 'o', value_name = "OUT")]
    pub output: Option<PathBuf>,

    /// Record the outcome in the mapping history.
    #[arg(long = "record-history")]
    pub record_history: bool,
}

#[derive(Subcommand)]
pub enum MappingsCommand {
    /// List saved mappings.
    List,

    /// Show one saved mapping.
    Show {
        #[arg(value_name = "ID")]
        id: u64,
    },

    /// Save a mapping configuration from a JSON file.
    Save(SaveArgs),

    /// Delete a saved mapping.
    Delete {
        #[arg(value_name = "ID")]
        id: u64,
    },
}

#[derive(Args)]
pub struct SaveArgs {
    /// Display name of the mapping.
    #[arg(long = "name")]
    pub name: String,

    /// JSON file holding the mapping configuration.
    #[arg(long = "config", value_name = "PATH")]
    pub config: PathBuf,

    #[arg(long = "description")]
    pub description: Option<String>,

    /// Source format the mapping was built for.
    #[arg(long = "source-format", value_parser = parse_source_format, default_value = "JSON")]
    pub source_format: SourceFormat,
}

#[derive(Args)]
pub struct HistoryArgs {
    #[arg(value_name = "MAPPING_ID")]
    pub mapping_id: u64,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_source_format(tag: &str) -> Result<SourceFormat, String> {
    fieldmap_ingest::parse_format(tag).map_err(|error| error.to_string())
}
