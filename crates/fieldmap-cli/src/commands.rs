use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{info, info_span};

use fieldmap_cli::pipeline::{
    ConvertOutput, MappingRef, MappingSource, convert, load_mapping, read_mapping_config, read_source,
    report_issues, resolve_format, write_output,
};
use fieldmap_cli::settings::Settings;
use fieldmap_ingest::infer_fields_with;
use fieldmap_model::{NewHistory, NewMapping};
use fieldmap_store::{JsonFileStore, MappingStore};

use crate::cli::{ConvertArgs, FieldsArgs, HistoryArgs, MappingsCommand, SaveArgs};
use crate::summary::{
    print_convert_summary, print_fields, print_history, print_mapping, print_mappings,
};

pub fn open_store(settings: &Settings) -> Result<JsonFileStore> {
    JsonFileStore::open(&settings.store_path)
        .with_context(|| format!("open mapping store {}", settings.store_path.display()))
}

pub fn run_fields(args: &FieldsArgs, settings: &Settings) -> Result<()> {
    let span = info_span!("fields", file = %args.file.display());
    let _guard = span.enter();

    let format = resolve_format(&args.file, args.format, settings.default_source_format)?;
    let content = read_source(&args.file)?;
    let mut options = settings.infer;
    if let Some(max_depth) = args.max_depth {
        options = options.with_max_depth(max_depth);
    }
    let fields = infer_fields_with(&content, format, &options).context("infer fields")?;
    info!(%format, top_level = fields.len(), "inferred fields");

    if args.json {
        let text = serde_json::to_string_pretty(&fields).context("serialize field tree")?;
        println!("{text}");
    } else {
        print_fields(&fields);
    }
    Ok(())
}

pub fn run_convert(args: &ConvertArgs, settings: &Settings) -> Result<()> {
    let span = info_span!("convert", file = %args.file.display(), mapping = %args.mapping);
    let _guard = span.enter();

    let reference = MappingRef::parse(&args.mapping);
    let store = if reference.needs_store() || args.record_history {
        Some(open_store(settings)?)
    } else {
        None
    };
    let mapping = load_mapping(&reference, store.as_ref().map(|s| s as &dyn MappingStore))?;
    report_issues(mapping.config());

    let outcome = convert_file(args, settings, &mapping);
    if let Some(store) = store.as_ref().filter(|_| args.record_history) {
        record_history(store, args, &mapping, outcome.as_ref().err())?;
    }
    let output = outcome?;
    print_convert_summary(&output);
    Ok(())
}

fn convert_file(
    args: &ConvertArgs,
    settings: &Settings,
    mapping: &MappingSource,
) -> Result<ConvertOutput> {
    let format = resolve_format(&args.file, args.format, settings.default_source_format)?;
    let content = read_source(&args.file)?;
    let output = convert(&content, format, mapping.config())?;
    write_output(&output.document, args.output.as_deref())?;
    Ok(output)
}

fn record_history(
    store: &dyn MappingStore,
    args: &ConvertArgs,
    mapping: &MappingSource,
    error: Option<&anyhow::Error>,
) -> Result<()> {
    let entry = store
        .create_history(NewHistory {
            mapping_id: mapping.mapping_id(),
            source_file_name: file_name(&args.file),
            target_file_name: args.output.as_deref().and_then(file_name),
            success: error.is_none(),
            error_message: error.map(|error| format!("{error:#}")),
        })
        .context("record conversion history")?;
    info!(history_id = entry.id, success = entry.success, "recorded history");
    Ok(())
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

pub fn run_mappings(command: &MappingsCommand, settings: &Settings) -> Result<()> {
    let span = info_span!("mappings");
    let _guard = span.enter();
    let store = open_store(settings)?;

    match command {
        MappingsCommand::List => {
            let mappings = store.list_mappings().context("list mappings")?;
            print_mappings(&mappings);
        }
        MappingsCommand::Show { id } => {
            let mapping = store
                .get_mapping(*id)
                .context("read mapping store")?
                .ok_or_else(|| anyhow!("no saved mapping with id {id}"))?;
            print_mapping(&mapping);
        }
        MappingsCommand::Save(args) => save_mapping(&store, args)?,
        MappingsCommand::Delete { id } => {
            if !store.delete_mapping(*id).context("delete mapping")? {
                bail!("no saved mapping with id {id}");
            }
            println!("Deleted mapping {id}.");
        }
    }
    Ok(())
}

fn save_mapping(store: &dyn MappingStore, args: &SaveArgs) -> Result<()> {
    let config = read_mapping_config(&args.config)?;
    report_issues(&config);
    let mut new = NewMapping::new(args.name.clone(), args.source_format, config);
    if let Some(description) = &args.description {
        new = new.with_description(description.clone());
    }
    let mapping = store.create_mapping(new).context("save mapping")?;
    println!("Saved mapping {}: {}", mapping.id, mapping.name);
    Ok(())
}

pub fn run_history(args: &HistoryArgs, settings: &Settings) -> Result<()> {
    let store = open_store(settings)?;
    let entries = store
        .history_for_mapping(args.mapping_id)
        .context("read mapping history")?;
    print_history(args.mapping_id, &entries);
    Ok(())
}
