use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use fieldmap_cli::pipeline::ConvertOutput;
use fieldmap_model::{Field, Mapping, MappingHistory, Transformation};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

pub fn print_fields(fields: &[Field]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Path"),
        header_cell("Type"),
    ]);
    apply_table_style(&mut table);
    let mut count = 0usize;
    add_field_rows(&mut table, fields, 0, &mut count);
    println!("{table}");
    println!("{count} fields");
}

fn add_field_rows(table: &mut Table, fields: &[Field], depth: usize, count: &mut usize) {
    for field in fields {
        *count += 1;
        let name = format!("{}{}", "  ".repeat(depth), field.name);
        let name_cell = if field.is_branch() {
            Cell::new(name).add_attribute(Attribute::Bold)
        } else {
            Cell::new(name)
        };
        let type_cell = match &field.field_type {
            Some(field_type) => Cell::new(field_type).fg(Color::Green),
            None => dim_cell("-"),
        };
        table.add_row(vec![name_cell, Cell::new(&field.path), type_cell]);
        add_field_rows(table, field.children(), depth + 1, count);
    }
}

pub fn print_mappings(mappings: &[Mapping]) {
    if mappings.is_empty() {
        println!("No saved mappings.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Name"),
        header_cell("Source"),
        header_cell("Target"),
        header_cell("Rules"),
        header_cell("Created"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for mapping in mappings {
        table.add_row(vec![
            Cell::new(mapping.id),
            Cell::new(&mapping.name).add_attribute(Attribute::Bold),
            Cell::new(mapping.source_format),
            Cell::new(&mapping.target_format),
            Cell::new(mapping.mapping_config.field_mappings.len()),
            Cell::new(mapping.created_at.format(TIMESTAMP_FORMAT)),
        ]);
    }
    println!("{table}");
}

pub fn print_mapping(mapping: &Mapping) {
    println!("Mapping {}: {}", mapping.id, mapping.name);
    if let Some(description) = &mapping.description {
        println!("Description: {description}");
    }
    println!(
        "Formats: {} -> {}",
        mapping.source_format, mapping.target_format
    );
    println!("Created: {}", mapping.created_at.format(TIMESTAMP_FORMAT));

    let config = &mapping.mapping_config;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source field"),
        header_cell("Target field"),
        header_cell("Transformation"),
        header_cell("Config"),
    ]);
    apply_detail_table_style(&mut table);
    for rule in &config.field_mappings {
        table.add_row(vec![
            Cell::new(&rule.source_field),
            Cell::new(&rule.target_field),
            Cell::new(rule.transformation.kind().display_name()),
            config_cell(&rule.transformation),
        ]);
    }
    println!("{table}");

    let issues = config.validate();
    if !issues.is_empty() {
        println!();
        println!("Issues:");
        for issue in issues {
            println!("  - {issue}");
        }
    }
}

pub fn print_history(mapping_id: u64, entries: &[MappingHistory]) {
    if entries.is_empty() {
        println!("No history for mapping {mapping_id}.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Processed"),
        header_cell("Source file"),
        header_cell("Target file"),
        header_cell("Status"),
        header_cell("Error"),
    ]);
    apply_detail_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for entry in entries {
        let status = if entry.success {
            Cell::new("ok").fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            Cell::new("failed").fg(Color::Red).add_attribute(Attribute::Bold)
        };
        table.add_row(vec![
            Cell::new(entry.id),
            Cell::new(entry.processed_at.format(TIMESTAMP_FORMAT)),
            optional_cell(entry.source_file_name.as_deref()),
            optional_cell(entry.target_file_name.as_deref()),
            status,
            optional_cell(entry.error_message.as_deref()),
        ]);
    }
    println!("{table}");
}

/// Conversion counts go to stderr so stdout stays valid JSON.
pub fn print_convert_summary(output: &ConvertOutput) {
    let report = &output.report;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Records"),
        header_cell("Written"),
        header_cell("Dropped"),
        header_cell("Missing source"),
    ]);
    apply_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(output.records),
        Cell::new(report.written),
        count_cell(report.dropped, Color::Red),
        count_cell(report.missing_source, Color::Yellow),
    ]);
    eprintln!("{table}");
}

fn config_cell(transformation: &Transformation) -> Cell {
    match transformation.config() {
        Some(serde_json::Value::String(text)) => Cell::new(text),
        Some(other) => Cell::new(other.to_string()),
        None => dim_cell("-"),
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(text) => Cell::new(text),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_detail_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
