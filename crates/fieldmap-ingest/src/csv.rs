//! CSV header inference and row loading.
//!
//! Values are split on commas only; quotes carry no meaning and are kept
//! verbatim in the cell text.

use ::csv::{Reader, ReaderBuilder, StringRecord, Trim};
use fieldmap_model::{Field, FieldType, SourceFormat};
use serde_json::{Map, Value};

use crate::error::{IngestError, Result};

fn reader(content: &str) -> Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(content.as_bytes())
}

fn next_record(records: &mut ::csv::StringRecordsIter<'_, &[u8]>) -> Result<Option<StringRecord>> {
    records
        .next()
        .transpose()
        .map_err(|err| IngestError::parse(SourceFormat::Csv, err.to_string()))
}

/// Split off the header, which is always the first physical line. A blank
/// first line means there are no columns.
fn split_header(content: &str) -> Result<Option<(StringRecord, &str)>> {
    let (first, rest) = content.split_once('\n').unwrap_or((content, ""));
    let first = first.strip_suffix('\r').unwrap_or(first);
    if first.trim().is_empty() {
        return Ok(None);
    }
    let mut header_reader = reader(first);
    let header = next_record(&mut header_reader.records())?;
    Ok(header.map(|header| (header, rest)))
}

/// Every header token becomes a flat `string` leaf.
pub(crate) fn infer(content: &str) -> Result<Vec<Field>> {
    let Some((header, _)) = split_header(content)? else {
        return Ok(Vec::new());
    };
    Ok(header
        .iter()
        .map(|column| Field::leaf(column, column, FieldType::String))
        .collect())
}

/// Load every data row as an object keyed by the header.
///
/// Short rows leave trailing keys absent; cells past the header are ignored.
pub(crate) fn load(content: &str) -> Result<Value> {
    let Some((header, body)) = split_header(content)? else {
        return Ok(Value::Array(Vec::new()));
    };
    let mut reader = reader(body);
    let mut records = reader.records();

    let mut rows = Vec::new();
    while let Some(record) = next_record(&mut records)? {
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row: Map<String, Value> = header
            .iter()
            .zip(record.iter())
            .map(|(key, cell)| (key.to_string(), Value::String(cell.to_string())))
            .collect();
        rows.push(Value::Object(row));
    }
    Ok(Value::Array(rows))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn header_tokens_become_string_leaves() {
        let fields = infer("id, name ,email\r\n1,Alice,a@example.com\n").unwrap();
        let names: Vec<_> = fields.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "email"]);
        assert!(fields.iter().all(|f| f.children.is_none()));
    }

    #[test]
    fn quotes_are_not_special() {
        let fields = infer("\"a,b\",c").unwrap();
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["\"a", "b\"", "c"]);
    }

    #[test]
    fn empty_input_has_no_fields() {
        assert!(infer("").unwrap().is_empty());
    }

    #[test]
    fn blank_first_line_means_no_columns() {
        let content = "\nid,name\n1,Alice\n";
        assert!(infer(content).unwrap().is_empty());
        assert_eq!(load(content).unwrap(), json!([]));
        assert!(infer("  \r\nid\n").unwrap().is_empty());
    }

    #[test]
    fn rows_load_as_objects() {
        let doc = load("id,name\n1, Alice \n\n2\n3,Carol,extra\n").unwrap();
        assert_eq!(
            doc,
            json!([
                {"id": "1", "name": "Alice"},
                {"id": "2"},
                {"id": "3", "name": "Carol"}
            ])
        );
    }
}
