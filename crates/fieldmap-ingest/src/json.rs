//! JSON field inference.

use fieldmap_model::{Field, FieldType, SourceFormat};
use serde_json::Value;

use crate::error::{IngestError, Result};
use crate::options::InferOptions;

pub(crate) fn parse(content: &str) -> Result<Value> {
    serde_json::from_str(content).map_err(|err| IngestError::parse(SourceFormat::Json, err.to_string()))
}

pub(crate) fn infer(content: &str, options: &InferOptions) -> Result<Vec<Field>> {
    let document = parse(content)?;
    Ok(fields_from_value(&document, options))
}

/// Build the field tree of an already-parsed JSON value.
#[must_use]
pub fn fields_from_value(value: &Value, options: &InferOptions) -> Vec<Field> {
    walk(value, "", 0, options.max_depth)
}

fn walk(value: &Value, parent: &str, depth: usize, max_depth: usize) -> Vec<Field> {
    if depth > max_depth {
        return Vec::new();
    }
    match value {
        Value::Null => Vec::new(),
        // Only the first element is sampled.
        Value::Array(items) => items
            .first()
            .map(|first| walk(first, &format!("{parent}[0]"), depth + 1, max_depth))
            .unwrap_or_default(),
        Value::Object(map) => map
            .iter()
            .map(|(key, child)| {
                let path = child_path(parent, key);
                match child {
                    Value::Object(_) | Value::Array(_) => {
                        let children = walk(child, &path, depth + 1, max_depth);
                        Field::branch(key.as_str(), path, FieldType::of(child), children)
                    }
                    _ => Field::leaf(key.as_str(), path, FieldType::of(child)),
                }
            })
            .collect(),
        primitive => vec![Field::leaf(parent, parent, FieldType::of(primitive))],
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}
