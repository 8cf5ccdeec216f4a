//! SAP IDoc segment definitions.
//!
//! ```text
//! SEGMENT E1EDK01
//! BELNR: CHAR
//! // comment
//! CURCY
//! SEGMENT
//! ```
//!
//! `SEGMENT <name>` opens a segment; a bare `SEGMENT` closes it. Field lines
//! are `name: type`, with the type defaulting to `string`.

use fieldmap_model::{Field, FieldType};
use tracing::warn;

pub(crate) fn infer(content: &str) -> Vec<Field> {
    let mut segments: Vec<Field> = Vec::new();
    let mut open = false;

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        let mut tokens = line.split_whitespace();
        if tokens.next() == Some("SEGMENT") {
            match tokens.next() {
                Some(name) => {
                    segments.push(Field::branch(name, name, FieldType::Object, Vec::new()));
                    open = true;
                }
                None => {
                    if !open {
                        warn!(line = index + 1, "SEGMENT line without a name outside any segment");
                    }
                    open = false;
                }
            }
            continue;
        }

        let Some(segment) = segments.last_mut().filter(|_| open) else {
            continue;
        };
        let (name, declared) = match line.split_once(':') {
            Some((name, declared)) => (name.trim(), declared.trim()),
            None => (line, ""),
        };
        let field_type = if declared.is_empty() {
            FieldType::String
        } else {
            FieldType::from(declared)
        };
        let path = format!("{}.{name}", segment.path);
        segment.push_child(Field::leaf(name, path, field_type));
    }

    segments
}
