//! Inferred field trees.
//!
//! A [`Field`] describes one discoverable node of a source or target
//! document. Branches carry `children`; leaves carry only a primitive type.
//! Trees are rebuilt on every import and never shared between conversions.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type tag recorded on a [`Field`].
///
/// Serialized as a plain lower-case string. SAP segment definitions may
/// declare arbitrary type names, which are kept verbatim as [`FieldType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    /// Objects, and the `null` leaf case.
    Object,
    Array,
    Undefined,
    Other(String),
}

impl FieldType {
    /// Runtime type tag of a JSON value. `null` reports as `object`.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null | Value::Object(_) => Self::Object,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Undefined => "undefined",
            Self::Other(name) => name,
        }
    }

    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }
}

impl From<&str> for FieldType {
    fn from(value: &str) -> Self {
        match value {
            "string" => Self::String,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "object" => Self::Object,
            "array" => Self::Array,
            "undefined" => Self::Undefined,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        match value {
            FieldType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of an inferred schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    /// Fully-qualified address usable by the path accessor.
    pub path: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Field>>,
}

impl Field {
    /// Create a leaf field.
    pub fn leaf(name: impl Into<String>, path: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            field_type: Some(field_type),
            children: None,
        }
    }

    /// Create a branch field. `children` may be empty (e.g. `{}` or truncated data).
    pub fn branch(
        name: impl Into<String>,
        path: impl Into<String>,
        field_type: FieldType,
        children: Vec<Field>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            field_type: Some(field_type),
            children: Some(children),
        }
    }

    /// Append a child, turning a leaf into a branch if needed.
    pub fn push_child(&mut self, child: Field) {
        self.children.get_or_insert_with(Vec::new).push(child);
    }

    /// Child fields, empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Field] {
        self.children.as_deref().unwrap_or_default()
    }

    /// True when the field has at least one child.
    #[must_use]
    pub fn is_branch(&self) -> bool {
        !self.children().is_empty()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !self.is_branch()
    }

    /// Number of levels in this subtree, counting the field itself.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Field::depth).max().unwrap_or(0)
    }
}

/// Every leaf path in depth-first order.
#[must_use]
pub fn leaf_paths(fields: &[Field]) -> Vec<String> {
    let mut paths = Vec::new();
    collect_leaf_paths(fields, &mut paths);
    paths
}

fn collect_leaf_paths(fields: &[Field], out: &mut Vec<String>) {
    for field in fields {
        if field.is_leaf() {
            out.push(field.path.clone());
        } else {
            collect_leaf_paths(field.children(), out);
        }
    }
}

/// Find a field anywhere in the tree by its exact path.
#[must_use]
pub fn find_field<'a>(fields: &'a [Field], path: &str) -> Option<&'a Field> {
    fields.iter().find_map(|field| {
        if field.path == path {
            Some(field)
        } else {
            find_field(field.children(), path)
        }
    })
}

/// Case-insensitive name search over a field tree.
///
/// A field whose name matches is kept with its whole subtree. A branch that
/// does not match is kept only if some descendant matches, pruned down to the
/// matching descendants. An empty term returns the tree unchanged.
#[must_use]
pub fn filter_fields(fields: &[Field], term: &str) -> Vec<Field> {
    if term.is_empty() {
        return fields.to_vec();
    }
    let needle = term.to_lowercase();
    filter_with(fields, &needle)
}

fn filter_with(fields: &[Field], needle: &str) -> Vec<Field> {
    fields
        .iter()
        .filter_map(|field| {
            if field.name.to_lowercase().contains(needle) {
                return Some(field.clone());
            }
            let children = filter_with(field.children(), needle);
            (!children.is_empty()).then(|| Field {
                children: Some(children),
                ..field.clone()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_tree() -> Vec<Field> {
        vec![Field::branch(
            "order",
            "order",
            FieldType::Object,
            vec![
                Field::leaf("orderId", "order.orderId", FieldType::String),
                Field::branch(
                    "partner",
                    "order.partner",
                    FieldType::Object,
                    vec![
                        Field::leaf("id", "order.partner.id", FieldType::String),
                        Field::leaf("type", "order.partner.type", FieldType::String),
                    ],
                ),
            ],
        )]
    }

    #[test]
    fn field_type_round_trips_through_string() {
        let json = serde_json::to_string(&FieldType::Other("CHAR".into())).unwrap();
        assert_eq!(json, "\"CHAR\"");
        let parsed: FieldType = serde_json::from_str("\"number\"").unwrap();
        assert_eq!(parsed, FieldType::Number);
    }

    #[test]
    fn null_reports_as_object() {
        assert_eq!(FieldType::of(&Value::Null), FieldType::Object);
    }

    #[test]
    fn leaf_omits_children_when_serialized() {
        let field = Field::leaf("id", "id", FieldType::String);
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "id", "path": "id", "type": "string"})
        );
    }

    #[test]
    fn collects_leaf_paths_depth_first() {
        assert_eq!(
            leaf_paths(&order_tree()),
            vec!["order.orderId", "order.partner.id", "order.partner.type"]
        );
    }

    #[test]
    fn finds_nested_field() {
        let tree = order_tree();
        let field = find_field(&tree, "order.partner.type").unwrap();
        assert_eq!(field.name, "type");
        assert!(find_field(&tree, "order.missing").is_none());
    }

    #[test]
    fn filter_keeps_matching_branch_whole() {
        let filtered = filter_fields(&order_tree(), "PARTNER");
        let partner = &filtered[0].children()[0];
        assert_eq!(partner.name, "partner");
        assert_eq!(partner.children().len(), 2);
        assert_eq!(filtered[0].children().len(), 1);
    }

    #[test]
    fn filter_prunes_to_matching_descendants() {
        let filtered = filter_fields(&order_tree(), "type");
        assert_eq!(leaf_paths(&filtered), vec!["order.partner.type"]);
        assert!(filter_fields(&order_tree(), "zzz").is_empty());
    }

    #[test]
    fn depth_counts_levels() {
        assert_eq!(order_tree()[0].depth(), 3);
    }
}
