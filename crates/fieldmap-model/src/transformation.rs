//! Value transformations applied by field mappings.
//!
//! On the wire a transformation is `{ "type": <kind>, "config"?: ... }`.
//! In memory it is a closed enum with one variant per kind, so every
//! dispatch site is an exhaustive match. A missing config is kept as `None`;
//! a config the kind cannot use is kept verbatim in
//! [`Transformation::Unrecognized`] so it survives a save. Both pass values
//! through unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Replacement table for [`Transformation::Lookup`].
pub type LookupTable = Map<String, Value>;

/// Transformation kind tag as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformKind {
    Direct,
    Lookup,
    StringManipulation,
    NumberFormat,
    DateFormat,
    CustomScript,
}

impl TransformKind {
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Direct => "Direct Copy",
            Self::Lookup => "Lookup",
            Self::StringManipulation => "String Manipulation",
            Self::NumberFormat => "Number Format",
            Self::DateFormat => "Date Format",
            Self::CustomScript => "Custom Script",
        }
    }
}

/// String operation for [`Transformation::StringManipulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringOp {
    Uppercase,
    Lowercase,
    Trim,
}

impl StringOp {
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "uppercase" => Some(Self::Uppercase),
            "lowercase" => Some(Self::Lowercase),
            "trim" => Some(Self::Trim),
            _ => None,
        }
    }

    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Uppercase => "uppercase",
            Self::Lowercase => "lowercase",
            Self::Trim => "trim",
        }
    }
}

/// Output style for [`Transformation::NumberFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberStyle {
    /// Floor to an integer.
    Integer,
    /// Fixed two-decimal string.
    Decimal2,
}

impl NumberStyle {
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "integer" => Some(Self::Integer),
            "decimal2" => Some(Self::Decimal2),
            _ => None,
        }
    }

    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Decimal2 => "decimal2",
        }
    }
}

/// Output style for [`Transformation::DateFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateStyle {
    /// `YYYY-MM-DDTHH:MM:SS.sssZ`
    Iso,
    /// `M/D/YYYY`
    Short,
}

impl DateStyle {
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "ISO" => Some(Self::Iso),
            "short" => Some(Self::Short),
            _ => None,
        }
    }

    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Iso => "ISO",
            Self::Short => "short",
        }
    }
}

/// A configurable value-rewriting operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "WireTransformation", into = "WireTransformation")]
pub enum Transformation {
    #[default]
    Direct,
    Lookup(Option<LookupTable>),
    StringManipulation(Option<StringOp>),
    NumberFormat(Option<NumberStyle>),
    DateFormat(Option<DateStyle>),
    /// Expression text evaluated against the bound name `source`.
    CustomScript(Option<String>),
    /// A config the kind does not understand, held as it was read.
    Unrecognized { kind: TransformKind, config: Value },
}

impl Transformation {
    #[must_use]
    pub fn kind(&self) -> TransformKind {
        match self {
            Self::Direct => TransformKind::Direct,
            Self::Lookup(_) => TransformKind::Lookup,
            Self::StringManipulation(_) => TransformKind::StringManipulation,
            Self::NumberFormat(_) => TransformKind::NumberFormat,
            Self::DateFormat(_) => TransformKind::DateFormat,
            Self::CustomScript(_) => TransformKind::CustomScript,
            Self::Unrecognized { kind, .. } => *kind,
        }
    }

    /// Build a transformation from its wire tag and optional config.
    ///
    /// A `null` config counts as missing.
    #[must_use]
    pub fn from_parts(kind: TransformKind, config: Option<&Value>) -> Self {
        let Some(config) = config.filter(|config| !config.is_null()) else {
            return match kind {
                TransformKind::Direct => Self::Direct,
                TransformKind::Lookup => Self::Lookup(None),
                TransformKind::StringManipulation => Self::StringManipulation(None),
                TransformKind::NumberFormat => Self::NumberFormat(None),
                TransformKind::DateFormat => Self::DateFormat(None),
                TransformKind::CustomScript => Self::CustomScript(None),
            };
        };

        let keyword = config.as_str();
        let known = match kind {
            TransformKind::Direct => None,
            TransformKind::Lookup => lookup_table(config).map(|table| Self::Lookup(Some(table))),
            TransformKind::StringManipulation => keyword
                .and_then(StringOp::from_keyword)
                .map(|op| Self::StringManipulation(Some(op))),
            TransformKind::NumberFormat => keyword
                .and_then(NumberStyle::from_keyword)
                .map(|style| Self::NumberFormat(Some(style))),
            TransformKind::DateFormat => keyword
                .and_then(DateStyle::from_keyword)
                .map(|style| Self::DateFormat(Some(style))),
            TransformKind::CustomScript => {
                keyword.map(|code| Self::CustomScript(Some(code.to_string())))
            }
        };
        known.unwrap_or_else(|| Self::Unrecognized {
            kind,
            config: config.clone(),
        })
    }

    /// Wire config for this transformation, if any.
    #[must_use]
    pub fn config(&self) -> Option<Value> {
        match self {
            Self::Direct => None,
            Self::Lookup(table) => table.clone().map(Value::Object),
            Self::StringManipulation(op) => op.map(|op| op.keyword().into()),
            Self::NumberFormat(style) => style.map(|style| style.keyword().into()),
            Self::DateFormat(style) => style.map(|style| style.keyword().into()),
            Self::CustomScript(script) => script.clone().map(Value::String),
            Self::Unrecognized { config, .. } => Some(config.clone()),
        }
    }
}

/// Lookup tables arrive either as an object or as a string holding one.
fn lookup_table(config: &Value) -> Option<LookupTable> {
    match config {
        Value::Object(table) => Some(table.clone()),
        Value::String(text) => serde_json::from_str(text).ok(),
        _ => None,
    }
}

#[derive(Serialize, Deserialize)]
struct WireTransformation {
    #[serde(rename = "type")]
    kind: TransformKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    config: Option<Value>,
}

impl From<WireTransformation> for Transformation {
    fn from(wire: WireTransformation) -> Self {
        Transformation::from_parts(wire.kind, wire.config.as_ref())
    }
}

impl From<Transformation> for WireTransformation {
    fn from(transformation: Transformation) -> Self {
        WireTransformation {
            kind: transformation.kind(),
            config: transformation.config(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_direct_without_config() {
        let t: Transformation = serde_json::from_value(json!({"type": "direct"})).unwrap();
        assert_eq!(t, Transformation::Direct);
    }

    #[test]
    fn deserializes_keyword_configs() {
        let t: Transformation =
            serde_json::from_value(json!({"type": "numberFormat", "config": "decimal2"})).unwrap();
        assert_eq!(t, Transformation::NumberFormat(Some(NumberStyle::Decimal2)));

        let t: Transformation =
            serde_json::from_value(json!({"type": "dateFormat", "config": "ISO"})).unwrap();
        assert_eq!(t, Transformation::DateFormat(Some(DateStyle::Iso)));
    }

    #[test]
    fn unknown_keyword_becomes_passthrough() {
        let t: Transformation = serde_json::from_value(
            json!({"type": "stringManipulation", "config": "return source.toUpperCase();"}),
        )
        .unwrap();
        assert_eq!(t.kind(), TransformKind::StringManipulation);
        assert_eq!(t.config(), Some(json!("return source.toUpperCase();")));
    }

    #[test]
    fn missing_or_null_config_is_none() {
        let t: Transformation =
            serde_json::from_value(json!({"type": "dateFormat", "config": null})).unwrap();
        assert_eq!(t, Transformation::DateFormat(None));
        let t: Transformation = serde_json::from_value(json!({"type": "lookup"})).unwrap();
        assert_eq!(t, Transformation::Lookup(None));
    }

    #[test]
    fn unusable_configs_survive_a_round_trip() {
        for wire in [
            json!({"type": "dateFormat", "config": "long"}),
            json!({"type": "numberFormat", "config": 2}),
            json!({"type": "lookup", "config": "not json"}),
            json!({"type": "lookup", "config": [1, 2]}),
            json!({"type": "customScript", "config": {"code": "source"}}),
            json!({"type": "direct", "config": "ignored"}),
        ] {
            let t: Transformation = serde_json::from_value(wire.clone()).unwrap();
            assert!(matches!(t, Transformation::Unrecognized { .. }), "{wire}");
            assert_eq!(serde_json::to_value(&t).unwrap(), wire);
        }
    }

    #[test]
    fn lookup_accepts_object_or_serialized_object() {
        let from_object: Transformation =
            serde_json::from_value(json!({"type": "lookup", "config": {"M": "Male"}})).unwrap();
        let from_string: Transformation =
            serde_json::from_value(json!({"type": "lookup", "config": "{\"M\": \"Male\"}"}))
                .unwrap();
        assert_eq!(from_object, from_string);
        let Transformation::Lookup(Some(table)) = from_object else {
            panic!("expected lookup table");
        };
        assert_eq!(table.get("M"), Some(&json!("Male")));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result: Result<Transformation, _> =
            serde_json::from_value(json!({"type": "eval", "config": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn serializes_back_to_wire_shape() {
        let t = Transformation::CustomScript(Some("upper(source)".into()));
        assert_eq!(
            serde_json::to_value(&t).unwrap(),
            json!({"type": "customScript", "config": "upper(source)"})
        );
        assert_eq!(
            serde_json::to_value(Transformation::Direct).unwrap(),
            json!({"type": "direct"})
        );
    }
}
