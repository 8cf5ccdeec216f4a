//! Runtime values of the script language.

use serde_json::{Map, Value};

use crate::coerce::join_elements;
use crate::numeric::{format_number, json_number, parse_number};

/// A script value. Unlike JSON it can be absent and can hold `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Val {
    Undefined,
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    Array(Vec<Value>),
    Object(Map<String, Value>),
}

impl Val {
    pub fn from_json(value: Option<&Value>) -> Self {
        value.cloned().map_or(Self::Undefined, Self::from_owned)
    }

    pub fn from_owned(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(flag),
            Value::Number(number) => Self::Num(number.as_f64().unwrap_or(f64::NAN)),
            Value::String(text) => Self::Str(text),
            Value::Array(items) => Self::Array(items),
            Value::Object(map) => Self::Object(map),
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Undefined => None,
            Self::Null => Some(Value::Null),
            Self::Bool(flag) => Some(Value::Bool(flag)),
            Self::Num(number) => Some(json_number(number)),
            Self::Str(text) => Some(Value::String(text)),
            Self::Array(items) => Some(Value::Array(items)),
            Self::Object(map) => Some(Value::Object(map)),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Num(_) => "number",
            Self::Str(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    pub fn truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(flag) => *flag,
            Self::Num(number) => *number != 0.0 && !number.is_nan(),
            Self::Str(text) => !text.is_empty(),
            Self::Array(_) | Self::Object(_) => true,
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            Self::Null => 0.0,
            Self::Bool(flag) => f64::from(u8::from(*flag)),
            Self::Num(number) => *number,
            Self::Str(text) => parse_number(text),
            Self::Undefined | Self::Array(_) | Self::Object(_) => f64::NAN,
        }
    }

    pub fn to_js_string(&self) -> String {
        match self {
            Self::Undefined => "undefined".to_string(),
            Self::Null => "null".to_string(),
            Self::Bool(flag) => flag.to_string(),
            Self::Num(number) => format_number(*number),
            Self::Str(text) => text.clone(),
            Self::Array(items) => join_elements(items, ","),
            Self::Object(_) => "[object Object]".to_string(),
        }
    }

    /// Arrays and objects compare and concatenate as their string form.
    pub fn to_primitive(self) -> Self {
        match self {
            Self::Array(_) | Self::Object(_) => Self::Str(self.to_js_string()),
            other => other,
        }
    }
}

/// `===`
pub(crate) fn strict_eq(a: &Val, b: &Val) -> bool {
    match (a, b) {
        (Val::Undefined, Val::Undefined) | (Val::Null, Val::Null) => true,
        (Val::Bool(x), Val::Bool(y)) => x == y,
        (Val::Num(x), Val::Num(y)) => x == y,
        (Val::Str(x), Val::Str(y)) => x == y,
        (Val::Array(x), Val::Array(y)) => x == y,
        (Val::Object(x), Val::Object(y)) => x == y,
        _ => false,
    }
}

/// `==`
pub(crate) fn loose_eq(a: &Val, b: &Val) -> bool {
    match (a, b) {
        (Val::Undefined | Val::Null, Val::Undefined | Val::Null) => true,
        (Val::Undefined | Val::Null, _) | (_, Val::Undefined | Val::Null) => false,
        (Val::Bool(_), _) => loose_eq(&Val::Num(a.to_number()), b),
        (_, Val::Bool(_)) => loose_eq(a, &Val::Num(b.to_number())),
        (Val::Num(x), Val::Str(_)) => *x == b.to_number(),
        (Val::Str(_), Val::Num(y)) => a.to_number() == *y,
        (Val::Array(_) | Val::Object(_), Val::Num(_) | Val::Str(_)) => {
            loose_eq(&a.clone().to_primitive(), b)
        }
        (Val::Num(_) | Val::Str(_), Val::Array(_) | Val::Object(_)) => {
            loose_eq(a, &b.clone().to_primitive())
        }
        _ => strict_eq(a, b),
    }
}
