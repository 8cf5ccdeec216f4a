//! Truthiness and string conversion with JavaScript semantics.

use serde_json::Value;

use crate::numeric::format_number;

/// Whitespace as `String.prototype.trim` sees it.
pub(crate) fn is_js_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// `Boolean(value)`; an absent value is falsy.
#[must_use]
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// `String(value)`, also used as the property key of a lookup.
#[must_use]
pub fn js_string(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Number(number)) => number_string(number),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(items)) => join_elements(items, ","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

/// `Array.prototype.join`: `null` elements render as empty strings.
pub(crate) fn join_elements(items: &[Value], separator: &str) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::Null => String::new(),
            other => js_string(Some(other)),
        })
        .collect::<Vec<_>>()
        .join(separator)
}

fn number_string(number: &serde_json::Number) -> String {
    if let Some(integer) = number.as_i64() {
        return integer.to_string();
    }
    number
        .as_f64()
        .map_or_else(|| number.to_string(), format_number)
}
