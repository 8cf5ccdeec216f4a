//! One executor per transformation kind.
//!
//! Every executor is total: whatever it cannot handle is returned
//! unchanged, including an absent value.

use fieldmap_model::{DateStyle, LookupTable, NumberStyle, StringOp};
use serde_json::Value;
use tracing::warn;

use crate::coerce::{is_js_space, is_truthy, js_string};
use crate::datetime::{format_instant, parse_instant};
use crate::error::Result;
use crate::numeric::{json_number, to_fixed, to_number};
use crate::script;

/// Replace the value by its table entry when that entry is truthy.
#[must_use]
pub fn lookup(value: Option<&Value>, table: Option<&LookupTable>) -> Option<Value> {
    let Some(table) = table else {
        return value.cloned();
    };
    let replacement = table.get(&js_string(value));
    if is_truthy(replacement) {
        replacement.cloned()
    } else {
        value.cloned()
    }
}

/// Case and whitespace operations; non-strings pass through.
#[must_use]
pub fn string_manipulation(value: Option<&Value>, op: Option<StringOp>) -> Option<Value> {
    let (Some(Value::String(text)), Some(op)) = (value, op) else {
        return value.cloned();
    };
    let result = match op {
        StringOp::Uppercase => text.to_uppercase(),
        StringOp::Lowercase => text.to_lowercase(),
        StringOp::Trim => text.trim_matches(is_js_space).to_string(),
    };
    Some(Value::String(result))
}

/// Numeric formatting; values that are not numbers pass through.
#[must_use]
pub fn number_format(value: Option<&Value>, style: Option<NumberStyle>) -> Option<Value> {
    let Some(style) = style else {
        return value.cloned();
    };
    let number = to_number(value);
    if number.is_nan() {
        return value.cloned();
    }
    Some(match style {
        NumberStyle::Integer => json_number(number.floor()),
        NumberStyle::Decimal2 => Value::String(to_fixed(number, 2)),
    })
}

/// Date rendering; falsy and unparseable values pass through.
#[must_use]
pub fn date_format(value: Option<&Value>, style: Option<DateStyle>) -> Option<Value> {
    let (Some(raw), Some(style)) = (value, style) else {
        return value.cloned();
    };
    if !is_truthy(Some(raw)) {
        return value.cloned();
    }
    match parse_instant(raw) {
        Some(instant) => Some(Value::String(format_instant(&instant, style))),
        None => value.cloned(),
    }
}

/// Evaluate a custom script; a failing script leaves the value unchanged.
#[must_use]
pub fn custom_script(value: Option<&Value>, code: Option<&str>) -> Option<Value> {
    let Some(code) = code.filter(|code| !code.is_empty()) else {
        return value.cloned();
    };
    match run_script(code, value) {
        Ok(result) => result,
        Err(err) => {
            warn!(error = %err, "custom script failed, keeping the source value");
            value.cloned()
        }
    }
}

fn run_script(code: &str, value: Option<&Value>) -> Result<Option<Value>> {
    Ok(script::evaluate(code, value)?)
}
