//! The closed set of functions a script may call.
//!
//! `value.fn(args)` is sugar for `fn(value, args)`, so every builtin
//! receives its receiver as the first argument.

use serde_json::Value;

use super::MAX_STRING_BYTES;
use super::value::{Val, strict_eq};
use crate::coerce::{is_js_space, join_elements};
use crate::error::ScriptError;
use crate::numeric::to_fixed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Upper,
    Lower,
    Trim,
    Length,
    Concat,
    Substring,
    Slice,
    Replace,
    ReplaceAll,
    Split,
    Join,
    Number,
    String,
    Round,
    Floor,
    Ceil,
    Abs,
    Fixed,
    Default,
    Coalesce,
    Contains,
    StartsWith,
    EndsWith,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        let builtin = match name {
            "upper" | "toUpperCase" => Self::Upper,
            "lower" | "toLowerCase" => Self::Lower,
            "trim" => Self::Trim,
            "length" => Self::Length,
            "concat" => Self::Concat,
            "substring" => Self::Substring,
            "slice" => Self::Slice,
            "replace" => Self::Replace,
            "replaceAll" => Self::ReplaceAll,
            "split" => Self::Split,
            "join" => Self::Join,
            "number" => Self::Number,
            "string" | "toString" => Self::String,
            "round" => Self::Round,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            "abs" => Self::Abs,
            "fixed" | "toFixed" => Self::Fixed,
            "default" => Self::Default,
            "coalesce" => Self::Coalesce,
            "contains" | "includes" => Self::Contains,
            "starts_with" | "startsWith" => Self::StartsWith,
            "ends_with" | "endsWith" => Self::EndsWith,
            _ => return None,
        };
        Some(builtin)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Trim => "trim",
            Self::Length => "length",
            Self::Concat => "concat",
            Self::Substring => "substring",
            Self::Slice => "slice",
            Self::Replace => "replace",
            Self::ReplaceAll => "replaceAll",
            Self::Split => "split",
            Self::Join => "join",
            Self::Number => "number",
            Self::String => "string",
            Self::Round => "round",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Abs => "abs",
            Self::Fixed => "fixed",
            Self::Default => "default",
            Self::Coalesce => "coalesce",
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
        }
    }

    /// Accepted argument counts, receiver included.
    fn arity(self) -> (usize, Option<usize>, &'static str) {
        match self {
            Self::Upper
            | Self::Lower
            | Self::Trim
            | Self::Length
            | Self::Number
            | Self::String
            | Self::Floor
            | Self::Ceil
            | Self::Abs => (1, Some(1), "1"),
            Self::Round | Self::Fixed | Self::Join => (1, Some(2), "1 to 2"),
            Self::Split => (1, Some(3), "1 to 3"),
            Self::Substring | Self::Slice => (2, Some(3), "2 to 3"),
            Self::Replace | Self::ReplaceAll => (3, Some(3), "3"),
            Self::Default | Self::Contains | Self::StartsWith | Self::EndsWith => {
                (2, Some(2), "2")
            }
            Self::Concat | Self::Coalesce => (1, None, "at least 1"),
        }
    }

    pub fn check_arity(self, actual: usize) -> Result<(), ScriptError> {
        let (min, max, expected) = self.arity();
        if actual < min || max.is_some_and(|max| actual > max) {
            return Err(ScriptError::Arity {
                function: self.name(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    pub fn call(self, args: Vec<Val>) -> Result<Val, ScriptError> {
        let mut args = args.into_iter();
        let receiver = args.next().unwrap_or(Val::Undefined);
        let rest: Vec<Val> = args.collect();
        let arg = |index: usize| rest.get(index).unwrap_or(&Val::Undefined);

        let result = match self {
            Self::Upper => Val::Str(self.text(&receiver)?.to_uppercase()),
            Self::Lower => Val::Str(self.text(&receiver)?.to_lowercase()),
            Self::Trim => Val::Str(self.text(&receiver)?.trim_matches(is_js_space).to_string()),
            Self::Length => match &receiver {
                Val::Str(text) => Val::Num(count(text.chars().count())),
                Val::Array(items) => Val::Num(count(items.len())),
                Val::Object(map) => Val::Num(count(map.len())),
                other => return Err(self.unsupported(other)),
            },
            Self::Concat => concat(self, receiver, rest)?,
            Self::Substring => {
                let chars: Vec<char> = self.text(&receiver)?.chars().collect();
                let len = chars.len();
                let start = clamp_index(arg(0), len);
                let end = match arg(1) {
                    Val::Undefined => len,
                    end => clamp_index(end, len),
                };
                let (lo, hi) = (start.min(end), start.max(end));
                Val::Str(chars[lo..hi].iter().collect())
            }
            Self::Slice => match receiver {
                Val::Array(items) => {
                    let (lo, hi) = slice_bounds(arg(0), arg(1), items.len());
                    Val::Array(items[lo..hi].to_vec())
                }
                other => {
                    let chars: Vec<char> = self.text(&other)?.chars().collect();
                    let (lo, hi) = slice_bounds(arg(0), arg(1), chars.len());
                    Val::Str(chars[lo..hi].iter().collect())
                }
            },
            Self::Replace => {
                let text = self.text(&receiver)?;
                Val::Str(text.replacen(&arg(0).to_js_string(), &arg(1).to_js_string(), 1))
            }
            Self::ReplaceAll => {
                let text = self.text(&receiver)?;
                let pattern = arg(0).to_js_string();
                let replacement = arg(1).to_js_string();
                let hits = if pattern.is_empty() {
                    text.chars().count() + 1
                } else {
                    text.matches(pattern.as_str()).count()
                };
                let projected = (text.len() + hits * replacement.len())
                    .saturating_sub(hits * pattern.len());
                check_length(projected)?;
                Val::Str(text.replace(&pattern, &replacement))
            }
            Self::Split => split(self.text(&receiver)?, arg(0), arg(1)),
            Self::Join => match &receiver {
                Val::Array(items) => {
                    let separator = match arg(0) {
                        Val::Undefined => ",".to_string(),
                        other => other.to_js_string(),
                    };
                    Val::Str(join_elements(items, &separator))
                }
                other => return Err(self.unsupported(other)),
            },
            Self::Number => Val::Num(receiver.to_number()),
            Self::String => Val::Str(receiver.to_js_string()),
            Self::Round => {
                let value = receiver.to_number();
                match arg(0) {
                    Val::Undefined => Val::Num(js_round(value)),
                    digits => {
                        let factor = 10f64.powf(to_integer(digits));
                        Val::Num(js_round(value * factor) / factor)
                    }
                }
            }
            Self::Floor => Val::Num(receiver.to_number().floor()),
            Self::Ceil => Val::Num(receiver.to_number().ceil()),
            Self::Abs => Val::Num(receiver.to_number().abs()),
            Self::Fixed => {
                let digits = to_integer(arg(0));
                if !(0.0..=100.0).contains(&digits) {
                    return Err(ScriptError::Type(
                        "fixed() digits must be between 0 and 100".to_string(),
                    ));
                }
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let digits = digits as usize;
                Val::Str(to_fixed(receiver.to_number(), digits))
            }
            Self::Default => {
                let missing = receiver.is_nullish() || matches!(&receiver, Val::Str(text) if text.is_empty());
                if missing { arg(0).clone() } else { receiver }
            }
            Self::Coalesce => std::iter::once(receiver)
                .chain(rest.iter().cloned())
                .find(|value| !value.is_nullish())
                .unwrap_or(Val::Undefined),
            Self::Contains => match &receiver {
                Val::Array(items) => {
                    let needle = arg(0);
                    Val::Bool(
                        items
                            .iter()
                            .any(|item| strict_eq(&Val::from_json(Some(item)), needle)),
                    )
                }
                other => Val::Bool(self.text(other)?.contains(arg(0).to_js_string().as_str())),
            },
            Self::StartsWith => {
                Val::Bool(self.text(&receiver)?.starts_with(arg(0).to_js_string().as_str()))
            }
            Self::EndsWith => {
                Val::Bool(self.text(&receiver)?.ends_with(arg(0).to_js_string().as_str()))
            }
        };
        Ok(result)
    }

    /// String view of a receiver; calling a method on nothing is an error.
    fn text(self, receiver: &Val) -> Result<String, ScriptError> {
        if receiver.is_nullish() {
            return Err(self.unsupported(receiver));
        }
        Ok(receiver.to_js_string())
    }

    fn unsupported(self, receiver: &Val) -> ScriptError {
        ScriptError::Type(format!(
            "{}() is not supported on {}",
            self.name(),
            receiver.type_name()
        ))
    }
}

fn concat(builtin: Builtin, receiver: Val, rest: Vec<Val>) -> Result<Val, ScriptError> {
    if let Val::Array(mut items) = receiver {
        for value in rest {
            match value {
                Val::Array(more) => items.extend(more),
                other => items.push(other.into_json().unwrap_or(Value::Null)),
            }
        }
        return Ok(Val::Array(items));
    }
    let mut text = builtin.text(&receiver)?;
    for value in &rest {
        text.push_str(&value.to_js_string());
        check_length(text.len())?;
    }
    Ok(Val::Str(text))
}

fn split(text: String, separator: &Val, limit: &Val) -> Val {
    let limit = match limit {
        Val::Undefined => usize::MAX,
        other => as_index(to_integer(other).max(0.0)),
    };
    let parts: Vec<Value> = match separator {
        Val::Undefined => vec![Value::String(text)],
        other => {
            let separator = other.to_js_string();
            if separator.is_empty() {
                text.chars().map(|c| Value::String(c.to_string())).collect()
            } else {
                text.split(separator.as_str())
                    .map(|part| Value::String(part.to_string()))
                    .collect()
            }
        }
    };
    Val::Array(parts.into_iter().take(limit).collect())
}

pub(crate) fn check_length(len: usize) -> Result<(), ScriptError> {
    if len > MAX_STRING_BYTES {
        return Err(ScriptError::LimitExceeded {
            what: "string result",
            limit: MAX_STRING_BYTES,
        });
    }
    Ok(())
}

/// `ToIntegerOrInfinity`: `NaN` becomes zero, fractions truncate.
fn to_integer(value: &Val) -> f64 {
    let number = value.to_number();
    if number.is_nan() { 0.0 } else { number.trunc() }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn as_index(value: f64) -> usize {
    // Saturating float-to-int cast.
    value as usize
}

#[allow(clippy::cast_precision_loss)]
fn count(len: usize) -> f64 {
    len as f64
}

/// `substring` clamps into `[0, len]`.
fn clamp_index(value: &Val, len: usize) -> usize {
    as_index(to_integer(value).max(0.0)).min(len)
}

/// `slice` counts negative positions from the end.
fn slice_bounds(start: &Val, end: &Val, len: usize) -> (usize, usize) {
    let resolve = |value: &Val, default: usize| match value {
        Val::Undefined => default,
        value => {
            let position = to_integer(value);
            if position < 0.0 {
                len.saturating_sub(as_index(-position))
            } else {
                as_index(position).min(len)
            }
        }
    };
    let lo = resolve(start, 0);
    let hi = resolve(end, len);
    (lo, hi.max(lo))
}

/// `Math.round`: halves round toward positive infinity.
fn js_round(value: f64) -> f64 {
    if !value.is_finite() || value.fract() == 0.0 {
        return value;
    }
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(builtin: Builtin, args: Vec<Val>) -> Val {
        builtin.call(args).unwrap()
    }

    fn s(text: &str) -> Val {
        Val::Str(text.to_string())
    }

    #[test]
    fn resolves_aliases() {
        assert_eq!(Builtin::from_name("toUpperCase"), Some(Builtin::Upper));
        assert_eq!(Builtin::from_name("includes"), Some(Builtin::Contains));
        assert_eq!(Builtin::from_name("eval"), None);
    }

    #[test]
    fn substring_and_slice_follow_javascript() {
        assert_eq!(call(Builtin::Substring, vec![s("abcdef"), Val::Num(4.0), Val::Num(1.0)]), s("bcd"));
        assert_eq!(call(Builtin::Slice, vec![s("abcdef"), Val::Num(-2.0)]), s("ef"));
        assert_eq!(call(Builtin::Slice, vec![s("abc"), Val::Num(2.0), Val::Num(1.0)]), s(""));
    }

    #[test]
    fn replace_touches_first_occurrence_only() {
        assert_eq!(call(Builtin::Replace, vec![s("a-b-c"), s("-"), s("+")]), s("a+b-c"));
        assert_eq!(call(Builtin::ReplaceAll, vec![s("a-b-c"), s("-"), s("+")]), s("a+b+c"));
    }

    #[test]
    fn split_and_join_round_trip() {
        let parts = call(Builtin::Split, vec![s("a,b,c"), s(",")]);
        assert_eq!(call(Builtin::Join, vec![parts, s("|")]), s("a|b|c"));
        let limited = call(Builtin::Split, vec![s("a,b,c"), s(","), Val::Num(2.0)]);
        assert_eq!(call(Builtin::Length, vec![limited]), Val::Num(2.0));
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(call(Builtin::Round, vec![Val::Num(-2.5)]), Val::Num(-2.0));
        assert_eq!(call(Builtin::Round, vec![Val::Num(1.2345), Val::Num(2.0)]), Val::Num(1.23));
        assert_eq!(call(Builtin::Fixed, vec![Val::Num(2.345), Val::Num(1.0)]), s("2.3"));
    }

    #[test]
    fn default_and_coalesce_skip_missing_values() {
        assert_eq!(call(Builtin::Default, vec![s(""), s("n/a")]), s("n/a"));
        assert_eq!(call(Builtin::Default, vec![Val::Num(0.0), s("n/a")]), Val::Num(0.0));
        assert_eq!(
            call(Builtin::Coalesce, vec![Val::Undefined, Val::Null, s("x")]),
            s("x")
        );
    }

    #[test]
    fn string_methods_reject_missing_receiver() {
        assert!(matches!(Builtin::Upper.call(vec![Val::Null]), Err(ScriptError::Type(_))));
        assert!(matches!(Builtin::Join.call(vec![s("x")]), Err(ScriptError::Type(_))));
    }

    #[test]
    fn arity_is_checked() {
        assert!(Builtin::Replace.check_arity(2).is_err());
        assert!(Builtin::Concat.check_arity(5).is_ok());
        assert!(Builtin::Upper.check_arity(2).is_err());
    }

    #[test]
    fn replace_all_respects_result_limit() {
        let big = "a".repeat(1024);
        let replacement = "b".repeat(1024);
        assert!(matches!(
            Builtin::ReplaceAll.call(vec![s(&big), s("a"), s(&replacement)]),
            Err(ScriptError::LimitExceeded { .. })
        ));
    }
}
