//! Tree-walking evaluator.

use std::cmp::Ordering;

use super::builtins::check_length;
use super::parser::{BinaryOp, Expr, LogicalOp, UnaryOp};
use super::value::{Val, loose_eq, strict_eq};
use crate::error::ScriptError;

pub(crate) fn evaluate(expr: &Expr, source: &Val) -> Result<Val, ScriptError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Source => Ok(source.clone()),
        Expr::Unary(op, operand) => {
            let value = evaluate(operand, source)?;
            Ok(match op {
                UnaryOp::Not => Val::Bool(!value.truthy()),
                UnaryOp::Neg => Val::Num(-value.to_number()),
            })
        }
        Expr::Binary(op, left, right) => {
            let left = evaluate(left, source)?;
            let right = evaluate(right, source)?;
            binary(*op, left, right)
        }
        Expr::Logical(op, left, right) => {
            let left = evaluate(left, source)?;
            let short_circuit = match op {
                LogicalOp::And => !left.truthy(),
                LogicalOp::Or => left.truthy(),
            };
            if short_circuit {
                Ok(left)
            } else {
                evaluate(right, source)
            }
        }
        Expr::Conditional(cond, then, other) => {
            if evaluate(cond, source)?.truthy() {
                evaluate(then, source)
            } else {
                evaluate(other, source)
            }
        }
        Expr::Member(object, key) => member(evaluate(object, source)?, key),
        Expr::Index(object, index) => {
            let object = evaluate(object, source)?;
            let key = evaluate(index, source)?.to_js_string();
            member(object, &key)
        }
        Expr::Call(builtin, args) => {
            let values = args
                .iter()
                .map(|arg| evaluate(arg, source))
                .collect::<Result<Vec<_>, _>>()?;
            let result = builtin.call(values)?;
            if let Val::Str(text) = &result {
                check_length(text.len())?;
            }
            Ok(result)
        }
    }
}

/// Property read. Reading from `null` or `undefined` is a type error.
fn member(object: Val, key: &str) -> Result<Val, ScriptError> {
    let value = match object {
        Val::Undefined | Val::Null => {
            return Err(ScriptError::Type(format!(
                "cannot read `{key}` of {}",
                object.type_name()
            )));
        }
        Val::Str(text) => match key {
            "length" => Val::Num(len_f64(text.chars().count())),
            _ => key
                .parse::<usize>()
                .ok()
                .and_then(|index| text.chars().nth(index))
                .map_or(Val::Undefined, |c| Val::Str(c.to_string())),
        },
        Val::Array(items) => match key {
            "length" => Val::Num(len_f64(items.len())),
            _ => key
                .parse::<usize>()
                .ok()
                .and_then(|index| items.into_iter().nth(index))
                .map_or(Val::Undefined, Val::from_owned),
        },
        Val::Object(mut map) => map.swap_remove(key).map_or(Val::Undefined, Val::from_owned),
        Val::Bool(_) | Val::Num(_) => Val::Undefined,
    };
    Ok(value)
}

#[allow(clippy::cast_precision_loss)]
fn len_f64(len: usize) -> f64 {
    len as f64
}

fn binary(op: BinaryOp, left: Val, right: Val) -> Result<Val, ScriptError> {
    let result = match op {
        BinaryOp::Add => add(left, right)?,
        BinaryOp::Sub => Val::Num(left.to_number() - right.to_number()),
        BinaryOp::Mul => Val::Num(left.to_number() * right.to_number()),
        BinaryOp::Div => Val::Num(left.to_number() / right.to_number()),
        BinaryOp::Rem => Val::Num(left.to_number() % right.to_number()),
        BinaryOp::Lt => Val::Bool(compare(left, right) == Some(Ordering::Less)),
        BinaryOp::Le => Val::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::Gt => Val::Bool(compare(left, right) == Some(Ordering::Greater)),
        BinaryOp::Ge => Val::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        BinaryOp::LooseEq => Val::Bool(loose_eq(&left, &right)),
        BinaryOp::LooseNe => Val::Bool(!loose_eq(&left, &right)),
        BinaryOp::StrictEq => Val::Bool(strict_eq(&left, &right)),
        BinaryOp::StrictNe => Val::Bool(!strict_eq(&left, &right)),
    };
    Ok(result)
}

/// `+` concatenates as soon as either side is a string after conversion.
fn add(left: Val, right: Val) -> Result<Val, ScriptError> {
    match (left.to_primitive(), right.to_primitive()) {
        (left @ Val::Str(_), right) | (left, right @ Val::Str(_)) => {
            let mut text = left.to_js_string();
            text.push_str(&right.to_js_string());
            check_length(text.len())?;
            Ok(Val::Str(text))
        }
        (left, right) => Ok(Val::Num(left.to_number() + right.to_number())),
    }
}

/// Strings compare lexically, everything else numerically; `NaN` is unordered.
fn compare(left: Val, right: Val) -> Option<Ordering> {
    match (left.to_primitive(), right.to_primitive()) {
        (Val::Str(a), Val::Str(b)) => Some(a.cmp(&b)),
        (a, b) => a.to_number().partial_cmp(&b.to_number()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_nested_properties() {
        let source = Val::from_owned(json!({"name": {"first": "Ada"}, "tags": ["x", "y"]}));
        let object = member(source.clone(), "name").unwrap();
        assert_eq!(member(object, "first").unwrap(), Val::Str("Ada".into()));
        let tags = member(source, "tags").unwrap();
        assert_eq!(member(tags.clone(), "length").unwrap(), Val::Num(2.0));
        assert_eq!(member(tags, "5").unwrap(), Val::Undefined);
    }

    #[test]
    fn reading_from_nothing_is_a_type_error() {
        assert!(matches!(member(Val::Undefined, "x"), Err(ScriptError::Type(_))));
    }

    #[test]
    fn plus_prefers_concatenation() {
        assert_eq!(add(Val::Num(1.0), Val::Str("2".into())).unwrap(), Val::Str("12".into()));
        assert_eq!(add(Val::Num(1.0), Val::Bool(true)).unwrap(), Val::Num(2.0));
        assert_eq!(add(Val::Null, Val::Num(1.0)).unwrap(), Val::Num(1.0));
    }

    #[test]
    fn comparisons_handle_nan_and_strings() {
        assert_eq!(compare(Val::Num(f64::NAN), Val::Num(1.0)), None);
        assert_eq!(
            compare(Val::Str("10".into()), Val::Str("9".into())),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare(Val::Str("10".into()), Val::Num(9.0)),
            Some(Ordering::Greater)
        );
    }
}
