//! Dispatch from a [`Transformation`] to its executor.

use fieldmap_model::{TransformKind, Transformation};
use serde_json::Value;

use crate::executors;

/// Apply `transformation` to a single source value.
///
/// Total: never panics and never fails. `None` stands for an absent value
/// and may be returned as such.
#[must_use]
pub fn apply(value: Option<&Value>, transformation: &Transformation) -> Option<Value> {
    match transformation {
        Transformation::Direct => value.cloned(),
        Transformation::Lookup(table) => executors::lookup(value, table.as_ref()),
        Transformation::StringManipulation(op) => executors::string_manipulation(value, *op),
        Transformation::NumberFormat(style) => executors::number_format(value, *style),
        Transformation::DateFormat(style) => executors::date_format(value, *style),
        Transformation::CustomScript(code) => executors::custom_script(value, code.as_deref()),
        Transformation::Unrecognized { .. } => value.cloned(),
    }
}

/// Method-call form of [`apply`].
pub trait Apply {
    fn apply(&self, value: Option<&Value>) -> Option<Value>;
}

impl Apply for Transformation {
    fn apply(&self, value: Option<&Value>) -> Option<Value> {
        apply(value, self)
    }
}

/// True when a configurable transformation lacks a usable config and will
/// pass every value through.
#[must_use]
pub fn is_inert(transformation: &Transformation) -> bool {
    match transformation {
        Transformation::Direct => false,
        Transformation::Lookup(table) => table.is_none(),
        Transformation::StringManipulation(op) => op.is_none(),
        Transformation::NumberFormat(style) => style.is_none(),
        Transformation::DateFormat(style) => style.is_none(),
        Transformation::CustomScript(code) => code.as_deref().is_none_or(str::is_empty),
        Transformation::Unrecognized { kind, .. } => *kind != TransformKind::Direct,
    }
}
