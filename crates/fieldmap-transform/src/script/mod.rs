//! The restricted expression language behind `customScript`.
//!
//! A script is a single expression over the bound name `source`, optionally
//! written as `return <expr>;`. It supports literals, arithmetic, comparison
//! and logical operators, the conditional operator, property and index
//! access, and calls to a fixed set of builtins (`source.trim()` is the same
//! as `trim(source)`). Nothing else is reachable: there is no assignment,
//! no global scope, and no I/O.

mod builtins;
mod eval;
mod lexer;
mod parser;
mod value;

use serde_json::Value;

use crate::error::ScriptError;
use parser::Expr;
use value::Val;

/// Longest accepted script text, in bytes.
pub const MAX_SOURCE_BYTES: usize = 4096;
/// Deepest accepted expression nesting.
pub const MAX_DEPTH: usize = 64;
/// Longest string a script may produce, in bytes.
pub const MAX_STRING_BYTES: usize = 64 * 1024;

/// A compiled script, reusable across values.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    body: Expr,
}

impl Script {
    pub fn compile(code: &str) -> Result<Self, ScriptError> {
        if code.len() > MAX_SOURCE_BYTES {
            return Err(ScriptError::LimitExceeded {
                what: "script length",
                limit: MAX_SOURCE_BYTES,
            });
        }
        let tokens = lexer::tokenize(code)?;
        let body = parser::parse(&tokens, code.len())?;
        if body.depth() > MAX_DEPTH {
            return Err(ScriptError::LimitExceeded {
                what: "nesting depth",
                limit: MAX_DEPTH,
            });
        }
        Ok(Self { body })
    }

    /// Evaluate with `source` bound to `value`. `None` in, or an
    /// `undefined` result, is an absent value.
    pub fn eval(&self, value: Option<&Value>) -> Result<Option<Value>, ScriptError> {
        let source = Val::from_json(value);
        eval::evaluate(&self.body, &source).map(Val::into_json)
    }
}

/// Compile and run `code` once.
pub fn evaluate(code: &str, value: Option<&Value>) -> Result<Option<Value>, ScriptError> {
    Script::compile(code)?.eval(value)
}
