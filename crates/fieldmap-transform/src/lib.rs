//! Value transformation pipeline.
//!
//! Applies one [`Transformation`](fieldmap_model::Transformation) to one
//! source value. The pipeline is pure and total: unsupported inputs and
//! failing scripts return the original value, and nothing here panics.
//!
//! Coercions (truthiness, `Number()`, `toFixed`, string conversion) follow
//! JavaScript so that mapping configurations behave the way their authors
//! saw them behave in the browser.
//!
//! # Example
//!
//! ```
//! use fieldmap_model::{NumberStyle, Transformation};
//! use fieldmap_transform::Apply;
//! use serde_json::json;
//!
//! let decimal2 = Transformation::NumberFormat(Some(NumberStyle::Decimal2));
//! assert_eq!(decimal2.apply(Some(&json!(5))), Some(json!("5.00")));
//! ```

#![deny(unsafe_code)]

mod coerce;
mod datetime;
mod error;
mod executors;
mod numeric;
mod pipeline;
pub mod script;

pub use coerce::{is_truthy, js_string};
pub use datetime::{format_instant, parse_date_text, parse_instant};
pub use error::{Result, ScriptError, TransformError};
pub use numeric::{format_number, json_number, parse_number, to_fixed, to_number};
pub use pipeline::{Apply, apply, is_inert};
pub use script::Script;
