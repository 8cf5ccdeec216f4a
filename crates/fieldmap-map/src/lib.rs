//! Mapping resolver and output builder.
//!
//! Reads each mapping's source value through the path accessor, runs it
//! through its transformation, and writes the result into a fresh target
//! document. Building never fails.
//!
//! # Example
//!
//! ```
//! use fieldmap_map::build;
//! use fieldmap_model::FieldMapping;
//! use serde_json::json;
//!
//! let output = build(&json!({"a": 1, "b": 2}), &[FieldMapping::direct("a", "x.y")]);
//! assert_eq!(output, json!({"x": {"y": 1}}));
//! ```

#![deny(unsafe_code)]

mod builder;

pub use builder::{BuildReport, OutputBuilder, build, build_batch, build_with_report};
