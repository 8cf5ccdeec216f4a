//! Library components of the `fieldmap` command-line tool.

#![deny(unsafe_code)]

pub mod logging;
pub mod pipeline;
pub mod settings;
