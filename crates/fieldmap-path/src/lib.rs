//! Path accessor for nested JSON documents.
//!
//! Paths are dot-separated segments; a segment may carry a trailing
//! zero-based array index, as in `order.items[2].sku`. Reads never fail:
//! anything missing resolves to `None`. Writes create missing containers on
//! the way down and never fail either; a write that cannot be placed is
//! dropped and logged at debug level.

#![deny(unsafe_code)]

mod accessor;
mod segment;

pub use accessor::{MAX_ARRAY_INDEX, get, remove, set};
pub use segment::{Segment, parse_segment, segments};
