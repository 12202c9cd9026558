//! Parsing functions for CLI arguments.

mod base;
mod target;

pub use base::{parse_named, parse_quality, parse_xy};
pub use target::{parse_adapt_target, parse_correction_target, resolve_duv, AdaptMode};
