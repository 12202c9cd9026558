//! Shared utilities for whitepoint-cli
//!
//! Argument parsing and image I/O used by the `whitepoint` subcommands.

pub mod parsers;
pub mod processing;

// Re-export commonly used items at the crate root for convenience
pub use parsers::{
    parse_adapt_target, parse_correction_target, parse_named, parse_quality, parse_xy, resolve_duv,
    AdaptMode,
};
pub use processing::{
    determine_output_path, load_input, write_jpeg, write_notes, write_tiff16, LoadedImage,
};
