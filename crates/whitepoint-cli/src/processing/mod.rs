//! Image loading and export for the CLI commands.

mod input;
mod output;

pub use input::{
    decode_tiff, determine_output_path, is_tiff_path, load_input, LoadedImage, TIFF_EXTENSIONS,
};
pub use output::{
    encode_srgb8, linear_path, linear_to_srgb, notes_path, write_jpeg, write_notes, write_tiff16,
};

#[cfg(test)]
mod tests;
