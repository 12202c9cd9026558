//! Chromaticity math
//!
//! Provides the coordinate types the rest of the engine speaks (xy, XYZ,
//! 1960 uv and 1976 u'v'), the linear sRGB matrices, 3x3 matrix helpers,
//! and the standard illuminant table.

mod chromaticity;
mod illuminant;
pub mod matrix;

#[cfg(test)]
mod tests;

pub use chromaticity::{
    ChromaticityXY, TristimulusXYZ, UvCoordinate, UvSpace, SRGB_TO_XYZ, XYZ_TO_SRGB,
};
pub use illuminant::StandardIlluminant;
pub use matrix::{Matrix3, Vector3};
