//! Chromatic adaptation transforms
//!
//! A von Kries-style transform scales cone responses: map both white points
//! into a cone space with `M`, build `D = diag(dst / src)`, and compose
//! `M^-1 * D * M`. Bradford is the default cone space; von Kries and CAT02
//! are selectable.
//!
//! The inverse cone matrices are derived from the forward constants once,
//! in f64, so `between(W, W)` is the identity to rounding.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::color::matrix::{diagonal, invert, mul_vec, multiply, Matrix3, IDENTITY};
use crate::color::{ChromaticityXY, TristimulusXYZ, SRGB_TO_XYZ, XYZ_TO_SRGB};
use crate::error::{Result, WbError};
use crate::image::LinearImage;
use crate::parallel::parallel_for_each_chunk_mut;

#[cfg(test)]
mod tests;

/// Cone responses below this are treated as zero.
const CONE_EPSILON: f64 = 1e-10;

const BRADFORD: Matrix3 = [
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
];

const VON_KRIES: Matrix3 = [
    [0.40024, 0.7076, -0.08081],
    [-0.2263, 1.16532, 0.0457],
    [0.0, 0.0, 0.91822],
];

const CAT02: Matrix3 = [
    [0.7328, 0.4296, -0.1624],
    [-0.7036, 1.6975, 0.0061],
    [0.0030, 0.0136, 0.9834],
];

// All three matrices are well conditioned; the identity arm is unreachable.
static BRADFORD_INV: Lazy<Matrix3> = Lazy::new(|| invert(&BRADFORD).unwrap_or(IDENTITY));
static VON_KRIES_INV: Lazy<Matrix3> = Lazy::new(|| invert(&VON_KRIES).unwrap_or(IDENTITY));
static CAT02_INV: Lazy<Matrix3> = Lazy::new(|| invert(&CAT02).unwrap_or(IDENTITY));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdaptationMethod {
    #[default]
    Bradford,
    VonKries,
    Cat02,
}

impl AdaptationMethod {
    pub fn cone_matrix(self) -> &'static Matrix3 {
        match self {
            Self::Bradford => &BRADFORD,
            Self::VonKries => &VON_KRIES,
            Self::Cat02 => &CAT02,
        }
    }

    pub fn inverse_cone_matrix(self) -> &'static Matrix3 {
        match self {
            Self::Bradford => &BRADFORD_INV,
            Self::VonKries => &VON_KRIES_INV,
            Self::Cat02 => &CAT02_INV,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bradford => "bradford",
            Self::VonKries => "von-kries",
            Self::Cat02 => "cat02",
        }
    }
}

impl fmt::Display for AdaptationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AdaptationMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bradford" => Ok(Self::Bradford),
            "von-kries" | "vonkries" | "von_kries" => Ok(Self::VonKries),
            "cat02" => Ok(Self::Cat02),
            _ => Err(format!(
                "Unknown adaptation method: {} (expected bradford, von-kries or cat02)",
                s
            )),
        }
    }
}

/// A 3x3 XYZ-to-XYZ adaptation between two white points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromaticAdaptation {
    pub method: AdaptationMethod,
    pub source: TristimulusXYZ,
    pub destination: TristimulusXYZ,
    pub matrix: Matrix3,
}

impl ChromaticAdaptation {
    /// The no-op transform, used when a real one cannot be built.
    pub fn identity(method: AdaptationMethod) -> Self {
        let d65 = ChromaticityXY::D65.to_xyz();
        Self {
            method,
            source: d65,
            destination: d65,
            matrix: IDENTITY,
        }
    }

    /// Build the transform from `source` to `destination` white XYZ.
    ///
    /// Both are normalized to Y = 1 first.
    ///
    /// # Errors
    /// `WbError::DegenerateWhitePoint` when either white has no luminance, a
    /// source cone response is near zero, or a destination response is not finite.
    pub fn between_xyz(
        source: TristimulusXYZ,
        destination: TristimulusXYZ,
        method: AdaptationMethod,
    ) -> Result<Self> {
        let source = source.normalized_luminance();
        let destination = destination.normalized_luminance();
        for (role, white) in [("source", source), ("destination", destination)] {
            if (white.y - 1.0).abs() > CONE_EPSILON {
                return Err(WbError::DegenerateWhitePoint(format!(
                    "{} white has luminance {:e}",
                    role, white.y
                )));
            }
        }
        let m = method.cone_matrix();

        let src_lms = mul_vec(m, source.to_array());
        let dst_lms = mul_vec(m, destination.to_array());

        let mut scale = [1.0; 3];
        for (i, s) in scale.iter_mut().enumerate() {
            if src_lms[i].abs() < CONE_EPSILON || !src_lms[i].is_finite() {
                return Err(WbError::DegenerateWhitePoint(format!(
                    "{} cone response {} of source white is {:e}",
                    method, i, src_lms[i]
                )));
            }
            if !dst_lms[i].is_finite() {
                return Err(WbError::DegenerateWhitePoint(format!(
                    "{} cone response {} of destination white is {:e}",
                    method, i, dst_lms[i]
                )));
            }
            *s = dst_lms[i] / src_lms[i];
        }

        let matrix = multiply(method.inverse_cone_matrix(), &multiply(&diagonal(scale), m));
        Ok(Self {
            method,
            source,
            destination,
            matrix,
        })
    }

    pub fn between_xy(
        source: ChromaticityXY,
        destination: ChromaticityXY,
        method: AdaptationMethod,
    ) -> Result<Self> {
        Self::between_xyz(source.to_xyz(), destination.to_xyz(), method)
    }

    /// Like [`ChromaticAdaptation::between_xy`] but falls back to identity.
    ///
    /// The failure is logged and handed back so callers can report it.
    pub fn between_xy_or_identity(
        source: ChromaticityXY,
        destination: ChromaticityXY,
        method: AdaptationMethod,
    ) -> (Self, Option<WbError>) {
        match Self::between_xy(source, destination, method) {
            Ok(cat) => (cat, None),
            Err(err) => {
                log::warn!("chromatic adaptation failed ({}); using identity", err);
                (Self::identity(method), Some(err))
            }
        }
    }

    pub fn apply_xyz(&self, xyz: TristimulusXYZ) -> TristimulusXYZ {
        TristimulusXYZ::from_array(mul_vec(&self.matrix, xyz.to_array()))
    }

    /// Apply `self`, then `next`.
    pub fn then(&self, next: &ChromaticAdaptation) -> Self {
        Self {
            method: self.method,
            source: self.source,
            destination: next.destination,
            matrix: multiply(&next.matrix, &self.matrix),
        }
    }

    /// The same adaptation expressed on linear sRGB values.
    pub fn to_linear_srgb(&self) -> Matrix3 {
        multiply(&XYZ_TO_SRGB, &multiply(&self.matrix, &SRGB_TO_XYZ))
    }

    pub fn apply_rgb(&self, rgb: [f64; 3]) -> [f64; 3] {
        mul_vec(&self.to_linear_srgb(), rgb)
    }

    /// Adapt a linear sRGB image in place, honoring its channel order.
    pub fn apply_to_image(&self, image: &mut LinearImage) {
        let m = self.to_linear_srgb();
        let order = image.order;
        parallel_for_each_chunk_mut(&mut image.data, 3, |px| {
            let [r, g, b] = order.to_rgb(px);
            let out = mul_vec(&m, [r as f64, g as f64, b as f64]);
            let stored = order.arrange(out);
            px[0] = stored[0] as f32;
            px[1] = stored[1] as f32;
            px[2] = stored[2] as f32;
        });
    }
}
