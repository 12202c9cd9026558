//! Scene white-point recovery from camera metadata
//!
//! A camera's as-shot multipliers say what each channel was scaled by to
//! neutralize the light, so their reciprocals approximate the illuminant as
//! seen by the sensor. Projecting that through the camera-to-XYZ matrix
//! recovers the scene white point.

use serde::{Deserialize, Serialize};

use crate::color::matrix::{mul_vec, transpose, Matrix3};
use crate::color::{ChromaticityXY, TristimulusXYZ};
use crate::locus::LocusFit;
use crate::temperature::{is_plausible_white_point, ColorTemperature};


/// As-shot white-balance multipliers and the camera-to-XYZ matrix.
///
/// Both are indexed R, G1, B, G2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraColorProfile {
    pub white_balance_multipliers: [f64; 4],
    pub camera_to_xyz: [[f64; 3]; 4],
}

/// How a [`WhitePointEstimate`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhitePointSource {
    /// Recovered from the metadata and passed the plausibility check
    Measured,
    /// Replaced by the locus point at the estimated CCT
    LocusFallback,
    /// Replaced by D65
    D65Fallback,
}

impl WhitePointSource {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::Measured)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WhitePointEstimate {
    pub xy: ChromaticityXY,
    pub temperature: ColorTemperature,
    pub source: WhitePointSource,
}

impl CameraColorProfile {
    pub fn new(white_balance_multipliers: [f64; 4], camera_to_xyz: [[f64; 3]; 4]) -> Self {
        Self {
            white_balance_multipliers,
            camera_to_xyz,
        }
    }

    /// Widen the single-precision values LibRaw hands out.
    pub fn from_f32(cam_mul: [f32; 4], cam_xyz: [[f32; 3]; 4]) -> Self {
        let mut matrix = [[0.0; 3]; 4];
        for (row, src) in matrix.iter_mut().zip(cam_xyz.iter()) {
            for (cell, &v) in row.iter_mut().zip(src.iter()) {
                *cell = v as f64;
            }
        }
        Self::new(cam_mul.map(|v| v as f64), matrix)
    }

    /// `[R, G, B]` multipliers with the greens averaged.
    ///
    /// Non-positive or non-finite entries are treated as 1.0; a missing G2
    /// falls back to G1.
    pub fn effective_multipliers(&self) -> [f64; 3] {
        let sane = |v: f64| if v.is_finite() && v > 0.0 { v } else { 1.0 };
        let [r, g1, b, g2] = self.white_balance_multipliers;
        let g1 = sane(g1);
        let g2 = if g2.is_finite() && g2 > 0.0 { g2 } else { g1 };
        [sane(r), (g1 + g2) / 2.0, sane(b)]
    }

    /// Effective multipliers scaled so green = 1.
    pub fn normalized_multipliers(&self) -> [f64; 3] {
        let [r, g, b] = self.effective_multipliers();
        [r / g, 1.0, b / g]
    }

    /// Reciprocal of the normalized multipliers: the illuminant as the sensor saw it.
    pub fn scene_rgb_relative(&self) -> [f64; 3] {
        self.normalized_multipliers().map(|m| 1.0 / m)
    }

    /// Rows R, G1, B of the camera-to-XYZ matrix.
    pub fn camera_matrix(&self) -> Matrix3 {
        [
            self.camera_to_xyz[0],
            self.camera_to_xyz[1],
            self.camera_to_xyz[2],
        ]
    }

    /// Map a camera RGB response to XYZ: `XYZ = sum_i rgb[i] * row_i`.
    pub fn camera_to_xyz_vector(&self, rgb: [f64; 3]) -> TristimulusXYZ {
        let m = transpose(&self.camera_matrix());
        TristimulusXYZ::from_array(mul_vec(&m, rgb))
    }

    /// Un-validated scene white point, Y normalized to 1.
    pub fn scene_xyz(&self) -> TristimulusXYZ {
        self.camera_to_xyz_vector(self.scene_rgb_relative())
            .normalized_luminance()
    }
}

/// Recover the scene white point, falling back when the result is implausible.
///
/// Fallback order: the `fit` locus point at the estimated CCT, then D65.
/// The result is a pure function of `profile` and `fit`.
pub fn estimate_scene_white_point(
    profile: &CameraColorProfile,
    fit: LocusFit,
) -> WhitePointEstimate {
    let xy = profile.scene_xyz().to_xy();
    let temperature = ColorTemperature::from_xy(xy, fit);

    if is_plausible_white_point(xy, fit) {
        return WhitePointEstimate {
            xy,
            temperature,
            source: WhitePointSource::Measured,
        };
    }

    let cct_kelvin = fit.clamp_kelvin(temperature.cct_kelvin);
    let locus = fit.xy(cct_kelvin);
    if locus.is_finite() && locus.in_white_box() {
        log::debug!(
            "scene white point ({:.4}, {:.4}) implausible; using locus at {:.0} K",
            xy.x,
            xy.y,
            cct_kelvin
        );
        return WhitePointEstimate {
            xy: locus,
            temperature: ColorTemperature {
                cct_kelvin,
                duv: 0.0,
            },
            source: WhitePointSource::LocusFallback,
        };
    }

    log::debug!(
        "scene white point ({:.4}, {:.4}) and its locus point are implausible; using D65",
        xy.x,
        xy.y
    );
    WhitePointEstimate {
        xy: ChromaticityXY::D65,
        temperature: ColorTemperature::from_xy(ChromaticityXY::D65, fit),
        source: WhitePointSource::D65Fallback,
    }
}
