//! Matrix-rigorous Kelvin/Duv to gain conversion
//!
//! The target illuminant is pushed backwards through the camera matrix to
//! find the raw response it would produce; the gains are the reciprocal of
//! that response.

use crate::color::matrix::{invert, mul_vec, transpose};
use crate::color::ChromaticityXY;
use crate::error::{Result, WbError};
use crate::gains::{GainBounds, WhiteBalanceGains};
use crate::locus::LocusFit;
use crate::scene::CameraColorProfile;
use crate::temperature::{xy_from_kelvin_duv, ColorTemperature, MAX_PLAUSIBLE_DUV};

/// Camera response (R, G, B) to a light of chromaticity `xy`, Y = 1.
///
/// # Errors
/// `WbError::SingularMatrix` when the camera block cannot be inverted.
pub fn camera_response(profile: &CameraColorProfile, xy: ChromaticityXY) -> Result<[f64; 3]> {
    let to_xyz = transpose(&profile.camera_matrix());
    let from_xyz = invert(&to_xyz)?;
    Ok(mul_vec(&from_xyz, xy.to_xyz().to_array()))
}

/// Gains that neutralize a light of chromaticity `xy` on this camera.
///
/// # Errors
/// `WbError::SingularMatrix` for an uninvertible matrix and
/// `WbError::DegenerateWhitePoint` when a channel response is not positive.
pub fn gains_from_xy_rigorous(
    profile: &CameraColorProfile,
    xy: ChromaticityXY,
    bounds: &GainBounds,
) -> Result<WhiteBalanceGains> {
    let response = camera_response(profile, xy)?;
    if response.iter().any(|c| !c.is_finite() || *c <= 0.0) {
        return Err(WbError::DegenerateWhitePoint(format!(
            "camera response {:?} to ({:.4}, {:.4}) is not positive",
            response, xy.x, xy.y
        )));
    }

    Ok(WhiteBalanceGains::from_array(response.map(|c| 1.0 / c))
        .normalized_to_green()
        .clamped(bounds))
}

/// Gains for `(kelvin, duv)` on `fit`, through the camera matrix.
///
/// Kelvin is clamped to the fit domain and Duv to +-0.1.
pub fn gains_from_kelvin_duv_rigorous(
    kelvin: f64,
    duv: f64,
    profile: &CameraColorProfile,
    fit: LocusFit,
    bounds: &GainBounds,
) -> Result<WhiteBalanceGains> {
    let duv = if duv.is_finite() {
        duv.clamp(-MAX_PLAUSIBLE_DUV, MAX_PLAUSIBLE_DUV)
    } else {
        0.0
    };
    let target = xy_from_kelvin_duv(kelvin, duv, fit);
    gains_from_xy_rigorous(profile, target, bounds)
}

/// Inverse direction: the light a set of neutralizing gains corresponds to.
pub fn kelvin_duv_from_gains(
    gains: &WhiteBalanceGains,
    profile: &CameraColorProfile,
    fit: LocusFit,
) -> ColorTemperature {
    if !gains.is_valid() {
        return ColorTemperature::REFERENCE;
    }
    let response = gains.to_array().map(|g| 1.0 / g);
    let xy = profile.camera_to_xyz_vector(response).to_xy();
    ColorTemperature::from_xy(xy, fit)
}
