//! Kelvin/Duv to gain conversion
//!
//! Three named strategies:
//! - `matrix`: through the camera's color matrix (needs a profile)
//! - `fast-empirical-v1`: power law around 6500 K
//! - `fast-empirical-v2`: asymmetric linear blend around 6500 K
//!
//! The matrix strategy falls back to `fast-empirical-v1` when the camera
//! matrix is singular; the fallback is reported in [`GainConversion::source`].

mod empirical;
mod rigorous;


pub use empirical::{linear_blend_gains, power_law_gains, LINEAR_BLEND_RANGE, REFERENCE_KELVIN};
pub use rigorous::{
    camera_response, gains_from_kelvin_duv_rigorous, gains_from_xy_rigorous, kelvin_duv_from_gains,
};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WbError};
use crate::gains::{GainBounds, WhiteBalanceGains};
use crate::locus::LocusFit;
use crate::scene::CameraColorProfile;
use crate::temperature::{ColorTemperature, TINT_SCALE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GainStrategy {
    #[default]
    #[serde(rename = "matrix")]
    MatrixRigorous,
    #[serde(rename = "fast-empirical-v1")]
    FastEmpiricalV1,
    #[serde(rename = "fast-empirical-v2")]
    FastEmpiricalV2,
}

impl GainStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MatrixRigorous => "matrix",
            Self::FastEmpiricalV1 => "fast-empirical-v1",
            Self::FastEmpiricalV2 => "fast-empirical-v2",
        }
    }

    pub fn needs_profile(&self) -> bool {
        matches!(self, Self::MatrixRigorous)
    }
}

impl fmt::Display for GainStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GainStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "matrix" | "matrix-rigorous" | "rigorous" => Ok(Self::MatrixRigorous),
            "fast-empirical-v1" | "empirical-v1" | "power-law" => Ok(Self::FastEmpiricalV1),
            "fast-empirical-v2" | "empirical-v2" | "linear-blend" => Ok(Self::FastEmpiricalV2),
            _ => Err(format!(
                "Unknown gain strategy: {} \
                 (expected matrix, fast-empirical-v1 or fast-empirical-v2)",
                s
            )),
        }
    }
}

/// Shared knobs for every conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionSettings {
    pub bounds: GainBounds,
    pub fit: LocusFit,
    /// Fall back to `fast-empirical-v1` when the matrix path fails
    pub allow_fallback: bool,
    /// Display tint per unit Duv, as used by the empirical tint response
    pub tint_scale: f64,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            bounds: GainBounds::default(),
            fit: LocusFit::default(),
            allow_fallback: true,
            tint_scale: TINT_SCALE,
        }
    }
}

/// Whether the requested strategy produced the gains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GainSource {
    Requested,
    EmpiricalFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GainConversion {
    pub gains: WhiteBalanceGains,
    pub strategy: GainStrategy,
    pub source: GainSource,
}

/// Gains that neutralize a light of `(kelvin, duv)` under `strategy`.
///
/// # Errors
/// `WbError::MissingProfile` when the matrix strategy is requested without a
/// profile. A singular matrix or a non-positive camera response falls back to
/// `fast-empirical-v1` (logged), unless `settings.allow_fallback` is off, in
/// which case the matrix error is returned.
pub fn gains_for_target(
    kelvin: f64,
    duv: f64,
    strategy: GainStrategy,
    profile: Option<&CameraColorProfile>,
    settings: &ConversionSettings,
) -> Result<GainConversion> {
    let requested = |gains| GainConversion {
        gains,
        strategy,
        source: GainSource::Requested,
    };

    match strategy {
        GainStrategy::FastEmpiricalV1 => Ok(requested(power_law_gains(
            kelvin,
            duv,
            settings.tint_scale,
            &settings.bounds,
        ))),
        GainStrategy::FastEmpiricalV2 => Ok(requested(linear_blend_gains(
            kelvin,
            duv,
            settings.tint_scale,
            &settings.bounds,
        ))),
        GainStrategy::MatrixRigorous => {
            let profile = profile.ok_or(WbError::MissingProfile)?;
            let kelvin = settings.fit.clamp_kelvin(kelvin);
            let rigorous = gains_from_kelvin_duv_rigorous(
                kelvin,
                duv,
                profile,
                settings.fit,
                &settings.bounds,
            );
            match rigorous {
                Ok(gains) => Ok(requested(gains)),
                Err(err) if !settings.allow_fallback => Err(err),
                Err(err) => {
                    log::warn!(
                        "matrix gain conversion failed ({}); using {}",
                        err,
                        GainStrategy::FastEmpiricalV1
                    );
                    Ok(GainConversion {
                        gains: power_law_gains(kelvin, duv, settings.tint_scale, &settings.bounds),
                        strategy: GainStrategy::FastEmpiricalV1,
                        source: GainSource::EmpiricalFallback,
                    })
                }
            }
        }
    }
}

/// Relative gains for an image developed at `current` so it matches a
/// development at `desired`: `gains(desired) / gains(current)`.
pub fn correction_between(
    current: ColorTemperature,
    desired: ColorTemperature,
    strategy: GainStrategy,
    profile: Option<&CameraColorProfile>,
    settings: &ConversionSettings,
) -> Result<WhiteBalanceGains> {
    let from = gains_for_target(current.cct_kelvin, current.duv, strategy, profile, settings)?;
    let to = gains_for_target(desired.cct_kelvin, desired.duv, strategy, profile, settings)?;
    let relative = to.gains.relative_to(&from.gains);

    let normalized = match from.strategy {
        GainStrategy::MatrixRigorous => relative.normalized_to_green(),
        _ => relative.normalized_to_mean(),
    };
    Ok(normalized.clamped(&settings.bounds))
}
