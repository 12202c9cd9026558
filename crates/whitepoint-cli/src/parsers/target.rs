//! Correction target and tint parsing.

use whitepoint_core::color::StandardIlluminant;
use whitepoint_core::{CorrectionTarget, WbMode};

use super::base::parse_xy;

/// Build the correction target from `--target`, `--kelvin`/`--duv` and `--xy`.
///
/// `--target` takes an illuminant name (D65, D50, A, ...) or camera
/// multipliers as `user:R,G,B,G2`. With nothing given the target is D65.
pub fn parse_correction_target(
    target: Option<&str>,
    kelvin: Option<f64>,
    duv: Option<f64>,
    xy: Option<&str>,
) -> Result<CorrectionTarget, String> {
    let given = [target.is_some(), kelvin.is_some(), xy.is_some()]
        .iter()
        .filter(|&&g| g)
        .count();
    if given > 1 {
        return Err("--target, --kelvin and --xy are mutually exclusive".to_string());
    }
    if duv.is_some() && kelvin.is_none() {
        return Err("--duv requires --kelvin".to_string());
    }

    if let Some(kelvin) = kelvin {
        if !kelvin.is_finite() || kelvin <= 0.0 {
            return Err(format!("Kelvin must be positive, got {}", kelvin));
        }
        let duv = duv.unwrap_or(0.0);
        if !duv.is_finite() {
            return Err(format!("Invalid duv value: {}", duv));
        }
        return Ok(CorrectionTarget::KelvinDuv { kelvin, duv });
    }

    if let Some(xy) = xy {
        return parse_xy(xy).map(CorrectionTarget::Xy);
    }

    match target {
        Some(name) if name.trim().to_lowercase().starts_with("user:") => {
            match name.parse::<WbMode>()? {
                WbMode::User(mul) => Ok(CorrectionTarget::UserMultipliers(mul)),
                other => Err(format!("Unexpected target mode: {}", other)),
            }
        }
        Some(name) => name
            .parse::<StandardIlluminant>()
            .map(CorrectionTarget::from_illuminant),
        None => Ok(CorrectionTarget::default()),
    }
}

/// Duv from either `--tint` (display units) or `--duv`; zero when neither is given.
pub fn resolve_duv(tint: Option<f64>, duv: Option<f64>, tint_scale: f64) -> Result<f64, String> {
    match (tint, duv) {
        (Some(_), Some(_)) => Err("--tint and --duv are mutually exclusive".to_string()),
        (Some(tint), None) if tint.is_finite() => Ok(tint / tint_scale),
        (None, Some(duv)) if duv.is_finite() => Ok(duv),
        (None, None) => Ok(0.0),
        (tint, duv) => Err(format!(
            "Invalid tint/duv value: {}",
            tint.or(duv).unwrap_or(f64::NAN)
        )),
    }
}

/// Source/target selection for `adapt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdaptMode {
    /// Camera-recorded white to D65
    #[default]
    Camera,
    /// Same as `Camera`; the decoder's auto white balance is not consulted
    Auto,
    /// D65 to `--kelvin`/`--duv`
    Kelvin,
    /// D65 to `--xy`
    Xy,
}

impl AdaptMode {
    pub fn uses_camera_white(&self) -> bool {
        matches!(self, Self::Camera | Self::Auto)
    }
}

impl std::str::FromStr for AdaptMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "camera" => Ok(Self::Camera),
            "auto" => Ok(Self::Auto),
            "kelvin" => Ok(Self::Kelvin),
            "xy" => Ok(Self::Xy),
            _ => Err(format!(
                "Unknown adapt mode: {} (expected camera, auto, kelvin or xy)",
                s
            )),
        }
    }
}

/// The white `adapt` moves toward in `mode`.
pub fn parse_adapt_target(
    mode: AdaptMode,
    kelvin: Option<f64>,
    duv: Option<f64>,
    xy: Option<&str>,
) -> Result<CorrectionTarget, String> {
    match mode {
        AdaptMode::Kelvin => {
            if kelvin.is_none() {
                return Err("--mode kelvin requires --kelvin".to_string());
            }
            parse_correction_target(None, kelvin, duv, None)
        }
        AdaptMode::Xy => match xy {
            Some(xy) => parse_correction_target(None, None, None, Some(xy)),
            None => Err("--mode xy requires --xy".to_string()),
        },
        AdaptMode::Camera | AdaptMode::Auto => {
            if kelvin.is_some() || duv.is_some() || xy.is_some() {
                log::warn!("--kelvin/--duv/--xy are ignored in {:?} mode", mode);
            }
            Ok(CorrectionTarget::default())
        }
    }
}
