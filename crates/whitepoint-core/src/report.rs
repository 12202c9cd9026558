//! White-balance requests and reports
//!
//! `WbMode` and `CorrectionTarget` describe what the caller asked for;
//! `WhiteBalanceReport` and `BalanceNotes` describe what was found and done.

use std::fmt::{self, Write as _};

use serde::Serialize;

use crate::color::{ChromaticityXY, StandardIlluminant, UvCoordinate};
use crate::error::{Result, WbError};
use crate::estimators::WbAlgorithm;
use crate::gains::WhiteBalanceGains;
use crate::locus::LocusFit;
use crate::scene::{estimate_scene_white_point, CameraColorProfile, WhitePointSource};
use crate::temperature::{describe_kelvin, xy_from_kelvin_duv, ColorTemperature};

/// How the RAW decoder should white balance before the engine sees the data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WbMode {
    #[default]
    Camera,
    Auto,
    None,
    /// Explicit `[R, G1, B, G2]` multipliers
    User([f64; 4]),
}

impl WbMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Auto => "auto",
            Self::None => "none",
            Self::User(_) => "user",
        }
    }
}

impl fmt::Display for WbMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User([r, g1, b, g2]) => write!(f, "user:{},{},{},{}", r, g1, b, g2),
            other => f.write_str(other.name()),
        }
    }
}

impl std::str::FromStr for WbMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let lower = s.to_lowercase();
        if let Some(values) = lower.strip_prefix("user:") {
            let parsed: std::result::Result<Vec<f64>, _> =
                values.split(',').map(|v| v.trim().parse::<f64>()).collect();
            let parsed = parsed.map_err(|e| format!("Invalid user multipliers '{}': {}", s, e))?;
            let mul = match parsed.as_slice() {
                [r, g, b] => [*r, *g, *b, *g],
                [r, g1, b, g2] => [*r, *g1, *b, *g2],
                _ => {
                    return Err(format!(
                        "user mode needs 3 or 4 multipliers (user:R,G,B,G2), got {}",
                        parsed.len()
                    ))
                }
            };
            if mul.iter().any(|m| !m.is_finite() || *m <= 0.0) {
                return Err(format!("user multipliers must be positive: {}", s));
            }
            return Ok(Self::User(mul));
        }

        match lower.as_str() {
            "camera" => Ok(Self::Camera),
            "auto" => Ok(Self::Auto),
            "none" => Ok(Self::None),
            _ => Err(format!(
                "Unknown white balance mode: {} (expected camera, auto, none or user:R,G,B,G2)",
                s
            )),
        }
    }
}

/// The white point a correction should move toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CorrectionTarget {
    KelvinDuv { kelvin: f64, duv: f64 },
    Xy(ChromaticityXY),
    /// The white implied by a set of camera multipliers
    UserMultipliers([f64; 4]),
}

impl Default for CorrectionTarget {
    fn default() -> Self {
        Self::Xy(ChromaticityXY::D65)
    }
}

impl CorrectionTarget {
    pub fn from_illuminant(illuminant: StandardIlluminant) -> Self {
        Self::Xy(illuminant.xy())
    }

    /// Resolve to a chromaticity.
    ///
    /// # Errors
    /// `WbError::MissingProfile` for `UserMultipliers` without a profile,
    /// `WbError::InvalidArgument` for a non-finite target.
    pub fn resolve(
        &self,
        profile: Option<&CameraColorProfile>,
        fit: LocusFit,
    ) -> Result<ChromaticityXY> {
        let xy = match *self {
            Self::KelvinDuv { kelvin, duv } => {
                if !kelvin.is_finite() || !duv.is_finite() {
                    return Err(WbError::InvalidArgument(format!(
                        "target {} K / duv {} is not finite",
                        kelvin, duv
                    )));
                }
                xy_from_kelvin_duv(kelvin, duv, fit)
            }
            Self::Xy(xy) => xy,
            Self::UserMultipliers(mul) => {
                let profile = profile.ok_or(WbError::MissingProfile)?;
                let user = CameraColorProfile::new(mul, profile.camera_to_xyz);
                estimate_scene_white_point(&user, fit).xy
            }
        };
        if !xy.is_finite() {
            return Err(WbError::InvalidArgument(format!(
                "target chromaticity ({}, {}) is not finite",
                xy.x, xy.y
            )));
        }
        Ok(xy)
    }
}

/// Tint rounded to one decimal, the precision reports display.
fn round_tint(tint: f64) -> f64 {
    (tint * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenePoint {
    pub xy: ChromaticityXY,
    pub kelvin: f64,
    pub duv: f64,
    pub tint: f64,
    pub source: WhitePointSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetPoint {
    pub xy: ChromaticityXY,
    pub kelvin: f64,
    pub duv: f64,
    pub tint: f64,
}

/// Intermediate values of the scene recovery, for diagnosing odd metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDebug {
    pub cam_mul: [f64; 4],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_mul: Option<[f64; 4]>,
    pub cam_xyz: [[f64; 3]; 4],
    pub cam_mul_norm: [f64; 3],
    pub scene_rgb_rel: [f64; 3],
    pub scene_uv: UvCoordinate,
}

/// Scene white point, suggested target and the tint between them.
#[derive(Debug, Clone, Serialize)]
pub struct WhiteBalanceReport {
    pub file: String,
    pub scene: ScenePoint,
    pub target: TargetPoint,
    /// `target.tint - scene.tint`, both at display precision
    pub delta_tint: f64,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<ReportDebug>,
}

impl WhiteBalanceReport {
    pub fn build(
        file: impl Into<String>,
        profile: &CameraColorProfile,
        target: &CorrectionTarget,
        fit: LocusFit,
        tint_scale: f64,
    ) -> Result<Self> {
        let estimate = estimate_scene_white_point(profile, fit);
        let target_xy = target.resolve(Some(profile), fit)?;
        let target_temp = ColorTemperature::from_xy(target_xy, fit);

        let scene_tint = round_tint(estimate.temperature.duv * tint_scale);
        let target_tint = round_tint(target_temp.duv * tint_scale);

        Ok(Self {
            file: file.into(),
            scene: ScenePoint {
                xy: estimate.xy,
                kelvin: estimate.temperature.cct_kelvin,
                duv: estimate.temperature.duv,
                tint: scene_tint,
                source: estimate.source,
            },
            target: TargetPoint {
                xy: target_xy,
                kelvin: target_temp.cct_kelvin,
                duv: target_temp.duv,
                tint: target_tint,
            },
            delta_tint: round_tint(target_tint - scene_tint),
            description: describe_kelvin(estimate.temperature.cct_kelvin),
            debug: None,
        })
    }

    pub fn with_debug(mut self, profile: &CameraColorProfile, pre_mul: Option<[f64; 4]>) -> Self {
        self.debug = Some(ReportDebug {
            cam_mul: profile.white_balance_multipliers,
            pre_mul,
            cam_xyz: profile.camera_to_xyz,
            cam_mul_norm: profile.normalized_multipliers(),
            scene_rgb_rel: profile.scene_rgb_relative(),
            scene_uv: self.scene.xy.to_uv(),
        });
        self
    }

    /// Plain-text rendering for terminals.
    pub fn to_text(&self, verbose: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "File: {}", self.file);

        if let Some(debug) = &self.debug {
            let m = debug.cam_mul;
            let _ = writeln!(out, "--- Metadata ---");
            let _ = writeln!(out, "cam_mul: [{:.6}, {:.6}, {:.6}, {:.6}]", m[0], m[1], m[2], m[3]);
            if let Some(p) = debug.pre_mul {
                let _ = writeln!(
                    out,
                    "pre_mul: [{:.6}, {:.6}, {:.6}, {:.6}]",
                    p[0], p[1], p[2], p[3]
                );
            }
            let _ = writeln!(out, "cam_xyz:");
            for row in debug.cam_xyz {
                let _ = writeln!(out, "  [{:.6}, {:.6}, {:.6}]", row[0], row[1], row[2]);
            }
            let n = debug.cam_mul_norm;
            let _ = writeln!(out, "cam_mul_norm (G=1): [{:.6}, {:.6}, {:.6}]", n[0], n[1], n[2]);
            let s = debug.scene_rgb_rel;
            let _ = writeln!(out, "scene_rgb_rel: [{:.6}, {:.6}, {:.6}]", s[0], s[1], s[2]);
            let _ = writeln!(out, "scene_uv: ({:.4}, {:.4})", debug.scene_uv.u, debug.scene_uv.v);
            out.push('\n');
        }

        let _ = writeln!(out, "--- Scene illuminant ---");
        let _ = writeln!(out, "xy: ({:.4}, {:.4})", self.scene.xy.x, self.scene.xy.y);
        let _ = writeln!(out, "CCT: {:.0} K", self.scene.kelvin);
        let _ = writeln!(out, "Duv: {:.4}", self.scene.duv);
        let _ = writeln!(out, "Temp/Tint: {:.0}, {:.1}", self.scene.kelvin, self.scene.tint);
        if self.scene.source.is_fallback() {
            let _ = writeln!(out, "Source: {:?}", self.scene.source);
        }
        out.push('\n');

        let _ = writeln!(out, "--- Target ---");
        let _ = writeln!(out, "xy: ({:.4}, {:.4})", self.target.xy.x, self.target.xy.y);
        let _ = writeln!(out, "CCT: {:.0} K", self.target.kelvin);
        let _ = writeln!(out, "Duv: {:.4}", self.target.duv);
        let _ = writeln!(out, "Temp/Tint: {:.0}, {:.1}", self.target.kelvin, self.target.tint);
        let _ = writeln!(out, "Tint delta: {:.1}", self.delta_tint);
        if verbose {
            let _ = writeln!(out, "{}", self.description);
        }
        out
    }
}

/// Record of one `balance` run, written next to the output image.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceNotes {
    pub input: String,
    pub output: String,
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<WbAlgorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kelvin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duv: Option<f64>,
    pub gains: WhiteBalanceGains,
    pub mean_before: [f64; 3],
    pub mean_after: [f64; 3],
    /// Estimated from `mean_before` as linear sRGB
    pub estimate: ColorTemperature,
}

impl BalanceNotes {
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Input: {}", self.input);
        let _ = writeln!(out, "Output: {}", self.output);
        let _ = writeln!(out, "WB Mode: {}", self.mode);
        if let Some(algorithm) = self.algorithm {
            let _ = writeln!(out, "Algorithm: {}", algorithm);
        }
        if let Some(kelvin) = self.kelvin {
            let _ = writeln!(out, "Kelvin: {:.2}, Duv: {:.5}", kelvin, self.duv.unwrap_or(0.0));
        }
        let g = self.gains;
        let _ = writeln!(
            out,
            "Gains (R,G,B): {:.6}, {:.6}, {:.6}",
            g.red_gain, g.green_gain, g.blue_gain
        );
        let b = self.mean_before;
        let _ = writeln!(out, "Mean before (R,G,B): {:.6}, {:.6}, {:.6}", b[0], b[1], b[2]);
        let a = self.mean_after;
        let _ = writeln!(out, "Mean after (R,G,B): {:.6}, {:.6}, {:.6}", a[0], a[1], a[2]);
        let _ = writeln!(
            out,
            "CCT (estimated): {:.0} K, Duv: {:.4}",
            self.estimate.cct_kelvin, self.estimate.duv
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::matrix::transpose;
    use crate::color::SRGB_TO_XYZ;

    fn srgb_camera(multipliers: [f64; 4]) -> CameraColorProfile {
        let m = transpose(&SRGB_TO_XYZ);
        CameraColorProfile::new(multipliers, [m[0], m[1], m[2], m[1]])
    }

    #[test]
    fn test_parse_wb_mode() {
        assert_eq!("camera".parse::<WbMode>().unwrap(), WbMode::Camera);
        assert_eq!("AUTO".parse::<WbMode>().unwrap(), WbMode::Auto);
        assert_eq!("none".parse::<WbMode>().unwrap(), WbMode::None);
        assert_eq!(
            "user:2.0,1.0,1.5,1.0".parse::<WbMode>().unwrap(),
            WbMode::User([2.0, 1.0, 1.5, 1.0])
        );
        assert_eq!(
            "user:2,1,1.5".parse::<WbMode>().unwrap(),
            WbMode::User([2.0, 1.0, 1.5, 1.0])
        );
        assert!("user:2,1".parse::<WbMode>().is_err());
        assert!("user:2,0,1,1".parse::<WbMode>().is_err());
        assert!("daylight".parse::<WbMode>().is_err());
    }

    #[test]
    fn test_wb_mode_display_round_trips() {
        let mode = WbMode::User([2.5, 1.0, 1.25, 1.0]);
        assert_eq!(mode.to_string().parse::<WbMode>().unwrap(), mode);
    }

    #[test]
    fn test_report_for_neutral_camera_targets_d65() {
        let profile = srgb_camera([1.0, 1.0, 1.0, 1.0]);
        let target = CorrectionTarget::default();
        let fit = LocusFit::Daylight;
        let report = WhiteBalanceReport::build("a.raw", &profile, &target, fit, 3000.0).unwrap();

        assert_eq!(report.scene.source, WhitePointSource::Measured);
        // matrix white and the rounded D65 constant sit about 1.6 K apart
        assert!(
            (report.scene.kelvin - report.target.kelvin).abs() < 5.0,
            "scene {} K, target {} K",
            report.scene.kelvin,
            report.target.kelvin
        );
        assert!(report.delta_tint.abs() < 0.15, "{}", report.delta_tint);
        assert!(report.debug.is_none());
    }

    #[test]
    fn test_delta_tint_uses_rounded_values() {
        let profile = srgb_camera([1.0, 1.0, 2.5, 1.0]);
        let report = WhiteBalanceReport::build(
            "warm.raw",
            &profile,
            &CorrectionTarget::KelvinDuv {
                kelvin: 6500.0,
                duv: 0.01,
            },
            LocusFit::Daylight,
            3000.0,
        )
        .unwrap();
        assert!((report.target.tint - 30.0).abs() < 0.2, "{}", report.target.tint);
        let expected = round_tint(report.target.tint - report.scene.tint);
        assert!((report.delta_tint - expected).abs() < 1e-9);
        assert!(report.scene.kelvin < 5000.0);
    }

    #[test]
    fn test_debug_block_and_json() {
        let profile = srgb_camera([2.0, 1.0, 1.5, 1.0]);
        let target = CorrectionTarget::default();
        let fit = LocusFit::Daylight;
        let report = WhiteBalanceReport::build("b.raw", &profile, &target, fit, 3000.0)
            .unwrap()
            .with_debug(&profile, None);
        let debug = report.debug.as_ref().unwrap();
        assert!((debug.cam_mul_norm[0] - 2.0).abs() < 1e-12);
        assert!((debug.scene_rgb_rel[2] - 1.0 / 1.5).abs() < 1e-12);

        let text = report.to_text(true);
        assert!(text.contains("cam_mul_norm"));
        assert!(text.contains("Tint delta"));
    }

    #[test]
    fn test_user_multiplier_target_needs_profile() {
        let target = CorrectionTarget::UserMultipliers([2.0, 1.0, 1.5, 1.0]);
        assert!(matches!(
            target.resolve(None, LocusFit::Daylight),
            Err(WbError::MissingProfile)
        ));

        let profile = srgb_camera([1.0, 1.0, 1.0, 1.0]);
        let neutral = CorrectionTarget::UserMultipliers([1.0, 1.0, 1.0, 1.0])
            .resolve(Some(&profile), LocusFit::Daylight)
            .unwrap();
        assert!((neutral.x - ChromaticityXY::D65.x).abs() < 1e-3);
    }

    #[test]
    fn test_non_finite_target_is_rejected() {
        let target = CorrectionTarget::KelvinDuv {
            kelvin: f64::NAN,
            duv: 0.0,
        };
        assert!(matches!(
            target.resolve(None, LocusFit::Daylight),
            Err(WbError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_notes_text() {
        let notes = BalanceNotes {
            input: "in.tif".into(),
            output: "out.jpg".into(),
            mode: "auto".into(),
            algorithm: Some(WbAlgorithm::GrayWorld),
            kelvin: None,
            duv: None,
            gains: WhiteBalanceGains::new(0.8, 1.0, 1.25),
            mean_before: [0.6, 0.5, 0.4],
            mean_after: [0.5, 0.5, 0.5],
            estimate: ColorTemperature::from_linear_srgb([0.6, 0.5, 0.4], LocusFit::Daylight),
        };
        let text = notes.to_text();
        assert!(text.contains("Algorithm: gray-world"));
        assert!(text.contains("Gains (R,G,B): 0.800000, 1.000000, 1.250000"));
        assert!(!text.contains("Kelvin"));
    }
}
