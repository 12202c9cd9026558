//! Locus approximators
//!
//! Two closed-form fits of the white locus: the CIE daylight fit
//! (Kim et al. cubic spline) and a Planckian fit (Krystek rational
//! polynomials in 1960 uv). Each fit clamps its input to its own domain.
//! A Duv computed against a point generated by the other fit is not zero,
//! so callers must keep the fit consistent for a given pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::{ChromaticityXY, UvCoordinate};

#[cfg(test)]
mod tests;

/// Daylight fit domain in Kelvin.
pub const DAYLIGHT_RANGE: (f64, f64) = (1667.0, 25000.0);

/// Planckian fit domain in Kelvin.
pub const PLANCKIAN_RANGE: (f64, f64) = (1000.0, 15000.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocusFit {
    /// CIE daylight cubic fit, 1667-25000 K
    #[default]
    Daylight,
    /// Krystek Planckian fit, 1000-15000 K
    Planckian,
}

impl LocusFit {
    /// Valid `(min, max)` Kelvin range; inputs outside it are clamped.
    pub fn domain(self) -> (f64, f64) {
        match self {
            Self::Daylight => DAYLIGHT_RANGE,
            Self::Planckian => PLANCKIAN_RANGE,
        }
    }

    pub fn clamp_kelvin(self, kelvin: f64) -> f64 {
        let (lo, hi) = self.domain();
        if kelvin.is_nan() {
            return 6500.0;
        }
        kelvin.clamp(lo, hi)
    }

    /// Kelvin values where the fit switches polynomial pieces.
    pub fn seams(self) -> &'static [f64] {
        match self {
            Self::Daylight => &[2222.0, 4000.0],
            Self::Planckian => &[],
        }
    }

    /// Chromaticity of the locus at `kelvin`.
    pub fn xy(self, kelvin: f64) -> ChromaticityXY {
        match self {
            Self::Daylight => daylight_xy(kelvin),
            Self::Planckian => planckian_xy(kelvin),
        }
    }

    /// Locus point in CIE 1960 uv.
    pub fn uv(self, kelvin: f64) -> UvCoordinate {
        match self {
            Self::Daylight => daylight_xy(kelvin).to_uv(),
            Self::Planckian => planckian_uv(kelvin),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daylight => "daylight",
            Self::Planckian => "planckian",
        }
    }
}

impl fmt::Display for LocusFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LocusFit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daylight" | "cie-daylight" => Ok(Self::Daylight),
            "planckian" | "blackbody" | "planck" => Ok(Self::Planckian),
            _ => Err(format!(
                "Unknown locus fit: {} (expected daylight or planckian)",
                s
            )),
        }
    }
}

/// Convenience wrapper around [`LocusFit::xy`].
pub fn locus_xy(fit: LocusFit, kelvin: f64) -> ChromaticityXY {
    fit.xy(kelvin)
}

/// CIE daylight locus (Kim et al.), clamped to 1667-25000 K.
#[allow(clippy::excessive_precision)]
pub fn daylight_xy(kelvin: f64) -> ChromaticityXY {
    let t = LocusFit::Daylight.clamp_kelvin(kelvin);
    let t2 = t * t;
    let t3 = t2 * t;

    let x = if t <= 4000.0 {
        -0.2661239e9 / t3 - 0.2343589e6 / t2 + 0.8776956e3 / t + 0.179910
    } else {
        -3.0258469e9 / t3 + 2.1070379e6 / t2 + 0.2226347e3 / t + 0.240390
    };

    let x2 = x * x;
    let x3 = x2 * x;
    let y = if t < 2222.0 {
        -1.1063814 * x3 - 1.34811020 * x2 + 2.18555832 * x - 0.20219683
    } else if t < 4000.0 {
        -0.9549476 * x3 - 1.37418593 * x2 + 2.09137015 * x - 0.16748867
    } else {
        3.0817580 * x3 - 5.87338670 * x2 + 3.75112997 * x - 0.37001483
    };

    ChromaticityXY::new(x, y)
}

/// Krystek's rational approximation of the Planckian locus in 1960 uv,
/// clamped to 1000-15000 K.
#[allow(clippy::excessive_precision)]
pub fn planckian_uv(kelvin: f64) -> UvCoordinate {
    let t = LocusFit::Planckian.clamp_kelvin(kelvin);
    let t2 = t * t;

    let u = (0.860117757 + 1.54118254e-4 * t + 1.28641212e-7 * t2)
        / (1.0 + 8.42420235e-4 * t + 7.08145163e-7 * t2);
    let v = (0.317398726 + 4.22806245e-5 * t + 4.20481691e-8 * t2)
        / (1.0 - 2.89741816e-5 * t + 1.61456053e-7 * t2);

    UvCoordinate::new_1960(u, v)
}

pub fn planckian_xy(kelvin: f64) -> ChromaticityXY {
    planckian_uv(kelvin).to_xy()
}
