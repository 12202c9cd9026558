//! CCT and Duv estimation
//!
//! `cct_from_xy` is McCamy's closed form. It is fast but drifts by more than
//! 100 K near the ends of the locus, so [`xy_to_kelvin`] uses it only as a
//! seed and then searches the chosen locus fit for the nearest point. Duv is
//! the signed distance to that point in CIE 1960 uv.
//!
//! Sign convention: positive Duv lies above the locus (higher v, green),
//! negative Duv lies below it (magenta). Tint is the display value
//! `duv * 3000` and carries the same sign.

use serde::{Deserialize, Serialize};

use crate::color::{ChromaticityXY, TristimulusXYZ, UvCoordinate};
use crate::locus::LocusFit;


/// McCamy output range in Kelvin.
pub const MIN_CCT: f64 = 1000.0;
pub const MAX_CCT: f64 = 40000.0;

/// Display scale between Duv and UI tint.
pub const TINT_SCALE: f64 = 3000.0;

/// Largest |Duv| still accepted as a plausible white point.
pub const MAX_PLAUSIBLE_DUV: f64 = 0.1;

/// Kelvin step used for the numerical locus tangent.
const TANGENT_STEP_K: f64 = 10.0;

/// Golden-section iterations for the nearest-locus search (interval shrinks by 0.618 each).
const SEARCH_ITERATIONS: usize = 80;

/// Correlated color temperature plus signed distance from the locus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorTemperature {
    pub cct_kelvin: f64,
    pub duv: f64,
}

impl ColorTemperature {
    /// 6500 K on the locus, the reference point for every fallback.
    pub const REFERENCE: ColorTemperature = ColorTemperature {
        cct_kelvin: 6500.0,
        duv: 0.0,
    };

    /// Estimate CCT and Duv of a chromaticity against `fit`.
    pub fn from_xy(xy: ChromaticityXY, fit: LocusFit) -> Self {
        if !xy.is_finite() {
            return Self::REFERENCE;
        }
        let cct_kelvin = xy_to_kelvin(xy, fit);
        Self {
            cct_kelvin,
            duv: duv_at(xy, cct_kelvin, fit),
        }
    }

    /// Estimate from averaged linear sRGB values (linear sRGB -> XYZ -> xy).
    pub fn from_linear_srgb(mean_rgb: [f64; 3], fit: LocusFit) -> Self {
        Self::from_xy(TristimulusXYZ::from_linear_srgb(mean_rgb).to_xy(), fit)
    }

    pub fn tint(&self) -> f64 {
        tint_from_duv(self.duv)
    }

    /// Chromaticity this temperature/Duv pair describes on `fit`.
    pub fn to_xy(&self, fit: LocusFit) -> ChromaticityXY {
        xy_from_kelvin_duv(self.cct_kelvin, self.duv, fit)
    }
}

impl Default for ColorTemperature {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// McCamy's cubic CCT approximation, clamped to `[1000, 40000]`.
///
/// Returns 6500 K when the epicenter denominator vanishes.
pub fn cct_from_xy(xy: ChromaticityXY) -> f64 {
    let denom = 0.1858 - xy.y;
    if denom.abs() < 1e-12 || !xy.is_finite() {
        return 6500.0;
    }
    let n = (xy.x - 0.3320) / denom;
    let cct = 449.0 * n.powi(3) + 3525.0 * n.powi(2) + 6823.3 * n + 5520.33;
    if cct.is_nan() {
        return 6500.0;
    }
    cct.clamp(MIN_CCT, MAX_CCT)
}

/// Kelvin of the point on `fit` nearest to `xy` in 1960 uv.
///
/// The search brackets a factor of three around the McCamy seed, in mired
/// space, intersected with the fit domain. Seeds outside the domain are
/// returned unchanged since the fit cannot refine them.
pub fn xy_to_kelvin(xy: ChromaticityXY, fit: LocusFit) -> f64 {
    let seed = cct_from_xy(xy);
    let (lo, hi) = fit.domain();
    if seed < lo || seed > hi {
        return seed;
    }

    let target = xy.to_uv();
    let distance_at = |kelvin: f64| {
        let p = fit.uv(kelvin);
        (p.u - target.u).powi(2) + (p.v - target.v).powi(2)
    };
    let distance_sq = |mired: f64| distance_at(1e6 / mired);

    let (k_lo, k_hi) = ((seed / 3.0).max(lo), (seed * 3.0).min(hi));
    let golden = (5f64.sqrt() - 1.0) / 2.0;
    let mut a = 1e6 / k_hi;
    let mut b = 1e6 / k_lo;
    let mut c = b - golden * (b - a);
    let mut d = a + golden * (b - a);
    let mut fc = distance_sq(c);
    let mut fd = distance_sq(d);

    for _ in 0..SEARCH_ITERATIONS {
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - golden * (b - a);
            fc = distance_sq(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + golden * (b - a);
            fd = distance_sq(d);
        }
    }

    // Piecewise fits are discontinuous at their seams, which the search
    // can only approach from one side
    let mut best = 1e6 / ((a + b) / 2.0);
    let mut best_distance = distance_at(best);
    let seams = fit.seams().iter().filter(|&&k| k >= k_lo && k <= k_hi);
    for &candidate in std::iter::once(&seed).chain(seams) {
        let distance = distance_at(candidate);
        if distance < best_distance {
            best = candidate;
            best_distance = distance;
        }
    }
    best
}

/// Signed Duv of `xy` measured against the locus point of `fit` at `kelvin`.
pub fn duv_at(xy: ChromaticityXY, kelvin: f64, fit: LocusFit) -> f64 {
    let query = xy.to_uv();
    let locus = fit.uv(kelvin);
    let distance = query.distance(locus);
    if !distance.is_finite() {
        return 0.0;
    }
    if query.v >= locus.v {
        distance
    } else {
        -distance
    }
}

/// Signed Duv of `xy` against `fit`.
pub fn duv(xy: ChromaticityXY, fit: LocusFit) -> f64 {
    ColorTemperature::from_xy(xy, fit).duv
}

/// Locus point at `kelvin` offset by `duv` along the locus normal in 1960 uv.
///
/// The normal always points toward higher v so positive Duv is green.
pub fn xy_from_kelvin_duv(kelvin: f64, duv: f64, fit: LocusFit) -> ChromaticityXY {
    let kelvin = fit.clamp_kelvin(kelvin);
    let base = fit.uv(kelvin);
    if duv == 0.0 || !duv.is_finite() {
        return base.to_xy();
    }

    let (_, hi) = fit.domain();
    let (du, dv) = if kelvin + TANGENT_STEP_K <= hi {
        let next = fit.uv(kelvin + TANGENT_STEP_K);
        (next.u - base.u, next.v - base.v)
    } else {
        let prev = fit.uv(kelvin - TANGENT_STEP_K);
        (base.u - prev.u, base.v - prev.v)
    };
    let mag = du.hypot(dv);
    if mag < 1e-12 {
        return base.to_xy();
    }

    let (mut nu, mut nv) = (-dv / mag, du / mag);
    if nv < 0.0 {
        nu = -nu;
        nv = -nv;
    }

    UvCoordinate::new_1960(base.u + duv * nu, base.v + duv * nv).to_xy()
}

pub fn tint_from_duv(duv: f64) -> f64 {
    duv * TINT_SCALE
}

pub fn duv_from_tint(tint: f64) -> f64 {
    tint / TINT_SCALE
}

/// A chromaticity inside `[0.2, 0.5]` on both axes whose |Duv| is at most 0.1.
pub fn is_plausible_white_point(xy: ChromaticityXY, fit: LocusFit) -> bool {
    xy.is_finite() && xy.in_white_box() && duv(xy, fit).abs() <= MAX_PLAUSIBLE_DUV
}

/// Coarse lighting label for a color temperature.
pub fn describe_kelvin(kelvin: f64) -> &'static str {
    match kelvin {
        k if k < 2500.0 => "candlelight (very warm)",
        k if k < 3000.0 => "tungsten (warm)",
        k if k < 3500.0 => "warm indoor light",
        k if k < 4500.0 => "sunrise / sunset",
        k if k < 5500.0 => "morning / evening sun",
        k if k < 6500.0 => "midday daylight",
        k if k < 7500.0 => "overcast",
        k if k < 9000.0 => "haze",
        k if k < 11000.0 => "high altitude / snow",
        _ => "deep blue sky (very cool)",
    }
}
