//! Empirical Kelvin/Duv to gain strategies
//!
//! Neither strategy needs camera data. Both produce gains that neutralize
//! a light of the given temperature relative to the 6500 K reference, and
//! both normalize the result to a mean gain of 1.0.

use crate::gains::{GainBounds, WhiteBalanceGains};
use crate::temperature::{MAX_CCT, MAX_PLAUSIBLE_DUV, MIN_CCT};

/// Reference temperature where every empirical strategy is neutral.
pub const REFERENCE_KELVIN: f64 = 6500.0;

/// Kelvin range of the linear-blend strategy.
pub const LINEAR_BLEND_RANGE: (f64, f64) = (2000.0, 12000.0);

/// Power-law split: `ratio = K / 6500`, red `ratio^0.5`, blue `ratio^-0.5`.
///
/// Kelvin is clamped to `[1000, 40000]`.
pub fn power_law_gains(
    kelvin: f64,
    duv: f64,
    tint_scale: f64,
    bounds: &GainBounds,
) -> WhiteBalanceGains {
    let kelvin = sanitize_kelvin(kelvin).clamp(MIN_CCT, MAX_CCT);
    let ratio = kelvin / REFERENCE_KELVIN;
    let base = WhiteBalanceGains::new(ratio.powf(0.5), 1.0, ratio.powf(-0.5));
    finish(base, duv, tint_scale, bounds)
}

/// Asymmetric linear blend split at 6500 K, with separate warm and cool slopes.
pub fn linear_blend_gains(
    kelvin: f64,
    duv: f64,
    tint_scale: f64,
    bounds: &GainBounds,
) -> WhiteBalanceGains {
    let (lo, hi) = LINEAR_BLEND_RANGE;
    let kelvin = sanitize_kelvin(kelvin).clamp(lo, hi);

    let base = if kelvin < REFERENCE_KELVIN {
        let f = (REFERENCE_KELVIN - kelvin) / (REFERENCE_KELVIN - lo);
        WhiteBalanceGains::new(1.0 - 0.4 * f, 1.0, 1.0 + 0.5 * f)
    } else {
        let f = (kelvin - REFERENCE_KELVIN) / (hi - REFERENCE_KELVIN);
        WhiteBalanceGains::new(1.0 + 0.5 * f, 1.0, 1.0 - 0.4 * f)
    };
    finish(base, duv, tint_scale, bounds)
}

/// Tint on the green channel with a small symmetric red/blue counterweight.
///
/// Positive Duv (a green cast) lowers green. Duv is clamped to +-0.1 and
/// converted to display tint with `tint_scale`.
fn apply_tint(gains: WhiteBalanceGains, duv: f64, tint_scale: f64) -> WhiteBalanceGains {
    let duv = if duv.is_finite() {
        duv.clamp(-MAX_PLAUSIBLE_DUV, MAX_PLAUSIBLE_DUV)
    } else {
        0.0
    };
    let t = duv * tint_scale / 100.0;
    let side = 1.0 + 0.05 * t;
    WhiteBalanceGains::new(
        gains.red_gain * side,
        gains.green_gain * (-0.2 * t).exp(),
        gains.blue_gain * side,
    )
}

fn finish(
    base: WhiteBalanceGains,
    duv: f64,
    tint_scale: f64,
    bounds: &GainBounds,
) -> WhiteBalanceGains {
    apply_tint(base, duv, tint_scale).normalized_to_mean().clamped(bounds)
}

fn sanitize_kelvin(kelvin: f64) -> f64 {
    if kelvin.is_finite() && kelvin > 0.0 {
        kelvin
    } else {
        REFERENCE_KELVIN
    }
}
