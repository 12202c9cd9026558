//! White-balance gains
//!
//! `WhiteBalanceGains` is the common currency of the engine: every estimator
//! and conversion strategy produces one, and [`apply_gains`] consumes it.
//! Gains are always positive, normalized (green = 1 or mean = 1) and
//! clamped to a [`GainBounds`] range.

mod apply;

#[cfg(test)]
mod tests;

pub use apply::{apply_gains, apply_gains_copied};

use serde::{Deserialize, Serialize};

use crate::image::ChannelOrder;

/// Inclusive clamp range for every gain the engine emits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GainBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for GainBounds {
    fn default() -> Self {
        Self { min: 0.2, max: 5.0 }
    }
}

impl GainBounds {
    #[inline]
    pub fn clamp(&self, gain: f64) -> f64 {
        if !gain.is_finite() {
            return 1.0_f64.clamp(self.min, self.max);
        }
        gain.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WhiteBalanceGains {
    pub red_gain: f64,
    pub green_gain: f64,
    pub blue_gain: f64,
}

impl WhiteBalanceGains {
    pub const NEUTRAL: WhiteBalanceGains = WhiteBalanceGains {
        red_gain: 1.0,
        green_gain: 1.0,
        blue_gain: 1.0,
    };

    pub const fn new(red_gain: f64, green_gain: f64, blue_gain: f64) -> Self {
        Self {
            red_gain,
            green_gain,
            blue_gain,
        }
    }

    pub fn from_array(rgb: [f64; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.red_gain, self.green_gain, self.blue_gain]
    }

    /// All three gains finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.to_array().iter().all(|g| g.is_finite() && *g > 0.0)
    }

    /// Scale so that green = 1. Invalid input collapses to neutral.
    pub fn normalized_to_green(self) -> Self {
        if !self.is_valid() {
            return Self::NEUTRAL;
        }
        Self::new(self.red_gain / self.green_gain, 1.0, self.blue_gain / self.green_gain)
    }

    /// Scale so that the mean gain is 1 (preserves overall exposure).
    pub fn normalized_to_mean(self) -> Self {
        if !self.is_valid() {
            return Self::NEUTRAL;
        }
        let mean = (self.red_gain + self.green_gain + self.blue_gain) / 3.0;
        Self::new(self.red_gain / mean, self.green_gain / mean, self.blue_gain / mean)
    }

    pub fn clamped(self, bounds: &GainBounds) -> Self {
        Self::new(
            bounds.clamp(self.red_gain),
            bounds.clamp(self.green_gain),
            bounds.clamp(self.blue_gain),
        )
    }

    /// Blend toward neutral: `1 + strength * (gain - 1)`.
    ///
    /// `strength` is clamped to `[0, 1]`.
    pub fn with_strength(self, strength: f64) -> Self {
        let s = if strength.is_finite() {
            strength.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self::new(
            1.0 + s * (self.red_gain - 1.0),
            1.0 + s * (self.green_gain - 1.0),
            1.0 + s * (self.blue_gain - 1.0),
        )
    }

    /// Element-wise quotient `self / other`, used for relative corrections.
    pub fn relative_to(self, other: &WhiteBalanceGains) -> Self {
        Self::new(
            self.red_gain / other.red_gain,
            self.green_gain / other.green_gain,
            self.blue_gain / other.blue_gain,
        )
    }

    /// Gains laid out in `order`, as f32 for the pixel loops.
    pub fn in_order(&self, order: ChannelOrder) -> [f32; 3] {
        order.arrange([
            self.red_gain as f32,
            self.green_gain as f32,
            self.blue_gain as f32,
        ])
    }
}

impl Default for WhiteBalanceGains {
    fn default() -> Self {
        Self::NEUTRAL
    }
}
