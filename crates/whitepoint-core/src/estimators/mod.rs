//! Pixel-statistics white-balance estimators
//!
//! Every estimator reads a [`LinearImage`] through its declared channel
//! order and returns gains normalized to green = 1 and clamped to the
//! configured bounds.
//!
//! # Modules
//! - `gray_world`: masked channel means
//! - `white_point`: bright, low-saturation pixels
//! - `perfect_reflector`: bright overlapping tiles, falls back to gray world
//! - `percentile`: per-channel range stretch

mod gray_world;
mod percentile;
mod perfect_reflector;
mod white_point;


pub use gray_world::gray_world;
pub use percentile::percentile_stretch;
pub use perfect_reflector::perfect_reflector;
pub use white_point::white_point;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gains::{GainBounds, WhiteBalanceGains};
use crate::image::LinearImage;

/// Channel means below this are floored before dividing.
pub(crate) const MEAN_FLOOR: f64 = 1e-6;

/// Thresholds shared by the estimators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Gray world drops pixels whose max channel reaches this
    pub gray_world_highlight: f64,
    /// Gray world drops pixels whose min channel is at or below this
    pub gray_world_shadow: f64,
    /// Gray world drops pixels with `(max - min) / max` at or above this
    pub gray_world_max_saturation: f64,
    /// Luminance percentile (0-1) a white-point candidate must reach
    pub white_percentile: f64,
    /// White-point candidates need `(max - min) / max` below this
    pub white_saturation_max: f64,
    /// Perfect reflector tile edge in pixels; tiles overlap by half
    pub patch_size: u32,
    /// Perfect reflector keeps tiles brighter than this
    pub reflectance_threshold: f64,
    /// Percentile stretch clip, in percent per side
    pub percentile: f64,
    /// Combined blend weights for gray world, white point, perfect reflector
    pub combined_weights: [f64; 3],
    pub bounds: GainBounds,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            gray_world_highlight: 0.98,
            gray_world_shadow: 0.02,
            gray_world_max_saturation: 0.8,
            white_percentile: 0.95,
            white_saturation_max: 0.05,
            patch_size: 32,
            reflectance_threshold: 0.9,
            percentile: 0.5,
            combined_weights: [0.4, 0.3, 0.3],
            bounds: GainBounds::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WbAlgorithm {
    GrayWorld,
    WhitePoint,
    PerfectReflector,
    Percentile,
    #[default]
    Combined,
}

impl WbAlgorithm {
    pub const ALL: [WbAlgorithm; 5] = [
        Self::GrayWorld,
        Self::WhitePoint,
        Self::PerfectReflector,
        Self::Percentile,
        Self::Combined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GrayWorld => "gray-world",
            Self::WhitePoint => "white-point",
            Self::PerfectReflector => "perfect-reflector",
            Self::Percentile => "percentile",
            Self::Combined => "combined",
        }
    }
}

impl fmt::Display for WbAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WbAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "gray-world" | "grey-world" | "grayworld" => Ok(Self::GrayWorld),
            "white-point" | "whitepoint" => Ok(Self::WhitePoint),
            "perfect-reflector" | "perfect-reflection" => Ok(Self::PerfectReflector),
            "percentile" => Ok(Self::Percentile),
            "combined" | "auto" => Ok(Self::Combined),
            _ => Err(format!(
                "Unknown algorithm: {} (expected gray-world, white-point, \
                 perfect-reflector, percentile or combined)",
                s
            )),
        }
    }
}

/// Run `algorithm` on `image`.
pub fn estimate_gains(
    image: &LinearImage,
    algorithm: WbAlgorithm,
    config: &EstimatorConfig,
) -> WhiteBalanceGains {
    match algorithm {
        WbAlgorithm::GrayWorld => gray_world(image, config),
        WbAlgorithm::WhitePoint => white_point(image, config),
        WbAlgorithm::PerfectReflector => perfect_reflector(image, config),
        WbAlgorithm::Percentile => percentile_stretch(image, config),
        WbAlgorithm::Combined => combined(image, config),
    }
}

/// Weighted blend of gray world, white point and perfect reflector.
///
/// Green stays at 1; red and blue are blended, then clamped.
pub fn combined(image: &LinearImage, config: &EstimatorConfig) -> WhiteBalanceGains {
    let [w_gw, w_wp, w_pr] = config.combined_weights;
    let gw = gray_world(image, config);
    let wp = white_point(image, config);
    let pr = perfect_reflector(image, config);

    WhiteBalanceGains::new(
        w_gw * gw.red_gain + w_wp * wp.red_gain + w_pr * pr.red_gain,
        1.0,
        w_gw * gw.blue_gain + w_wp * wp.blue_gain + w_pr * pr.blue_gain,
    )
    .clamped(&config.bounds)
}

/// Gains that turn `reference` (r, g, b) into its own gray mean.
pub(crate) fn gains_neutralizing(reference: [f64; 3], bounds: &GainBounds) -> WhiteBalanceGains {
    let target = (reference[0] + reference[1] + reference[2]) / 3.0;
    WhiteBalanceGains::from_array(reference.map(|c| target / c.max(MEAN_FLOOR)))
        .normalized_to_green()
        .clamped(bounds)
}

/// Running sums over a pixel subset, merged across rayon workers.
#[derive(Clone, Copy, Default)]
pub(crate) struct ChannelSums {
    pub sum: [f64; 3],
    pub count: usize,
}

impl ChannelSums {
    #[inline]
    pub fn add(mut self, rgb: [f32; 3]) -> Self {
        self.sum[0] += rgb[0] as f64;
        self.sum[1] += rgb[1] as f64;
        self.sum[2] += rgb[2] as f64;
        self.count += 1;
        self
    }

    pub fn merge(mut self, other: Self) -> Self {
        self.sum[0] += other.sum[0];
        self.sum[1] += other.sum[1];
        self.sum[2] += other.sum[2];
        self.count += other.count;
        self
    }

    pub fn means(&self) -> Option<[f64; 3]> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(self.sum.map(|s| s / n))
    }
}
