//! Per-channel percentile stretch

use super::EstimatorConfig;
use crate::gains::WhiteBalanceGains;
use crate::image::LinearImage;
use crate::parallel::parallel_map_chunks;

/// Value range of one channel after clipping `p` percent per side.
fn clipped_range(mut values: Vec<f32>, p: f64) -> f64 {
    let n = values.len();
    values.sort_unstable_by(|a, b| a.total_cmp(b));
    let low = ((n as f64 * p / 100.0) as usize).min(n - 1);
    let high = ((n as f64 * (1.0 - p / 100.0)) as usize).min(n - 1);
    (values[high] - values[low]) as f64
}

/// Equalize the clipped range of each channel: `gain = 1 / (high - low + 1e-6)`.
pub fn percentile_stretch(image: &LinearImage, config: &EstimatorConfig) -> WhiteBalanceGains {
    if image.is_empty() {
        return WhiteBalanceGains::NEUTRAL;
    }
    let [ri, gi, bi] = image.order.rgb_indices();
    let p = config.percentile;

    let range = |idx: usize| clipped_range(parallel_map_chunks(&image.data, 3, |px| px[idx]), p);
    let (r, g, b) = (range(ri), range(gi), range(bi));

    WhiteBalanceGains::new(1.0 / (r + 1e-6), 1.0 / (g + 1e-6), 1.0 / (b + 1e-6))
        .normalized_to_green()
        .clamped(&config.bounds)
}
