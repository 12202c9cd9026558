//! White-point detection

use super::{gains_neutralizing, ChannelSums, EstimatorConfig};
use crate::gains::WhiteBalanceGains;
use crate::image::LinearImage;
use crate::parallel::{parallel_fold_reduce, parallel_map_chunks};

/// Average the brightest, near-neutral pixels and make them gray.
///
/// Luminance is the unweighted channel mean. Candidates reach the
/// `white_percentile` luminance and have `(max - min) / (max + 1e-6)` below
/// `white_saturation_max`. No candidate yields neutral gains.
pub fn white_point(image: &LinearImage, config: &EstimatorConfig) -> WhiteBalanceGains {
    if image.is_empty() {
        return WhiteBalanceGains::NEUTRAL;
    }
    let order = image.order;

    let mut luminance = parallel_map_chunks(&image.data, 3, |px| (px[0] + px[1] + px[2]) / 3.0);
    luminance.sort_unstable_by(|a, b| a.total_cmp(b));
    let n = luminance.len();
    let idx = ((n as f64 * config.white_percentile) as usize).min(n - 1);
    let threshold = luminance[idx];

    let stats = parallel_fold_reduce(
        &image.data,
        3,
        ChannelSums::default,
        |acc, px| {
            let rgb = order.to_rgb(px);
            let lum = (rgb[0] + rgb[1] + rgb[2]) / 3.0;
            let max = rgb[0].max(rgb[1]).max(rgb[2]) as f64;
            let min = rgb[0].min(rgb[1]).min(rgb[2]) as f64;
            if lum >= threshold && (max - min) / (max + 1e-6) < config.white_saturation_max {
                acc.add(rgb)
            } else {
                acc
            }
        },
        ChannelSums::merge,
    );

    match stats.means() {
        Some(avg) => gains_neutralizing(avg, &config.bounds),
        None => {
            log::debug!("white point: no bright neutral pixels; neutral gains");
            WhiteBalanceGains::NEUTRAL
        }
    }
}
