//! Gray world with highlight, shadow and saturation masks

use super::{ChannelSums, EstimatorConfig, MEAN_FLOOR};
use crate::gains::WhiteBalanceGains;
use crate::image::LinearImage;
use crate::parallel::parallel_fold_reduce;

/// Gray world assumption: the masked channel means should be equal.
///
/// A pixel is kept when its max channel is below `gray_world_highlight`,
/// its min channel above `gray_world_shadow`, and `(max - min) / max`
/// below `gray_world_max_saturation`. Gains are `(G/R, 1, G/B)`.
///
/// # Returns
/// Neutral gains when no pixel survives the mask.
pub fn gray_world(image: &LinearImage, config: &EstimatorConfig) -> WhiteBalanceGains {
    let order = image.order;
    let stats = parallel_fold_reduce(
        &image.data,
        3,
        ChannelSums::default,
        |acc, px| {
            let rgb = order.to_rgb(px);
            let max = rgb[0].max(rgb[1]).max(rgb[2]) as f64;
            let min = rgb[0].min(rgb[1]).min(rgb[2]) as f64;
            let keep = max < config.gray_world_highlight
                && min > config.gray_world_shadow
                && max > 0.0
                && (max - min) / max < config.gray_world_max_saturation;
            if keep {
                acc.add(rgb)
            } else {
                acc
            }
        },
        ChannelSums::merge,
    );

    let Some([r, g, b]) = stats.means() else {
        log::debug!("gray world: no pixels survived the mask; neutral gains");
        return WhiteBalanceGains::NEUTRAL;
    };

    let (r, g, b) = (r.max(MEAN_FLOOR), g.max(MEAN_FLOOR), b.max(MEAN_FLOOR));
    WhiteBalanceGains::new(g / r, 1.0, g / b).clamped(&config.bounds)
}
