//! Gain application over whole buffers

use super::WhiteBalanceGains;
use crate::image::LinearImage;
use crate::parallel::parallel_for_each_chunk_mut;

/// Multiply every pixel by `gains` in place, honoring the buffer's channel order.
///
/// Values are not clipped; encoding decides what to do with overs.
pub fn apply_gains(image: &mut LinearImage, gains: &WhiteBalanceGains) {
    let g = gains.in_order(image.order);
    parallel_for_each_chunk_mut(&mut image.data, 3, |px| {
        px[0] *= g[0];
        px[1] *= g[1];
        px[2] *= g[2];
    });
}

/// Copying variant of [`apply_gains`].
pub fn apply_gains_copied(image: &LinearImage, gains: &WhiteBalanceGains) -> LinearImage {
    let mut out = image.clone();
    apply_gains(&mut out, gains);
    out
}
