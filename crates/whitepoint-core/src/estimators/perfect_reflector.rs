//! Perfect reflector over overlapping tiles

use rayon::prelude::*;

use super::{gains_neutralizing, gray_world, ChannelSums, EstimatorConfig};
use crate::gains::WhiteBalanceGains;
use crate::image::LinearImage;

/// Tile origins along one axis: stride `patch / 2`, `origin + patch <= len`.
fn tile_origins(len: u32, patch: u32) -> Vec<u32> {
    if patch == 0 || len < patch {
        return Vec::new();
    }
    let stride = (patch / 2).max(1) as usize;
    (0..=len - patch).step_by(stride).collect()
}

fn tile_means(image: &LinearImage, x0: u32, y0: u32, patch: u32) -> [f64; 3] {
    let width = image.width as usize;
    let mut sums = ChannelSums::default();
    for y in y0 as usize..(y0 + patch) as usize {
        let row = (y * width + x0 as usize) * 3;
        let end = row + patch as usize * 3;
        for px in image.data[row..end].chunks_exact(3) {
            sums = sums.add(image.order.to_rgb(px));
        }
    }
    sums.means().unwrap_or([0.0; 3])
}

/// Average the tiles brighter than `reflectance_threshold`, then make that
/// average gray.
///
/// Falls back to [`gray_world`] when no tile qualifies, including images
/// smaller than one tile.
pub fn perfect_reflector(image: &LinearImage, config: &EstimatorConfig) -> WhiteBalanceGains {
    let patch = config.patch_size.max(2);
    let xs = tile_origins(image.width, patch);
    let ys = tile_origins(image.height, patch);

    let origins: Vec<(u32, u32)> = ys
        .iter()
        .flat_map(|&y| xs.iter().map(move |&x| (x, y)))
        .collect();

    let bright = origins
        .par_iter()
        .map(|&(x, y)| tile_means(image, x, y, patch))
        .filter(|m| (m[0] + m[1] + m[2]) / 3.0 > config.reflectance_threshold)
        .fold(ChannelSums::default, |acc, m| {
            acc.merge(ChannelSums { sum: m, count: 1 })
        })
        .reduce(ChannelSums::default, ChannelSums::merge);

    match bright.means() {
        Some(avg) => gains_neutralizing(avg, &config.bounds),
        None => {
            log::debug!(
                "perfect reflector: no {}px tile above {:.2}; using gray world",
                patch,
                config.reflectance_threshold
            );
            gray_world(image, config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_origins_stay_inside() {
        assert_eq!(tile_origins(64, 32), vec![0, 16, 32]);
        assert_eq!(tile_origins(40, 32), vec![0]);
        assert!(tile_origins(31, 32).is_empty());
    }
}
