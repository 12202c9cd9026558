//! Tests for gain normalization and application

use super::*;
use crate::image::{ChannelOrder, LinearImage};
use crate::parallel::PARALLEL_THRESHOLD;

#[test]
fn test_normalize_to_green() {
    let g = WhiteBalanceGains::new(2.0, 0.5, 1.0).normalized_to_green();
    assert_eq!(g.to_array(), [4.0, 1.0, 2.0]);
}

#[test]
fn test_normalize_to_mean() {
    let g = WhiteBalanceGains::new(0.5, 1.0, 1.5).normalized_to_mean();
    let mean = (g.red_gain + g.green_gain + g.blue_gain) / 3.0;
    assert!((mean - 1.0).abs() < 1e-12);
    assert!((g.blue_gain / g.red_gain - 3.0).abs() < 1e-12);
}

#[test]
fn test_invalid_gains_collapse_to_neutral() {
    let g = WhiteBalanceGains::new(f64::NAN, 1.0, 2.0).normalized_to_green();
    assert_eq!(g, WhiteBalanceGains::NEUTRAL);
    let g = WhiteBalanceGains::new(1.0, 0.0, 2.0).normalized_to_mean();
    assert_eq!(g, WhiteBalanceGains::NEUTRAL);
}

#[test]
fn test_clamp_bounds() {
    let bounds = GainBounds::default();
    let g = WhiteBalanceGains::new(0.01, 1.0, 80.0).clamped(&bounds);
    assert_eq!(g.to_array(), [0.2, 1.0, 5.0]);
    assert_eq!(bounds.clamp(f64::INFINITY), 1.0);
}

#[test]
fn test_strength_blends_toward_neutral() {
    let full = WhiteBalanceGains::new(1.4, 1.0, 0.6);
    let half = full.with_strength(0.5);
    assert!((half.red_gain - 1.2).abs() < 1e-12);
    assert!((half.blue_gain - 0.8).abs() < 1e-12);
    assert_eq!(full.with_strength(0.0), WhiteBalanceGains::NEUTRAL);
    assert_eq!(full.with_strength(3.0), full);
}

#[test]
fn test_apply_respects_channel_order() {
    let gains = WhiteBalanceGains::new(2.0, 1.0, 0.5);

    let mut rgb = LinearImage::new(1, 1, vec![0.2, 0.4, 0.6], ChannelOrder::Rgb).unwrap();
    apply_gains(&mut rgb, &gains);
    assert!((rgb.data[0] - 0.4).abs() < 1e-6);
    assert!((rgb.data[2] - 0.3).abs() < 1e-6);

    let mut bgr = LinearImage::new(1, 1, vec![0.6, 0.4, 0.2], ChannelOrder::Bgr).unwrap();
    apply_gains(&mut bgr, &gains);
    assert!((bgr.data[0] - 0.3).abs() < 1e-6, "blue stored first");
    assert!((bgr.data[2] - 0.4).abs() < 1e-6, "red stored last");
}

#[test]
fn test_apply_does_not_clip() {
    let image = LinearImage::new(1, 1, vec![0.9, 0.9, 0.9], ChannelOrder::Rgb).unwrap();
    let out = apply_gains_copied(&image, &WhiteBalanceGains::new(2.0, 1.0, 1.0));
    assert!((out.data[0] - 1.8).abs() < 1e-6);
    assert_eq!(image.data[0], 0.9, "source untouched");
}

#[test]
fn test_apply_large_buffer_is_complete() {
    let width = (PARALLEL_THRESHOLD + 17) as u32;
    let mut image = LinearImage::new(width, 1, vec![1.0; width as usize * 3], ChannelOrder::Rgb)
        .unwrap();
    apply_gains(&mut image, &WhiteBalanceGains::new(1.5, 1.0, 0.5));
    assert!(image
        .data
        .chunks_exact(3)
        .all(|px| px[0] == 1.5 && px[1] == 1.0 && px[2] == 0.5));
}
