use super::*;
use std::path::{Path, PathBuf};
use whitepoint_core::{ChannelOrder, LinearImage, WbMode};

fn two_pixels(order: ChannelOrder) -> LinearImage {
    let data = match order {
        ChannelOrder::Rgb => vec![1.0, 0.5, 0.0, 0.002, 2.0, -0.1],
        ChannelOrder::Bgr => vec![0.0, 0.5, 1.0, -0.1, 2.0, 0.002],
    };
    LinearImage::new(2, 1, data, order).unwrap()
}

#[test]
fn test_linear_to_srgb_curve() {
    assert_eq!(linear_to_srgb(0.0), 0.0);
    assert!((linear_to_srgb(1.0) - 1.0).abs() < 1e-6);
    assert!((linear_to_srgb(0.002) - 0.002 * 12.92).abs() < 1e-7);
    // Mid gray encodes near 0.735
    assert!((linear_to_srgb(0.5) - 0.7354).abs() < 1e-3);
}

#[test]
fn test_encode_srgb8_clips_and_honors_order() {
    let rgb = encode_srgb8(&two_pixels(ChannelOrder::Rgb));
    let bgr = encode_srgb8(&two_pixels(ChannelOrder::Bgr));
    assert_eq!(rgb, bgr);
    assert_eq!(rgb[0], 255);
    assert_eq!(rgb[2], 0);
    assert_eq!(rgb[4], 255, "values above 1.0 clip to white");
    assert_eq!(rgb[5], 0, "negative values clip to black");
}

#[test]
fn test_determine_output_path() {
    let input = Path::new("/shots/IMG_0001.CR2");
    assert_eq!(
        determine_output_path(input, &None, "balanced", "jpg").unwrap(),
        PathBuf::from("/shots/IMG_0001_balanced.jpg")
    );

    let explicit = Some(PathBuf::from("/tmp/out.jpg"));
    assert_eq!(
        determine_output_path(input, &explicit, "balanced", "jpg").unwrap(),
        PathBuf::from("/tmp/out.jpg")
    );

    let dir = tempfile::tempdir().unwrap();
    let into_dir = Some(dir.path().to_path_buf());
    assert_eq!(
        determine_output_path(input, &into_dir, "whitepoint", "jpg").unwrap(),
        dir.path().join("IMG_0001_whitepoint.jpg")
    );
}

#[test]
fn test_side_file_paths() {
    let out = Path::new("/tmp/IMG_0001_balanced.jpg");
    assert_eq!(notes_path(out), PathBuf::from("/tmp/IMG_0001_balanced.jpg.txt"));
    assert_eq!(
        linear_path(out),
        PathBuf::from("/tmp/IMG_0001_balanced.jpg.linear.tiff")
    );
}

#[test]
fn test_tiff16_written_file_decodes_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("linear.tif");
    let image = two_pixels(ChannelOrder::Bgr);

    write_tiff16(&image, &path).unwrap();
    let decoded = decode_tiff(&path).unwrap();

    assert_eq!(decoded.width, 2);
    assert_eq!(decoded.order, ChannelOrder::Rgb);
    assert!((decoded.data[0] - 1.0).abs() < 1e-4);
    assert!((decoded.data[1] - 0.5).abs() < 1e-4);
    assert!((decoded.data[4] - 1.0).abs() < 1e-4, "clipped on export");
    assert_eq!(decoded.data[5], 0.0);
}

#[test]
fn test_jpeg_and_notes_written() {
    let dir = tempfile::tempdir().unwrap();
    let jpeg = dir.path().join("out.jpg");
    write_jpeg(&two_pixels(ChannelOrder::Rgb), &jpeg, 90).unwrap();
    assert!(std::fs::metadata(&jpeg).unwrap().len() > 0);

    let notes = notes_path(&jpeg);
    write_notes(&notes, "Input: a.tif\n").unwrap();
    assert_eq!(std::fs::read_to_string(&notes).unwrap(), "Input: a.tif\n");
}

#[test]
fn test_load_input_rejects_unknown_and_missing() {
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("scan.png");
    std::fs::write(&png, b"not really").unwrap();
    assert!(load_input(&png, WbMode::Camera).is_err());
    assert!(load_input(&dir.path().join("missing.tif"), WbMode::Camera).is_err());
}

#[test]
fn test_load_input_reads_tiff_without_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.TIFF");
    write_tiff16(&two_pixels(ChannelOrder::Rgb), &path).unwrap();
    assert!(is_tiff_path(&path));

    let loaded = load_input(&path, WbMode::Camera).unwrap();
    assert!(loaded.metadata.is_none());
    assert!(loaded.mode.is_none());
    assert_eq!(loaded.image.pixel_count(), 2);
}
