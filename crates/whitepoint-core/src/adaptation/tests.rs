//! Tests for chromatic adaptation

use super::*;
use crate::color::matrix::max_abs_diff;
use crate::color::StandardIlluminant;
use crate::image::ChannelOrder;

const METHODS: [AdaptationMethod; 3] = [
    AdaptationMethod::Bradford,
    AdaptationMethod::VonKries,
    AdaptationMethod::Cat02,
];

#[test]
fn test_same_white_is_identity() {
    for method in METHODS {
        for illuminant in StandardIlluminant::ALL {
            let w = illuminant.xy();
            let cat = ChromaticAdaptation::between_xy(w, w, method).unwrap();
            assert!(
                max_abs_diff(&cat.matrix, &IDENTITY) < 1e-9,
                "{} at {}: {:?}",
                method,
                illuminant.as_str(),
                cat.matrix
            );
        }
    }
}

#[test]
fn test_round_trip_returns_input() {
    let a = StandardIlluminant::A.xy();
    let b = StandardIlluminant::D65.xy();
    let sample = TristimulusXYZ::new(0.4, 0.35, 0.2);

    for method in METHODS {
        let forward = ChromaticAdaptation::between_xy(a, b, method).unwrap();
        let back = ChromaticAdaptation::between_xy(b, a, method).unwrap();
        let out = forward.then(&back).apply_xyz(sample);
        assert!((out.x - sample.x).abs() < 1e-9, "{}: {:?}", method, out);
        assert!((out.y - sample.y).abs() < 1e-9, "{}: {:?}", method, out);
        assert!((out.z - sample.z).abs() < 1e-9, "{}: {:?}", method, out);
    }
}

#[test]
fn test_maps_source_white_to_destination_white() {
    let src = StandardIlluminant::D50.xy();
    let dst = StandardIlluminant::D65.xy();
    let cat = ChromaticAdaptation::between_xy(src, dst, AdaptationMethod::Bradford).unwrap();
    let mapped = cat.apply_xyz(src.to_xyz()).to_xy();
    assert!((mapped.x - dst.x).abs() < 1e-9);
    assert!((mapped.y - dst.y).abs() < 1e-9);
}

#[test]
fn test_known_bradford_d50_to_d65() {
    // Lindbloom's published Bradford D50 -> D65 matrix
    let cat = ChromaticAdaptation::between_xyz(
        TristimulusXYZ::new(0.96422, 1.0, 0.82521),
        TristimulusXYZ::new(0.95047, 1.0, 1.08883),
        AdaptationMethod::Bradford,
    )
    .unwrap();
    let expected = [
        [0.9555766, -0.0230393, 0.0631636],
        [-0.0282895, 1.0099416, 0.0210077],
        [0.0122982, -0.0204830, 1.3299098],
    ];
    assert!(max_abs_diff(&cat.matrix, &expected) < 1e-6, "{:?}", cat.matrix);
}

#[test]
fn test_degenerate_source_is_reported() {
    let result = ChromaticAdaptation::between_xyz(
        TristimulusXYZ::ZERO,
        ChromaticityXY::D65.to_xyz(),
        AdaptationMethod::Bradford,
    );
    assert!(matches!(result, Err(WbError::DegenerateWhitePoint(_))));

    let (cat, err) = ChromaticAdaptation::between_xy_or_identity(
        ChromaticityXY::new(0.3, 0.0),
        ChromaticityXY::D65,
        AdaptationMethod::Bradford,
    );
    assert!(err.is_some());
    assert_eq!(cat.matrix, IDENTITY);
}

#[test]
fn test_degenerate_destination_is_reported() {
    for method in METHODS {
        let result = ChromaticAdaptation::between_xy(
            ChromaticityXY::D65,
            ChromaticityXY::new(0.3, 0.0),
            method,
        );
        assert!(
            matches!(result, Err(WbError::DegenerateWhitePoint(_))),
            "{}: {:?}",
            method,
            result.map(|cat| cat.matrix)
        );
    }

    let infinite = TristimulusXYZ::new(f64::INFINITY, 1.0, 1.0);
    let result = ChromaticAdaptation::between_xyz(
        ChromaticityXY::D65.to_xyz(),
        infinite,
        AdaptationMethod::Bradford,
    );
    assert!(matches!(result, Err(WbError::DegenerateWhitePoint(_))));

    let (cat, err) = ChromaticAdaptation::between_xy_or_identity(
        ChromaticityXY::D65,
        ChromaticityXY::new(0.3, 0.0),
        AdaptationMethod::Bradford,
    );
    assert!(err.is_some());
    let white = cat.apply_xyz(ChromaticityXY::D65.to_xyz());
    assert!((white.y - 1.0).abs() < 1e-12);
}

#[test]
fn test_rgb_identity_and_image_order() {
    let w = StandardIlluminant::D65.xy();
    let cat = ChromaticAdaptation::between_xy(w, w, AdaptationMethod::Bradford).unwrap();
    let rgb = cat.apply_rgb([0.2, 0.5, 0.8]);
    assert!((rgb[0] - 0.2).abs() < 1e-5 && (rgb[2] - 0.8).abs() < 1e-5);

    let warm = ChromaticAdaptation::between_xy(
        StandardIlluminant::A.xy(),
        StandardIlluminant::D65.xy(),
        AdaptationMethod::Bradford,
    )
    .unwrap();
    let mut rgb_image =
        LinearImage::new(1, 1, vec![0.6, 0.5, 0.3], ChannelOrder::Rgb).unwrap();
    let mut bgr_image =
        LinearImage::new(1, 1, vec![0.3, 0.5, 0.6], ChannelOrder::Bgr).unwrap();
    warm.apply_to_image(&mut rgb_image);
    warm.apply_to_image(&mut bgr_image);

    assert_eq!(rgb_image.pixel_rgb(0, 0), bgr_image.pixel_rgb(0, 0));
    let [r, _, b] = rgb_image.pixel_rgb(0, 0);
    assert!(b / r > 0.3 / 0.6, "tungsten to D65 should cool the pixel");
}

#[test]
fn test_parse_method() {
    assert_eq!(
        "Bradford".parse::<AdaptationMethod>().unwrap(),
        AdaptationMethod::Bradford
    );
    assert_eq!(
        "vonkries".parse::<AdaptationMethod>().unwrap(),
        AdaptationMethod::VonKries
    );
    assert_eq!("cat02".parse::<AdaptationMethod>().unwrap(), AdaptationMethod::Cat02);
    assert!("cat16".parse::<AdaptationMethod>().is_err());
}
