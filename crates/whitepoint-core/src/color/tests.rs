//! Tests for chromaticity conversions and matrix helpers

use super::matrix::{determinant, invert, max_abs_diff, multiply, IDENTITY};
use super::*;

#[test]
fn test_srgb_white_maps_to_d65() {
    let xy = TristimulusXYZ::from_linear_srgb([1.0, 1.0, 1.0]).to_xy();
    assert!((xy.x - 0.3127).abs() < 1e-4, "x = {}", xy.x);
    assert!((xy.y - 0.3290).abs() < 1e-4, "y = {}", xy.y);
}

#[test]
fn test_srgb_matrices_are_inverse_pair() {
    let product = multiply(&XYZ_TO_SRGB, &SRGB_TO_XYZ);
    assert!(
        max_abs_diff(&product, &IDENTITY) < 1e-6,
        "product = {:?}",
        product
    );
}

#[test]
fn test_xy_to_xyz_has_unit_luminance() {
    let xyz = ChromaticityXY::new(0.3457, 0.3585).to_xyz();
    assert_eq!(xyz.y, 1.0);
    let back = xyz.to_xy();
    assert!((back.x - 0.3457).abs() < 1e-12);
    assert!((back.y - 0.3585).abs() < 1e-12);
}

#[test]
fn test_degenerate_inputs_fail_softly() {
    assert_eq!(ChromaticityXY::new(0.3, 0.0).to_xyz(), TristimulusXYZ::ZERO);
    assert_eq!(TristimulusXYZ::ZERO.to_xy(), ChromaticityXY::D65);

    let uv = TristimulusXYZ::ZERO.to_uv_prime();
    assert_eq!((uv.u, uv.v), (0.0, 0.0));
}

#[test]
fn test_uv_round_trip() {
    for xy in [
        ChromaticityXY::new(0.4476, 0.4074),
        ChromaticityXY::D65,
        ChromaticityXY::new(0.25, 0.27),
    ] {
        let back = xy.to_uv().to_xy();
        assert!((back.x - xy.x).abs() < 1e-12, "{:?} -> {:?}", xy, back);
        assert!((back.y - xy.y).abs() < 1e-12, "{:?} -> {:?}", xy, back);
    }
}

#[test]
fn test_uv_prime_is_one_and_a_half_v() {
    let xyz = ChromaticityXY::D65.to_xyz();
    let uv = ChromaticityXY::D65.to_uv();
    let uvp = xyz.to_uv_prime();
    assert!((uvp.u - uv.u).abs() < 1e-12);
    assert!((uvp.v - 1.5 * uv.v).abs() < 1e-12);
    assert!(uv.distance(uvp) < 1e-12, "same point in two spaces");
}

#[test]
fn test_uv_prime_to_xyz_round_trip() {
    let xyz = ChromaticityXY::new(0.35, 0.36).to_xyz();
    let back = xyz.to_uv_prime().to_xyz();
    assert!((back.x - xyz.x).abs() < 1e-12);
    assert!((back.z - xyz.z).abs() < 1e-12);
}

#[test]
fn test_invert_and_singular() {
    let m = [[2.0, 0.0, 1.0], [1.0, 3.0, 0.0], [0.0, 1.0, 4.0]];
    let inv = invert(&m).unwrap();
    assert!(max_abs_diff(&multiply(&m, &inv), &IDENTITY) < 1e-12);

    let singular = [[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 1.0]];
    assert!(determinant(&singular).abs() < 1e-12);
    assert!(invert(&singular).is_err());
}

#[test]
fn test_illuminant_parsing() {
    assert_eq!("d65".parse::<StandardIlluminant>().unwrap(), StandardIlluminant::D65);
    assert_eq!("Tungsten".parse::<StandardIlluminant>().unwrap(), StandardIlluminant::A);
    assert!("d93".parse::<StandardIlluminant>().is_err());

    for illuminant in StandardIlluminant::ALL {
        assert!(illuminant.xy().in_white_box(), "{}", illuminant.as_str());
    }
}
