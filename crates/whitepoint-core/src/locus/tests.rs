//! Tests for locus fits

use super::*;

#[test]
fn test_daylight_near_d65() {
    let xy = daylight_xy(6500.0);
    assert!((xy.x - 0.3135).abs() < 5e-4, "x = {}", xy.x);
    assert!((xy.y - 0.3237).abs() < 5e-4, "y = {}", xy.y);
}

#[test]
fn test_planckian_near_d65() {
    let xy = planckian_xy(6500.0);
    assert!((xy.x - 0.3135).abs() < 5e-4, "x = {}", xy.x);
    assert!((xy.y - 0.3235).abs() < 5e-4, "y = {}", xy.y);
}

#[test]
fn test_fits_clamp_to_their_domains() {
    assert_eq!(daylight_xy(500.0), daylight_xy(1667.0));
    assert_eq!(daylight_xy(50000.0), daylight_xy(25000.0));
    assert_eq!(planckian_xy(500.0), planckian_xy(1000.0));
    assert_eq!(planckian_xy(50000.0), planckian_xy(15000.0));
    assert_eq!(LocusFit::Daylight.clamp_kelvin(f64::NAN), 6500.0);
}

#[test]
fn test_x_decreases_with_temperature() {
    for fit in [LocusFit::Daylight, LocusFit::Planckian] {
        let (lo, hi) = fit.domain();
        let mut previous = fit.xy(lo).x;
        let mut k = lo + 250.0;
        while k <= hi {
            let x = fit.xy(k).x;
            assert!(x < previous, "{} not monotonic at {} K", fit, k);
            previous = x;
            k += 250.0;
        }
    }
}

#[test]
fn test_fits_differ_slightly() {
    let daylight = LocusFit::Daylight.uv(5000.0);
    let planckian = LocusFit::Planckian.uv(5000.0);
    let gap = daylight.distance(planckian);
    assert!(gap > 1e-5 && gap < 1e-2, "gap between fits = {}", gap);
}

#[test]
fn test_parse_fit() {
    assert_eq!("Daylight".parse::<LocusFit>().unwrap(), LocusFit::Daylight);
    assert_eq!("blackbody".parse::<LocusFit>().unwrap(), LocusFit::Planckian);
    assert!("spline".parse::<LocusFit>().is_err());
}
