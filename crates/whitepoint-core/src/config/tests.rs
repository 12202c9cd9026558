//! Tests for config loading and sanitization

use super::*;
use crate::adaptation::AdaptationMethod;
use crate::conversion::GainStrategy;
use crate::estimators::WbAlgorithm;
use crate::locus::LocusFit;
use tempfile::tempdir;

#[test]
fn test_partial_yaml_keeps_defaults() {
    let yaml = "defaults:\n  patch_size: 16\n  gain_strategy: fast-empirical-v2\n";
    let (config, notes) = EngineConfig::from_yaml_str(yaml).unwrap();
    let d = &config.defaults;
    assert_eq!(d.patch_size, 16);
    assert_eq!(d.gain_strategy, GainStrategy::FastEmpiricalV2);
    assert_eq!(d.locus_fit, LocusFit::Daylight);
    assert_eq!(d.adaptation_method, AdaptationMethod::Bradford);
    assert_eq!(d.algorithm, WbAlgorithm::Combined);
    assert!((d.gain_min - 0.2).abs() < 1e-12);
    assert!((d.gain_max - 5.0).abs() < 1e-12);
    assert!(notes.is_empty(), "{:?}", notes);
}

#[test]
fn test_enum_values_parse_from_yaml() {
    let yaml = "defaults:\n  locus_fit: planckian\n  adaptation_method: cat02\n  \
                algorithm: gray-world\n";
    let (config, _) = EngineConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.defaults.locus_fit, LocusFit::Planckian);
    assert_eq!(config.defaults.adaptation_method, AdaptationMethod::Cat02);
    assert_eq!(config.defaults.algorithm, WbAlgorithm::GrayWorld);
}

#[test]
fn test_sanitize_pulls_values_into_range() {
    let yaml = "defaults:\n  gain_min: -3.0\n  percentile: 80.0\n  patch_size: 0\n  \
                strength: 4.0\n  combined_weights: [2.0, 1.0, 1.0]\n";
    let (config, notes) = EngineConfig::from_yaml_str(yaml).unwrap();
    let d = &config.defaults;
    assert!((d.gain_min - 0.01).abs() < 1e-12);
    assert!((d.percentile - 49.0).abs() < 1e-12);
    assert_eq!(d.patch_size, 2);
    assert!((d.strength - 1.0).abs() < 1e-12);
    assert!((d.combined_weights[0] - 0.5).abs() < 1e-12);
    assert!((d.combined_weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    assert_eq!(notes.len(), 1);
}

#[test]
fn test_zero_weights_reset() {
    let yaml = "defaults:\n  combined_weights: [0.0, 0.0, 0.0]\n";
    let (config, notes) = EngineConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.defaults.combined_weights, [0.4, 0.3, 0.3]);
    assert_eq!(notes.len(), 1);
}

#[test]
fn test_malformed_yaml_is_config_error() {
    let result = EngineConfig::from_yaml_str("defaults:\n  patch_size: [oops\n");
    assert!(matches!(result, Err(WbError::Config(_))));
}

#[test]
fn test_load_from_custom_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.yml");
    fs::write(&path, "defaults:\n  reflectance_threshold: 0.75\n").unwrap();

    let handle = load_engine_config(Some(&path));
    assert!(handle.source.is_some());
    assert!((handle.config.defaults.reflectance_threshold - 0.75).abs() < 1e-12);
}

#[test]
fn test_unparseable_file_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.yml");
    fs::write(&path, "defaults: [1, 2").unwrap();

    let handle = load_engine_config(Some(&path));
    assert!(handle
        .warnings
        .iter()
        .any(|w| w.contains("broken.yml")), "{:?}", handle.warnings);
}

#[test]
fn test_defaults_feed_estimators_and_conversion() {
    let defaults = EngineDefaults::default();
    let estimator = defaults.estimator_config();
    assert_eq!(estimator, crate::estimators::EstimatorConfig::default());

    let settings = defaults.conversion_settings();
    assert_eq!(settings.fit, LocusFit::Daylight);
    assert_eq!(settings.bounds, defaults.bounds());
}

#[test]
fn test_verbose_flag_round_trip() {
    let before = is_verbose();
    set_verbose(true);
    assert!(is_verbose());
    set_verbose(before);
}
