//! Default engine parameter values and their sanitization.

use serde::Deserialize;

use crate::adaptation::AdaptationMethod;
use crate::conversion::{ConversionSettings, GainStrategy};
use crate::estimators::{EstimatorConfig, WbAlgorithm};
use crate::gains::GainBounds;
use crate::locus::LocusFit;
use crate::temperature::TINT_SCALE;

/// Default engine parameter values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineDefaults {
    pub gain_min: f64,
    pub gain_max: f64,
    /// Estimator used by `--wb auto`
    pub algorithm: WbAlgorithm,
    pub gray_world_highlight: f64,
    pub gray_world_shadow: f64,
    pub gray_world_max_saturation: f64,
    pub white_percentile: f64,
    pub white_saturation_max: f64,
    pub patch_size: u32,
    pub reflectance_threshold: f64,
    pub percentile: f64,
    pub combined_weights: [f64; 3],
    pub gain_strategy: GainStrategy,
    pub adaptation_method: AdaptationMethod,
    /// Tint units per unit Duv, for tint given or printed on the command line
    pub tint_scale: f64,
    pub locus_fit: LocusFit,
    /// Blend between neutral (0) and full correction (1)
    pub strength: f64,
    /// Matrix conversion failures fall back to `fast-empirical-v1`
    pub allow_fallback: bool,
}

impl EngineDefaults {
    pub(crate) fn sanitize(&mut self) -> Vec<String> {
        let mut notes = Vec::new();

        self.gain_min = finite_or(self.gain_min, 0.2).clamp(0.01, 1.0);
        self.gain_max = finite_or(self.gain_max, 5.0).clamp(1.0, 100.0);
        self.gray_world_highlight = finite_or(self.gray_world_highlight, 0.98).clamp(0.1, 1.0);
        self.gray_world_shadow = finite_or(self.gray_world_shadow, 0.02)
            .clamp(0.0, self.gray_world_highlight - 0.01);
        self.gray_world_max_saturation =
            finite_or(self.gray_world_max_saturation, 0.8).clamp(0.01, 1.0);
        self.white_percentile = finite_or(self.white_percentile, 0.95).clamp(0.0, 1.0);
        self.white_saturation_max = finite_or(self.white_saturation_max, 0.05).clamp(0.001, 1.0);
        self.patch_size = self.patch_size.clamp(2, 1024);
        self.reflectance_threshold = finite_or(self.reflectance_threshold, 0.9).clamp(0.0, 1.0);
        self.percentile = finite_or(self.percentile, 0.5).clamp(0.0, 49.0);
        self.tint_scale = finite_or(self.tint_scale, TINT_SCALE).max(1.0);
        self.strength = finite_or(self.strength, 1.0).clamp(0.0, 1.0);

        let weights = self.combined_weights.map(|w| finite_or(w, 0.0).max(0.0));
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            notes.push("combined_weights sum to zero; using 0.4/0.3/0.3".to_string());
            self.combined_weights = [0.4, 0.3, 0.3];
        } else {
            if (total - 1.0).abs() > 1e-9 {
                notes.push(format!("combined_weights sum to {:.3}; normalized", total));
            }
            self.combined_weights = weights.map(|w| w / total);
        }

        notes
    }

    pub fn bounds(&self) -> GainBounds {
        GainBounds {
            min: self.gain_min,
            max: self.gain_max,
        }
    }

    pub fn estimator_config(&self) -> EstimatorConfig {
        EstimatorConfig {
            gray_world_highlight: self.gray_world_highlight,
            gray_world_shadow: self.gray_world_shadow,
            gray_world_max_saturation: self.gray_world_max_saturation,
            white_percentile: self.white_percentile,
            white_saturation_max: self.white_saturation_max,
            patch_size: self.patch_size,
            reflectance_threshold: self.reflectance_threshold,
            percentile: self.percentile,
            combined_weights: self.combined_weights,
            bounds: self.bounds(),
        }
    }

    pub fn conversion_settings(&self) -> ConversionSettings {
        ConversionSettings {
            bounds: self.bounds(),
            fit: self.locus_fit,
            allow_fallback: self.allow_fallback,
            tint_scale: self.tint_scale,
        }
    }
}

impl Default for EngineDefaults {
    fn default() -> Self {
        let estimator = EstimatorConfig::default();
        Self {
            gain_min: estimator.bounds.min,
            gain_max: estimator.bounds.max,
            algorithm: WbAlgorithm::default(),
            gray_world_highlight: estimator.gray_world_highlight,
            gray_world_shadow: estimator.gray_world_shadow,
            gray_world_max_saturation: estimator.gray_world_max_saturation,
            white_percentile: estimator.white_percentile,
            white_saturation_max: estimator.white_saturation_max,
            patch_size: estimator.patch_size,
            reflectance_threshold: estimator.reflectance_threshold,
            percentile: estimator.percentile,
            combined_weights: estimator.combined_weights,
            gain_strategy: GainStrategy::default(),
            adaptation_method: AdaptationMethod::default(),
            tint_scale: TINT_SCALE,
            locus_fit: LocusFit::default(),
            strength: 1.0,
            allow_fallback: true,
        }
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
