use std::path::PathBuf;

use serde::Serialize;

use whitepoint_cli::processing::{is_tiff_path, notes_path, write_jpeg, write_notes, write_tiff16};
use whitepoint_cli::{determine_output_path, load_input, parse_quality, resolve_duv};
use whitepoint_core::config::engine_config_handle;
use whitepoint_core::conversion::REFERENCE_KELVIN;
use whitepoint_core::{
    apply_gains, estimate_gains, gains_for_target, verbose_println, BalanceNotes,
    ColorTemperature, GainSource, GainStrategy, WbAlgorithm, WbMode, WhiteBalanceGains,
};

pub struct BalanceOptions {
    pub input: PathBuf,
    pub wb: String,
    pub algorithm: Option<String>,
    pub kelvin: Option<f64>,
    pub tint: Option<f64>,
    pub duv: Option<f64>,
    pub strategy: Option<String>,
    pub strength: Option<f64>,
    pub out: Option<PathBuf>,
    pub quality: u8,
    pub notes: bool,
    pub json: bool,
}

/// JSON summary printed by `balance --json`.
#[derive(Serialize)]
struct BalanceSummary<'a> {
    #[serde(flatten)]
    notes: &'a BalanceNotes,
    #[serde(skip_serializing_if = "Option::is_none")]
    strategy: Option<GainStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gain_source: Option<GainSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes_file: Option<String>,
}

/// Where the post-decode gains come from.
enum GainRequest {
    Temperature { kelvin: f64, duv: f64 },
    Estimate(WbAlgorithm),
    Neutral,
}

/// Decode, white balance, and export one image.
pub fn cmd_balance(options: BalanceOptions) -> Result<(), String> {
    let defaults = &engine_config_handle().config.defaults;

    let mode: WbMode = options.wb.parse()?;
    let quality = parse_quality(options.quality)?;
    let strength = options.strength.unwrap_or(defaults.strength);
    if !(0.0..=1.0).contains(&strength) {
        return Err(format!("Strength must be in range 0.0-1.0, got {}", strength));
    }

    let tint_given = options.tint.is_some() || options.duv.is_some();
    let duv = resolve_duv(options.tint, options.duv, defaults.tint_scale)?;
    let request = match (options.kelvin, options.algorithm.as_deref()) {
        (Some(_), Some(_)) => {
            return Err("--algorithm cannot be combined with --kelvin".to_string());
        }
        (_, Some(_)) if tint_given => {
            return Err("--algorithm cannot be combined with --tint/--duv".to_string());
        }
        (Some(kelvin), None) => GainRequest::Temperature { kelvin, duv },
        (None, None) if tint_given => GainRequest::Temperature {
            kelvin: REFERENCE_KELVIN,
            duv,
        },
        (None, Some(name)) => GainRequest::Estimate(name.parse()?),
        (None, None) => GainRequest::Neutral,
    };

    let loaded = load_input(&options.input, mode)?;
    let mut image = loaded.image;
    let profile = loaded.metadata.as_ref().map(|m| &m.profile);

    // Pixel-only inputs have no decoder white balance to apply
    let request = match request {
        GainRequest::Neutral if profile.is_none() && mode == WbMode::Auto => {
            GainRequest::Estimate(defaults.algorithm)
        }
        other => other,
    };

    let mean_before = image.channel_means();
    let estimate = ColorTemperature::from_linear_srgb(mean_before, defaults.locus_fit);

    let mut strategy_used = None;
    let mut gain_source = None;
    let (gains, algorithm, target) = match request {
        GainRequest::Temperature { kelvin, duv } => {
            let strategy = match options.strategy.as_deref() {
                Some(name) => name.parse()?,
                None if profile.is_none() && defaults.gain_strategy.needs_profile() => {
                    log::warn!(
                        "{} needs camera metadata; using {} for {}",
                        defaults.gain_strategy,
                        GainStrategy::FastEmpiricalV1,
                        options.input.display()
                    );
                    GainStrategy::FastEmpiricalV1
                }
                None => defaults.gain_strategy,
            };
            let conversion =
                gains_for_target(kelvin, duv, strategy, profile, &defaults.conversion_settings())
                    .map_err(|e| e.to_string())?;
            strategy_used = Some(conversion.strategy);
            gain_source = Some(conversion.source);
            (conversion.gains, None, Some((kelvin, duv)))
        }
        GainRequest::Estimate(algorithm) => {
            let gains = estimate_gains(&image, algorithm, &defaults.estimator_config());
            (gains, Some(algorithm), None)
        }
        GainRequest::Neutral => (WhiteBalanceGains::NEUTRAL, None, None),
    };

    let gains = gains.with_strength(strength);
    verbose_println!(
        "Gains (R,G,B): {:.4}, {:.4}, {:.4}",
        gains.red_gain,
        gains.green_gain,
        gains.blue_gain
    );
    apply_gains(&mut image, &gains);
    let mean_after = image.channel_means();

    let output = determine_output_path(&options.input, &options.out, "balanced", "jpg")?;
    if is_tiff_path(&output) {
        write_tiff16(&image, &output)?;
    } else {
        write_jpeg(&image, &output, quality)?;
    }

    let notes = BalanceNotes {
        input: options.input.display().to_string(),
        output: output.display().to_string(),
        mode: loaded
            .mode
            .map(|m| m.to_string())
            .unwrap_or_else(|| "tiff".to_string()),
        algorithm,
        kelvin: target.map(|(k, _)| k),
        duv: target.map(|(_, d)| d),
        gains,
        mean_before,
        mean_after,
        estimate,
    };

    let notes_file = if options.notes {
        let path = notes_path(&output);
        write_notes(&path, &notes.to_text())?;
        Some(path.display().to_string())
    } else {
        None
    };

    if options.json {
        let summary = BalanceSummary {
            notes: &notes,
            strategy: strategy_used,
            gain_source,
            notes_file,
        };
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("Failed to serialize summary: {}", e))?;
        println!("{}", json);
    } else {
        println!("Saved: {}", output.display());
        println!(
            "CCT (estimated): {:.0} K, Duv: {:.4}",
            estimate.cct_kelvin, estimate.duv
        );
        if let Some(path) = notes_file {
            println!("Notes: {}", path);
        }
    }

    Ok(())
}
