use std::path::PathBuf;

use whitepoint_cli::parse_correction_target;
use whitepoint_core::config::engine_config_handle;
use whitepoint_core::{verbose_println, WhiteBalanceReport};
use whitepoint_raw::read_metadata;

pub struct InspectOptions {
    pub input: PathBuf,
    pub json: bool,
    pub verbose: bool,
    pub target: Option<String>,
    pub kelvin: Option<f64>,
    pub duv: Option<f64>,
    pub xy: Option<String>,
}

/// Report the scene white point recorded in a RAW file.
pub fn cmd_inspect(options: InspectOptions) -> Result<(), String> {
    let defaults = &engine_config_handle().config.defaults;
    let target = parse_correction_target(
        options.target.as_deref(),
        options.kelvin,
        options.duv,
        options.xy.as_deref(),
    )?;

    let metadata = read_metadata(&options.input)?;
    verbose_println!("Camera: {} {}", metadata.make, metadata.model);

    let report = WhiteBalanceReport::build(
        options.input.display().to_string(),
        &metadata.profile,
        &target,
        defaults.locus_fit,
        defaults.tint_scale,
    )
    .map_err(|e| e.to_string())?
    .with_debug(&metadata.profile, Some(metadata.pre_mul));

    if options.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {}", e))?;
        println!("{}", json);
    } else {
        print!("{}", report.to_text(options.verbose));
    }

    Ok(())
}
