use std::path::PathBuf;

use whitepoint_cli::processing::{linear_path, write_jpeg, write_tiff16};
use whitepoint_cli::{
    determine_output_path, parse_adapt_target, parse_named, parse_quality, AdaptMode,
};
use whitepoint_core::config::engine_config_handle;
use whitepoint_core::temperature::describe_kelvin;
use whitepoint_core::{
    estimate_scene_white_point, verbose_println, ChromaticAdaptation, ChromaticityXY,
    ColorTemperature, WbError, WbMode,
};
use whitepoint_raw::{decode_raw, read_metadata};

pub struct AdaptOptions {
    pub input: PathBuf,
    pub mode: String,
    pub kelvin: Option<f64>,
    pub duv: Option<f64>,
    pub xy: Option<String>,
    pub cat: Option<String>,
    pub out: Option<PathBuf>,
    pub quality: u8,
    pub save_linear: bool,
}

/// Move a RAW file's white point to a target with a chromatic adaptation.
pub fn cmd_adapt(options: AdaptOptions) -> Result<(), String> {
    let defaults = &engine_config_handle().config.defaults;
    let fit = defaults.locus_fit;

    let mode: AdaptMode = options.mode.parse()?;
    let method = parse_named(options.cat.as_deref(), defaults.adaptation_method)?;
    let quality = parse_quality(options.quality)?;
    let target = parse_adapt_target(mode, options.kelvin, options.duv, options.xy.as_deref())?;

    let metadata = read_metadata(&options.input)?;
    let source_xy = if mode.uses_camera_white() {
        estimate_scene_white_point(&metadata.profile, fit).xy
    } else {
        ChromaticityXY::D65
    };
    let target_xy = target
        .resolve(Some(&metadata.profile), fit)
        .map_err(|e| e.to_string())?;

    let source = ColorTemperature::from_xy(source_xy, fit);
    let destination = ColorTemperature::from_xy(target_xy, fit);
    verbose_println!(
        "Source white: ({:.4}, {:.4}) {:.0} K, Duv {:.4} ({})",
        source_xy.x,
        source_xy.y,
        source.cct_kelvin,
        source.duv,
        describe_kelvin(source.cct_kelvin)
    );
    verbose_println!(
        "Target white: ({:.4}, {:.4}) {:.0} K, Duv {:.4}",
        target_xy.x,
        target_xy.y,
        destination.cct_kelvin,
        destination.duv
    );

    // Develop with the daylight multipliers so the CAT sees an unadapted scene
    let daylight = if metadata.pre_mul[..3].iter().all(|&m| m > 0.0) {
        WbMode::User(metadata.pre_mul)
    } else {
        log::warn!("no daylight multipliers in metadata; developing with camera white balance");
        WbMode::Camera
    };
    let mut image = decode_raw(&options.input, daylight)?.image;

    let (cat, failure) =
        ChromaticAdaptation::between_xy_or_identity(source_xy, target_xy, method);
    match failure {
        Some(err) => println!("{}", identity_notice(&err)),
        None => verbose_println!("Applying {} adaptation", method),
    }
    cat.apply_to_image(&mut image);

    let output = determine_output_path(&options.input, &options.out, "whitepoint", "jpg")?;
    write_jpeg(&image, &output, quality)?;
    println!("Saved: {}", output.display());

    if options.save_linear {
        let path = linear_path(&output);
        write_tiff16(&image, &path)?;
        println!("Linear: {}", path.display());
    }

    Ok(())
}

fn identity_notice(err: &WbError) -> String {
    format!("Identity adaptation used: {}", err)
}
