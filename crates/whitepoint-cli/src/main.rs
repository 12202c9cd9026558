use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{
    cmd_adapt, cmd_balance, cmd_inspect, AdaptOptions, BalanceOptions, InspectOptions,
};

#[derive(Parser)]
#[command(name = "whitepoint")]
#[command(version, about = "Color temperature and white balance for RAW files", long_about = None)]
struct Cli {
    /// Engine config file (YAML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print progress and diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the scene white point recorded in a RAW file
    Inspect {
        /// Input RAW file
        #[arg(value_name = "RAW")]
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Target illuminant (D65, D50, A, ...) or user:R,G,B,G2
        #[arg(long, value_name = "NAME")]
        target: Option<String>,

        /// Target color temperature in Kelvin
        #[arg(long, value_name = "K")]
        kelvin: Option<f64>,

        /// Target Duv (positive = green), requires --kelvin
        #[arg(long, value_name = "D", allow_hyphen_values = true)]
        duv: Option<f64>,

        /// Target chromaticity
        #[arg(long, value_name = "X,Y")]
        xy: Option<String>,
    },

    /// Decode and white balance an image, then export it
    Balance {
        /// Input RAW or TIFF file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Decoder white balance: camera, auto, none or user:R,G,B,G2
        #[arg(long, value_name = "MODE", default_value = "camera")]
        wb: String,

        /// Pixel estimator: gray-world, white-point, perfect-reflector, percentile, combined
        #[arg(long, value_name = "NAME")]
        algorithm: Option<String>,

        /// Light color temperature to neutralize
        #[arg(long, value_name = "K")]
        kelvin: Option<f64>,

        /// Tint in display units (duv x 3000 by default)
        #[arg(long, value_name = "T", allow_hyphen_values = true)]
        tint: Option<f64>,

        /// Duv offset (positive = green)
        #[arg(long, value_name = "D", allow_hyphen_values = true)]
        duv: Option<f64>,

        /// Gain strategy: matrix, fast-empirical-v1, fast-empirical-v2
        #[arg(long, value_name = "NAME")]
        strategy: Option<String>,

        /// Correction strength, 0.0 (none) to 1.0 (full)
        #[arg(long, value_name = "S")]
        strength: Option<f64>,

        /// Output file or directory (.jpg, or .tif for linear 16-bit)
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// JPEG quality (1-100)
        #[arg(long, value_name = "Q", default_value = "90")]
        quality: u8,

        /// Write a notes file next to the output
        #[arg(long)]
        notes: bool,

        /// Print a JSON summary
        #[arg(long)]
        json: bool,
    },

    /// Adapt a RAW file from its scene white to a target white
    Adapt {
        /// Input RAW file
        #[arg(value_name = "RAW")]
        input: PathBuf,

        /// Source/target selection: camera, auto, kelvin or xy
        #[arg(long, value_name = "MODE", default_value = "camera")]
        mode: String,

        /// Target color temperature for --mode kelvin
        #[arg(long, value_name = "K")]
        kelvin: Option<f64>,

        /// Target Duv for --mode kelvin (positive = green)
        #[arg(long, value_name = "D", allow_hyphen_values = true)]
        duv: Option<f64>,

        /// Target chromaticity for --mode xy
        #[arg(long, value_name = "X,Y")]
        xy: Option<String>,

        /// Adaptation method: bradford, von-kries, cat02
        #[arg(long, value_name = "METHOD")]
        cat: Option<String>,

        /// Output file or directory
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// JPEG quality (1-100)
        #[arg(long, value_name = "Q", default_value = "95")]
        quality: u8,

        /// Also write the adapted linear image as 16-bit TIFF
        #[arg(long)]
        save_linear: bool,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();

    whitepoint_core::config::set_verbose(cli.verbose);
    init_logging(cli.verbose);
    whitepoint_core::config::init_engine_config(cli.config.as_deref());
    whitepoint_core::config::log_config_usage();

    let result = match cli.command {
        Commands::Inspect {
            input,
            json,
            target,
            kelvin,
            duv,
            xy,
        } => cmd_inspect(InspectOptions {
            input,
            json,
            verbose: cli.verbose,
            target,
            kelvin,
            duv,
            xy,
        }),

        Commands::Balance {
            input,
            wb,
            algorithm,
            kelvin,
            tint,
            duv,
            strategy,
            strength,
            out,
            quality,
            notes,
            json,
        } => cmd_balance(BalanceOptions {
            input,
            wb,
            algorithm,
            kelvin,
            tint,
            duv,
            strategy,
            strength,
            out,
            quality,
            notes,
            json,
        }),

        Commands::Adapt {
            input,
            mode,
            kelvin,
            duv,
            xy,
            cat,
            out,
            quality,
            save_linear,
        } => cmd_adapt(AdaptOptions {
            input,
            mode,
            kelvin,
            duv,
            xy,
            cat,
            out,
            quality,
            save_linear,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
