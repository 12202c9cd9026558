//! Input decoding and path utilities.

use std::path::{Path, PathBuf};

use whitepoint_core::{ChannelOrder, LinearImage, WbMode};
use whitepoint_raw::{decode_raw, is_raw_extension, RawMetadata};

/// Pixel-only inputs (no camera metadata)
pub const TIFF_EXTENSIONS: &[&str] = &["tif", "tiff"];

/// A decoded input image and, for RAW files, its camera metadata.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub image: LinearImage,
    pub metadata: Option<RawMetadata>,
    /// Decoder white balance, `None` for TIFF input
    pub mode: Option<WbMode>,
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

pub fn is_tiff_path(path: &Path) -> bool {
    TIFF_EXTENSIONS.contains(&extension_of(path).as_str())
}

/// Decode a RAW file under `mode`, or a TIFF as-is.
pub fn load_input(path: &Path, mode: WbMode) -> Result<LoadedImage, String> {
    if !path.is_file() {
        return Err(format!("Input not found: {}", path.display()));
    }

    if is_tiff_path(path) {
        whitepoint_core::verbose_println!("Decoding TIFF {}", path.display());
        return Ok(LoadedImage {
            image: decode_tiff(path)?,
            metadata: None,
            mode: None,
        });
    }

    let ext = extension_of(path);
    if !is_raw_extension(&ext) {
        return Err(format!("Unsupported input format: .{}", ext));
    }

    whitepoint_core::verbose_println!("Decoding RAW {} ({} white balance)", path.display(), mode);
    let decoded = decode_raw(path, mode)?;
    Ok(LoadedImage {
        image: decoded.image,
        metadata: Some(decoded.metadata),
        mode: Some(decoded.mode),
    })
}

/// Decode an 8/16-bit or float TIFF into a linear RGB image.
///
/// The samples are taken as linear; no transfer curve is removed.
pub fn decode_tiff(path: &Path) -> Result<LinearImage, String> {
    use std::fs::File;
    use std::io::BufReader;
    use tiff::decoder::{DecodingResult, Limits};

    let file = File::open(path).map_err(|e| format!("Failed to open TIFF file: {}", e))?;

    let mut limits = Limits::default();
    limits.decoding_buffer_size = 1024 * 1024 * 1024;
    limits.ifd_value_size = 1024 * 1024 * 1024;
    limits.intermediate_buffer_size = 1024 * 1024 * 1024;

    let mut decoder = tiff::decoder::Decoder::new(BufReader::new(file))
        .map_err(|e| format!("Failed to create TIFF decoder: {}", e))?
        .with_limits(limits);

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| format!("Failed to get TIFF dimensions: {}", e))?;
    let color_type = decoder
        .colortype()
        .map_err(|e| format!("Failed to get TIFF color type: {}", e))?;
    let channels = match color_type {
        tiff::ColorType::Gray(_) => 1,
        tiff::ColorType::RGB(_) => 3,
        tiff::ColorType::RGBA(_) => 4,
        other => return Err(format!("Unsupported TIFF color type: {:?}", other)),
    };

    let data = match decoder
        .read_image()
        .map_err(|e| format!("Failed to read TIFF image data: {}", e))?
    {
        DecodingResult::U8(buf) => to_rgb(&buf, width, height, channels)?,
        DecodingResult::U16(buf) => to_rgb(&buf, width, height, channels)?,
        DecodingResult::F32(buf) => to_rgb(&buf, width, height, channels)?,
        _ => return Err("Only 8-bit, 16-bit and 32-bit float TIFFs are supported".to_string()),
    };

    LinearImage::new(width, height, data, ChannelOrder::Rgb).map_err(|e| e.to_string())
}

/// Normalization of TIFF samples to 0.0-1.0
trait TiffSample: Copy {
    fn to_unit(self) -> f32;
}

impl TiffSample for u8 {
    fn to_unit(self) -> f32 {
        self as f32 / 255.0
    }
}

impl TiffSample for u16 {
    fn to_unit(self) -> f32 {
        self as f32 / 65535.0
    }
}

impl TiffSample for f32 {
    fn to_unit(self) -> f32 {
        self
    }
}

fn to_rgb<T: TiffSample>(
    buf: &[T],
    width: u32,
    height: u32,
    channels: usize,
) -> Result<Vec<f32>, String> {
    let expected = width as usize * height as usize * channels;
    if buf.len() != expected {
        return Err(format!(
            "TIFF buffer size mismatch: expected {}, got {}",
            expected,
            buf.len()
        ));
    }

    let rgb = match channels {
        1 => buf
            .iter()
            .flat_map(|&v| {
                let g = v.to_unit();
                [g, g, g]
            })
            .collect(),
        // Drop alpha
        4 => buf
            .chunks_exact(4)
            .flat_map(|px| [px[0].to_unit(), px[1].to_unit(), px[2].to_unit()])
            .collect(),
        _ => buf.iter().map(|&v| v.to_unit()).collect(),
    };
    Ok(rgb)
}

/// Determine the output path for `input`.
///
/// `out` may be a directory (the generated file name goes inside it) or a
/// file path used as-is. Without `out` the file lands next to the input as
/// `<stem>_<suffix>.<extension>`.
pub fn determine_output_path(
    input: &Path,
    out: &Option<PathBuf>,
    suffix: &str,
    extension: &str,
) -> Result<PathBuf, String> {
    let filename = || -> Result<String, String> {
        let stem = input
            .file_stem()
            .ok_or("Invalid input filename")?
            .to_string_lossy();
        Ok(format!("{}_{}.{}", stem, suffix, extension))
    };

    match out {
        Some(out_path) if out_path.is_dir() => Ok(out_path.join(filename()?)),
        Some(out_path) => Ok(out_path.clone()),
        None => {
            let parent = input.parent().unwrap_or(Path::new("."));
            Ok(parent.join(filename()?))
        }
    }
}
