//! RAW file decoding using LibRaw
//!
//! This crate keeps the rsraw/rsraw-sys dependencies away from the engine.
//! It hands out the camera color metadata (`cam_mul`, `pre_mul`, `cam_xyz`)
//! as a [`CameraColorProfile`] and the developed image as a linear sRGB
//! [`LinearImage`].

use std::path::Path;

use rsraw::{RawImage, BIT_DEPTH_16};
use whitepoint_core::image::{ChannelOrder, LinearImage};
use whitepoint_core::report::WbMode;
use whitepoint_core::scene::CameraColorProfile;

/// Camera identification and color metadata.
#[derive(Debug, Clone)]
pub struct RawMetadata {
    pub make: String,
    pub model: String,
    /// `cam_mul` and `cam_xyz`
    pub profile: CameraColorProfile,
    /// Daylight multipliers LibRaw derives from the color matrix
    pub pre_mul: [f64; 4],
}

/// Decoded RAW image plus the metadata read along the way.
#[derive(Debug, Clone)]
pub struct DecodedRaw {
    /// Linear sRGB (D65), 0.0-1.0
    pub image: LinearImage,
    pub metadata: RawMetadata,
    pub mode: WbMode,
}

/// List of supported RAW file extensions
pub const RAW_EXTENSIONS: &[&str] = &[
    "cr2", "cr3", "nef", "nrw", "arw", "raf", "rw2", "orf", "pef", "dng", "3fr", "fff", "iiq",
    "rwl", "raw",
];

/// Check if a file extension is a supported RAW format
pub fn is_raw_extension(ext: &str) -> bool {
    RAW_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

fn open_unpacked(path: &Path) -> Result<RawImage, String> {
    let data = std::fs::read(path).map_err(|e| format!("Failed to read RAW file: {}", e))?;
    let mut raw = RawImage::open(&data).map_err(|e| format!("Failed to open RAW file: {:?}", e))?;
    raw.unpack()
        .map_err(|e| format!("Failed to unpack RAW data: {:?}", e))?;
    Ok(raw)
}

fn c_string(raw: &[std::os::raw::c_char]) -> String {
    raw.iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8 as char)
        .collect::<String>()
        .trim()
        .to_string()
}

fn metadata_of(raw: &mut RawImage) -> RawMetadata {
    let libraw_data: &mut rsraw_sys::libraw_data_t = raw.as_mut();
    let color = &libraw_data.color;
    let profile = CameraColorProfile::from_f32(color.cam_mul, color.cam_xyz);

    RawMetadata {
        make: c_string(&libraw_data.idata.make),
        model: c_string(&libraw_data.idata.model),
        profile,
        pre_mul: color.pre_mul.map(|v| v as f64),
    }
}

/// Read only the camera metadata.
pub fn read_metadata<P: AsRef<Path>>(path: P) -> Result<RawMetadata, String> {
    let mut raw = open_unpacked(path.as_ref())?;
    let metadata = metadata_of(&mut raw);
    log::debug!(
        "{} {}: cam_mul {:?}",
        metadata.make,
        metadata.model,
        metadata.profile.white_balance_multipliers
    );
    Ok(metadata)
}

/// Camera color profile of a RAW file.
pub fn read_profile<P: AsRef<Path>>(path: P) -> Result<CameraColorProfile, String> {
    read_metadata(path).map(|m| m.profile)
}

/// Configure LibRaw for linear sRGB output under `mode`.
fn configure(params: &mut rsraw_sys::libraw_output_params_t, mode: WbMode) {
    // AHD demosaic
    params.user_qual = 3;
    params.no_auto_bright = 1;
    // Linear transfer; encoding happens at export
    params.gamm[0] = 1.0;
    params.gamm[1] = 1.0;
    // sRGB primaries
    params.output_color = 1;

    params.use_camera_wb = 0;
    params.use_auto_wb = 0;
    params.user_mul = [0.0; 4];

    match mode {
        WbMode::Camera => params.use_camera_wb = 1,
        WbMode::Auto => params.use_auto_wb = 1,
        WbMode::None => params.user_mul = [1.0; 4],
        WbMode::User(mul) => params.user_mul = mul.map(|m| m as f32),
    }
}

/// Develop a RAW file to a linear sRGB buffer using rsraw (LibRaw wrapper).
pub fn decode_raw<P: AsRef<Path>>(path: P, mode: WbMode) -> Result<DecodedRaw, String> {
    let mut raw = open_unpacked(path.as_ref())?;
    let metadata = metadata_of(&mut raw);

    {
        let libraw_data: &mut rsraw_sys::libraw_data_t = raw.as_mut();
        configure(&mut libraw_data.params, mode);
    }

    let processed = raw
        .process::<BIT_DEPTH_16>()
        .map_err(|e| format!("Failed to process RAW: {:?}", e))?;

    let width = processed.width();
    let height = processed.height();
    let channels = processed.colors() as u8;

    let pixel_data: &[u16] = &processed;
    let data = convert_raw_u16_to_f32_rgb(pixel_data, width, height, channels)?;
    let image =
        LinearImage::new(width, height, data, ChannelOrder::Rgb).map_err(|e| e.to_string())?;

    log::debug!("decoded {}x{} RAW with {} white balance", width, height, mode);
    Ok(DecodedRaw {
        image,
        metadata,
        mode,
    })
}

/// Convert RAW pixel data (16-bit u16 slice) to f32 linear RGB (0.0-1.0)
/// Uses parallel processing via rayon for large images
fn convert_raw_u16_to_f32_rgb(
    pixel_data: &[u16],
    width: u32,
    height: u32,
    channels: u8,
) -> Result<Vec<f32>, String> {
    use rayon::prelude::*;

    let pixel_count = width as usize * height as usize;
    let expected_len = pixel_count * channels as usize;

    if pixel_data.len() < expected_len {
        return Err(format!(
            "RAW buffer size mismatch: expected at least {}, got {}",
            expected_len,
            pixel_data.len()
        ));
    }

    let to_unit = |v: u16| v as f32 / 65535.0;
    let rgb_data: Vec<f32> = match channels {
        3 => pixel_data[..expected_len]
            .par_iter()
            .map(|&v| to_unit(v))
            .collect(),
        // Drop alpha
        4 => pixel_data[..expected_len]
            .par_chunks_exact(4)
            .flat_map(|px| [to_unit(px[0]), to_unit(px[1]), to_unit(px[2])])
            .collect(),
        1 => pixel_data[..expected_len]
            .par_iter()
            .flat_map(|&gray| {
                let v = to_unit(gray);
                [v, v, v]
            })
            .collect(),
        _ => return Err(format!("Unexpected RAW channel count: {}", channels)),
    };

    Ok(rgb_data)
}
