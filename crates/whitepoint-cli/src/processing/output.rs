//! Output encoding: sRGB JPEG, linear 16-bit TIFF, and notes files.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use whitepoint_core::parallel::parallel_map_chunks;
use whitepoint_core::LinearImage;

/// Convert linear RGB to sRGB (IEC 61966-2-1 transfer curve)
pub fn linear_to_srgb(linear: f32) -> f32 {
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Clip to 0.0-1.0, sRGB encode and quantize to interleaved RGB bytes.
pub fn encode_srgb8(image: &LinearImage) -> Vec<u8> {
    let order = image.order;
    let to_u8 = |v: f32| (linear_to_srgb(v.clamp(0.0, 1.0)) * 255.0).round() as u8;

    parallel_map_chunks(&image.data, 3, |px| {
        let [r, g, b] = order.to_rgb(px);
        [to_u8(r), to_u8(g), to_u8(b)]
    })
    .into_iter()
    .flatten()
    .collect()
}

/// Write an 8-bit sRGB JPEG.
pub fn write_jpeg(image: &LinearImage, path: &Path, quality: u8) -> Result<(), String> {
    use image::codecs::jpeg::JpegEncoder;

    let bytes = encode_srgb8(image);
    let rgb = image::RgbImage::from_raw(image.width, image.height, bytes)
        .ok_or("JPEG buffer does not match image dimensions")?;

    let file = File::create(path).map_err(|e| format!("Failed to create JPEG file: {}", e))?;
    let mut encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality);
    encoder
        .encode_image(&rgb)
        .map_err(|e| format!("Failed to write JPEG image: {}", e))
}

/// Write the linear buffer as a 16-bit RGB TIFF (clipped, no transfer curve).
pub fn write_tiff16(image: &LinearImage, path: &Path) -> Result<(), String> {
    let file = File::create(path).map_err(|e| format!("Failed to create TIFF file: {}", e))?;
    let mut encoder = tiff::encoder::TiffEncoder::new(BufWriter::new(file))
        .map_err(|e| format!("Failed to create TIFF encoder: {}", e))?;

    let order = image.order;
    let to_u16 = |v: f32| (v.clamp(0.0, 1.0) * 65535.0).round() as u16;
    let u16_data: Vec<u16> = parallel_map_chunks(&image.data, 3, |px| {
        let [r, g, b] = order.to_rgb(px);
        [to_u16(r), to_u16(g), to_u16(b)]
    })
    .into_iter()
    .flatten()
    .collect();

    encoder
        .write_image::<tiff::encoder::colortype::RGB16>(image.width, image.height, &u16_data)
        .map_err(|e| format!("Failed to write TIFF image: {}", e))
}

/// `<output>.txt`, next to the output image
pub fn notes_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".txt");
    PathBuf::from(name)
}

/// `<output>.linear.tiff`, next to the output image
pub fn linear_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".linear.tiff");
    PathBuf::from(name)
}

pub fn write_notes(path: &Path, text: &str) -> Result<(), String> {
    std::fs::write(path, text)
        .map_err(|e| format!("Failed to write notes {}: {}", path.display(), e))
}
