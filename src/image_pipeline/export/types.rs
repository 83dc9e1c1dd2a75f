//! Output format selection

use image::ImageFormat;

use crate::image_pipeline::common::error::{ConversionError, Result};

/// TIFF compression methods
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    #[default]
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - balanced level
    Deflate,
}

/// Encoding used for every stage image of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// 16-bit TIFF written with the tiff crate
    Tiff(TiffCompression),
    /// 8-bit raster written with the image crate (PNG, JPEG, BMP)
    Raster(ImageFormat),
}

impl OutputFormat {
    /// Picks the format from a file extension, with or without the leading dot.
    pub fn from_extension(extension: &str, compression: TiffCompression) -> Result<Self> {
        let ext = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "tif" | "tiff" => Ok(OutputFormat::Tiff(compression)),
            _ => match ImageFormat::from_extension(&ext) {
                Some(format @ (ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Bmp)) => {
                    Ok(OutputFormat::Raster(format))
                }
                _ => Err(ConversionError::UnsupportedFormat(format!(
                    "output extension '{extension}'"
                ))),
            },
        }
    }
}

/// Maps [0,1] to 0..=255, clamping first so overshoot cannot wrap around.
pub fn quantize_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Maps [0,1] to the full u16 range.
pub fn quantize_u16(value: f32) -> u16 {
    (value.clamp(0.0, 1.0) * 65535.0) as u16
}
