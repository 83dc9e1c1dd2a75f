use std::io::{Cursor, Write};
use image::{GrayImage, RgbImage};
use tracing::debug;
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::common::plane::Plane;
use crate::image_pipeline::debayer::types::ColorImage;
use crate::image_pipeline::export::standard_tiff_writer::StandardTiffWriter;
use crate::image_pipeline::export::types::{quantize_u8, OutputFormat};
use crate::image_pipeline::export::writer::ImageWriter;

/// Default writer: 8-bit rasters through the image crate, TIFF through the tiff crate.
pub struct StandardImageWriter {
    format: OutputFormat,
    extension: String,
}

impl StandardImageWriter {
    pub fn new(format: OutputFormat) -> Self {
        let extension = match format {
            OutputFormat::Tiff(_) => ".tiff".to_string(),
            OutputFormat::Raster(f) => format!(".{}", f.extensions_str().first().copied().unwrap_or("img")),
        };
        Self { format, extension }
    }

    /// Keeps the caller's spelling of the extension (".jpeg" vs ".jpg") for file names.
    pub fn with_extension(format: OutputFormat, extension: &str) -> Self {
        let ext = extension.trim().trim_start_matches('.');
        Self {
            format,
            extension: format!(".{ext}"),
        }
    }

    fn encode_raster(encode: impl FnOnce(&mut Cursor<&mut Vec<u8>>) -> image::ImageResult<()>, output: &mut dyn Write) -> Result<()> {
        let mut buffer = Vec::new();
        encode(&mut Cursor::new(&mut buffer)).map_err(|e| ConversionError::EncodeError(e.to_string()))?;
        output.write_all(&buffer)?;
        Ok(())
    }
}

impl ImageWriter for StandardImageWriter {
    fn extension(&self) -> &str {
        &self.extension
    }

    fn write_gray(&self, image: &Plane, output: &mut dyn Write) -> Result<()> {
        let format = match self.format {
            OutputFormat::Raster(format) => format,
            OutputFormat::Tiff(compression) => {
                return StandardTiffWriter::new(compression).write_gray(image, output);
            }
        };

        debug!("Encoding {:?} grayscale image: {}x{}", format, image.width, image.height);
        let pixels = image.data.iter().map(|&v| quantize_u8(v)).collect();
        let gray = GrayImage::from_raw(image.width as u32, image.height as u32, pixels)
            .ok_or(ConversionError::InvalidDimensions(image.width, image.height))?;
        Self::encode_raster(|cursor| gray.write_to(cursor, format), output)
    }

    fn write_rgb(&self, image: &ColorImage, output: &mut dyn Write) -> Result<()> {
        let format = match self.format {
            OutputFormat::Raster(format) => format,
            OutputFormat::Tiff(compression) => {
                return StandardTiffWriter::new(compression).write_rgb(image, output);
            }
        };

        debug!("Encoding {:?} RGB image: {}x{}", format, image.width, image.height);
        let pixels = image.data.iter().map(|&v| quantize_u8(v)).collect();
        let rgb = RgbImage::from_raw(image.width as u32, image.height as u32, pixels)
            .ok_or(ConversionError::InvalidDimensions(image.width, image.height))?;
        Self::encode_raster(|cursor| rgb.write_to(cursor, format), output)
    }
}
