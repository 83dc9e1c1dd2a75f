use std::io::Write;
use tiff::encoder::colortype::{ColorType, Gray16, RGB16};
use tracing::debug;
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::common::plane::Plane;
use crate::image_pipeline::debayer::types::ColorImage;
use crate::image_pipeline::export::types::{quantize_u16, TiffCompression};
use crate::image_pipeline::export::writer::ImageWriter;

/// Writes stage images as 16-bit TIFF files.
pub struct StandardTiffWriter {
    compression: TiffCompression,
}

impl StandardTiffWriter {
    pub fn new(compression: TiffCompression) -> Self {
        Self { compression }
    }

    fn encode<C: ColorType<Inner = u16>>(
        &self,
        width: usize,
        height: usize,
        samples: &[u16],
        output: &mut dyn Write,
    ) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}", width, height);

        let mut buffer = Vec::new();

        let compression = match self.compression {
            TiffCompression::None => tiff::encoder::Compression::Uncompressed,
            TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
            TiffCompression::Deflate => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Balanced),
        };

        let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?
            .with_compression(compression);

        encoder.write_image::<C>(width as u32, height as u32, samples)
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}

impl ImageWriter for StandardTiffWriter {
    fn extension(&self) -> &str {
        ".tiff"
    }

    fn write_gray(&self, image: &Plane, output: &mut dyn Write) -> Result<()> {
        let samples: Vec<u16> = image.data.iter().map(|&v| quantize_u16(v)).collect();
        self.encode::<Gray16>(image.width, image.height, &samples, output)
    }

    fn write_rgb(&self, image: &ColorImage, output: &mut dyn Write) -> Result<()> {
        let samples: Vec<u16> = image.data.iter().map(|&v| quantize_u16(v)).collect();
        self.encode::<RGB16>(image.width, image.height, &samples, output)
    }
}
