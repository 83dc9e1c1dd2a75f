//! RAW image reader implementation using the rawloader library.
//!
//! Decodes any format rawloader understands (ARW, CR2, NEF, DNG, ...) and
//! returns the visible part of the single-channel sensor mosaic.

use std::io::Cursor;

use tracing::{debug, warn};
use rawloader::RawImageData as RawloaderImageData;
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::raw::types::RawImageData;
use crate::image_pipeline::raw::reader::RawImageReader;

/// RAW image reader that uses the rawloader library for decoding.
pub struct RawLoaderReader;

/// Default bit depth when no white level information is available from the RAW file.
const DEFAULT_BITS_PER_SAMPLE: u32 = 16;

/// The bit width of the u16 data type, used for calculating actual bits per sample.
const U16_BITS: u32 = 16;

impl RawImageReader for RawLoaderReader {
    /// Reads and decodes RAW image data from a byte array.
    ///
    /// This method:
    /// 1. Decodes the RAW file using rawloader
    /// 2. Converts the data to u16 format (handles both integer and float RAW data)
    /// 3. Crops the mosaic to the visible area reported by the decoder
    /// 4. Calculates the actual bits per sample from the sensor's white level metadata
    ///
    /// Files with more than one component per pixel (already demosaiced or
    /// linear DNGs) are rejected with `UnsupportedFormat`.
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        if decoded.cpp != 1 {
            return Err(ConversionError::UnsupportedFormat(format!(
                "{} components per pixel, expected a single-channel Bayer mosaic",
                decoded.cpp
            )));
        }

        let full_width = decoded.width;
        let full_height = decoded.height;
        debug!("Decoded image: {}x{}", full_width, full_height);

        // Integer data is cast directly, float data (normalized 0.0-1.0) is scaled to u16 range
        let full: Vec<u16> = match &decoded.data {
            RawloaderImageData::Integer(values) => values.clone(),
            RawloaderImageData::Float(values) => {
                values.iter().map(|&v| (v.clamp(0.0, 1.0) * u16::MAX as f32) as u16).collect()
            }
        };

        let [top, right, bottom, left] = decoded.crops;
        let width = full_width.saturating_sub(left + right);
        let height = full_height.saturating_sub(top + bottom);
        if width == 0 || height == 0 || full.len() < full_width * full_height {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        let data: Vec<u16> = full
            .chunks_exact(full_width)
            .skip(top)
            .take(height)
            .flat_map(|row| row[left..left + width].iter().copied())
            .collect();

        debug!(
            "Visible area: {}x{} (crops top={} right={} bottom={} left={})",
            width, height, top, right, bottom, left
        );

        let cfa = decoded.cropped_cfa().name;
        if cfa != "RGGB" {
            warn!("Sensor reports a {} color filter array, processing it as RGGB", cfa);
        }

        // The white level is the largest value the sensor can produce, so its
        // bit length is the effective bit depth (4095 -> 12 bits, 16383 -> 14 bits).
        let max_white_level = decoded.whitelevels.iter().max().copied().unwrap_or(u16::MAX);
        let bits_per_sample = if max_white_level == 0 {
            DEFAULT_BITS_PER_SAMPLE
        } else {
            U16_BITS - max_white_level.leading_zeros()
        };

        debug!("Calculated bits_per_sample: {} (max white level: {})", bits_per_sample, max_white_level);

        Ok(RawImageData {
            width,
            height,
            data,
            bits_per_sample,
            cfa,
        })
    }
}
