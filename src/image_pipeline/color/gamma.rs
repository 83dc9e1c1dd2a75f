//! Power-law intensity remapping.

use std::fmt;
use std::str::FromStr;

use tracing::{info, instrument};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::debayer::types::ColorImage;

/// A validated gamma exponent, finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gamma(f32);

impl Gamma {
    pub fn new(value: f32) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConversionError::InvalidGamma(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// The exponent that undoes this one.
    pub fn inverse(self) -> Self {
        Self(1.0 / self.0)
    }
}

impl Default for Gamma {
    fn default() -> Self {
        Self(1.0 / 2.2)
    }
}

impl FromStr for Gamma {
    type Err = ConversionError;

    /// Parses `numerator/denominator` (e.g. `1./2.2`) or a plain number.
    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| {
            part.trim().parse::<f32>().map_err(|e| {
                ConversionError::InvalidArgument(format!("gamma '{}': {}", s.trim(), e))
            })
        };

        let value = match s.split_once('/') {
            Some((numerator, denominator)) => parse(numerator)? / parse(denominator)?,
            None => parse(s)?,
        };

        Gamma::new(value)
    }
}

impl fmt::Display for Gamma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raises every sample of `image` to the power `gamma`.
///
/// Rejects `gamma <= 0` (and non-finite values) with `InvalidGamma` before
/// touching any pixel.
#[instrument(skip(image), fields(width = image.width, height = image.height))]
pub fn gamma_correct(image: &ColorImage, gamma: f32) -> Result<ColorImage> {
    let gamma = Gamma::new(gamma)?;
    info!("START gamma_correction");
    let data = image.data.iter().map(|&v| v.powf(gamma.value())).collect();
    info!("END gamma_correction");
    ColorImage::from_vec(image.width, image.height, data)
}
