//! Per-channel gain correction against a neutral reference.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, instrument};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::debayer::types::ColorImage;

/// Where the white balance gains come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WhiteBalanceReference {
    /// Multipliers used as given
    GainTriple { r: f32, g: f32, b: f32 },
    /// A pixel of the demosaiced image that should come out neutral
    PixelReference { row: usize, col: usize },
}

impl Default for WhiteBalanceReference {
    fn default() -> Self {
        WhiteBalanceReference::PixelReference { row: 1200, col: 230 }
    }
}

impl WhiteBalanceReference {
    /// Turns the reference into concrete per-channel gains for `image`.
    ///
    /// A pixel reference yields the reciprocal of that pixel's value in each
    /// channel. A zero (or non-finite) value there, or a non-finite explicit
    /// gain, is reported as `DegenerateGain`.
    pub fn resolve(&self, image: &ColorImage) -> Result<[f32; 3]> {
        let gains = match *self {
            WhiteBalanceReference::GainTriple { r, g, b } => [r, g, b],
            WhiteBalanceReference::PixelReference { row, col } => {
                let pixel = image.pixel(row, col)?;
                let mut gains = [0.0; 3];
                for (channel, (gain, &value)) in gains.iter_mut().zip(&pixel).enumerate() {
                    if value == 0.0 || !value.is_finite() {
                        return Err(ConversionError::DegenerateGain { channel, value });
                    }
                    *gain = 1.0 / value;
                }
                gains
            }
        };

        if let Some((channel, &value)) = gains.iter().enumerate().find(|(_, g)| !g.is_finite()) {
            return Err(ConversionError::DegenerateGain { channel, value });
        }

        Ok(gains)
    }
}

impl FromStr for WhiteBalanceReference {
    type Err = ConversionError;

    /// Accepts `row,col` or `(row,col)` for a pixel and `[r,g,b]` for gains.
    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let invalid = |reason: &str| {
            ConversionError::InvalidArgument(format!("white reference '{text}': {reason}"))
        };

        if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            let gains = inner
                .split(',')
                .map(|v| v.trim().parse::<f32>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| invalid(&e.to_string()))?;
            return match gains.as_slice() {
                &[r, g, b] => Ok(WhiteBalanceReference::GainTriple { r, g, b }),
                _ => Err(invalid("expected exactly three gains")),
            };
        }

        let inner = text
            .strip_prefix('(')
            .and_then(|t| t.strip_suffix(')'))
            .unwrap_or(text);
        let coords = inner
            .split(',')
            .map(|v| v.trim().parse::<usize>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| invalid(&e.to_string()))?;
        match coords.as_slice() {
            &[row, col] => Ok(WhiteBalanceReference::PixelReference { row, col }),
            _ => Err(invalid("expected a (row,col) pair or a [r,g,b] list")),
        }
    }
}

impl fmt::Display for WhiteBalanceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WhiteBalanceReference::GainTriple { r, g, b } => write!(f, "[{r},{g},{b}]"),
            WhiteBalanceReference::PixelReference { row, col } => write!(f, "({row},{col})"),
        }
    }
}

/// Scales every channel by its gain and clamps the result to [0,1].
#[instrument(skip(image, reference), fields(width = image.width, height = image.height, reference = %reference))]
pub fn white_balance(image: &ColorImage, reference: &WhiteBalanceReference) -> Result<ColorImage> {
    info!("START white_balance");
    let gains = reference.resolve(image)?;
    debug!(r = gains[0], g = gains[1], b = gains[2], "Resolved white balance gains");

    let data = image
        .data
        .chunks_exact(3)
        .flat_map(|pixel| {
            [
                (pixel[0] * gains[0]).clamp(0.0, 1.0),
                (pixel[1] * gains[1]).clamp(0.0, 1.0),
                (pixel[2] * gains[2]).clamp(0.0, 1.0),
            ]
        })
        .collect();

    info!("END white_balance");
    ColorImage::from_vec(image.width, image.height, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> ColorImage {
        let n = width * height * 3;
        let data = (0..n).map(|i| 1.5 * i as f32 / n as f32).collect();
        ColorImage::from_vec(width, height, data).unwrap()
    }

    #[test]
    fn test_unit_gains_leave_image_unchanged() {
        let image = ColorImage::from_vec(2, 2, vec![0.5; 12]).unwrap();
        let reference = WhiteBalanceReference::GainTriple { r: 1.0, g: 1.0, b: 1.0 };
        assert_eq!(white_balance(&image, &reference).unwrap(), image);
    }

    #[test]
    fn test_output_is_clamped_to_unit_range() {
        let image = gradient(4, 4);
        for (r, g, b) in [(2.0, 0.5, 1.0), (-1.0, 3.0, 0.0), (1e6, 1e-6, 1.0)] {
            let reference = WhiteBalanceReference::GainTriple { r, g, b };
            let balanced = white_balance(&image, &reference).unwrap();
            assert!(balanced.data.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn test_pixel_reference_gains_are_reciprocals() {
        let mut image = gradient(4, 4);
        let idx = (2 * 4 + 1) * 3;
        image.data[idx..idx + 3].copy_from_slice(&[0.8, 0.5, 0.25]);

        let reference = WhiteBalanceReference::PixelReference { row: 2, col: 1 };
        let gains = reference.resolve(&image).unwrap();
        for (gain, expected) in gains.iter().zip([1.25, 2.0, 4.0]) {
            assert!((gain - expected).abs() < 1e-5, "{gain} != {expected}");
        }

        let balanced = white_balance(&image, &reference).unwrap();
        let neutral = balanced.pixel(2, 1).unwrap();
        for value in neutral {
            assert!((value - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_black_reference_pixel_is_degenerate() {
        let image = ColorImage::from_vec(2, 2, vec![0.0; 12]).unwrap();
        let reference = WhiteBalanceReference::PixelReference { row: 0, col: 0 };
        assert!(matches!(
            white_balance(&image, &reference),
            Err(ConversionError::DegenerateGain { channel: 0, .. })
        ));
    }

    #[test]
    fn test_partially_black_reference_pixel_is_degenerate() {
        let image = ColorImage::from_vec(1, 1, vec![0.5, 0.5, 0.0]).unwrap();
        let reference = WhiteBalanceReference::PixelReference { row: 0, col: 0 };
        assert!(matches!(
            reference.resolve(&image),
            Err(ConversionError::DegenerateGain { channel: 2, .. })
        ));
    }

    #[test]
    fn test_non_finite_gain_triple_is_degenerate() {
        let image = gradient(2, 2);
        let reference = WhiteBalanceReference::GainTriple { r: 1.0, g: f32::NAN, b: 1.0 };
        assert!(matches!(
            white_balance(&image, &reference),
            Err(ConversionError::DegenerateGain { channel: 1, .. })
        ));
    }

    #[test]
    fn test_reference_outside_image() {
        let image = gradient(4, 2);
        let reference = WhiteBalanceReference::PixelReference { row: 2, col: 0 };
        assert!(matches!(
            white_balance(&image, &reference),
            Err(ConversionError::OutOfBounds { row: 2, col: 0, width: 4, height: 2 })
        ));
    }

    #[test]
    fn test_parse_references() {
        assert_eq!(
            "1200,230".parse::<WhiteBalanceReference>().unwrap(),
            WhiteBalanceReference::PixelReference { row: 1200, col: 230 }
        );
        assert_eq!(
            "(10, 20)".parse::<WhiteBalanceReference>().unwrap(),
            WhiteBalanceReference::PixelReference { row: 10, col: 20 }
        );
        assert_eq!(
            "[1.25,1.0,0.8]".parse::<WhiteBalanceReference>().unwrap(),
            WhiteBalanceReference::GainTriple { r: 1.25, g: 1.0, b: 0.8 }
        );
        for bad in ["[1.0,2.0]", "1,2,3", "(a,b)", ""] {
            assert!(matches!(
                bad.parse::<WhiteBalanceReference>(),
                Err(ConversionError::InvalidArgument(_))
            ), "{bad}");
        }
    }
}
