//! Single-channel floating point grids.

use crate::image_pipeline::common::error::{ConversionError, Result};

/// A row-major 2D grid of `f32` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Width of the grid in pixels
    pub width: usize,
    /// Height of the grid in pixels
    pub height: usize,
    /// Samples, `height` rows of `width` values each
    pub data: Vec<f32>,
}

/// Normalized sensor readings in [0,1], one sample per photosite.
pub type SensorArray = Plane;

impl Plane {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wraps an existing buffer, rejecting a length that disagrees with the dimensions.
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != width * height {
            return Err(ConversionError::InvalidDimensions(width, height));
        }
        Ok(Self { width, height, data })
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * self.width + col] = value;
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
