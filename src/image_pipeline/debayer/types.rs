//! Types for debayering operations

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::plane::Plane;

/// Color channels of an RGGB mosaic, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Position of the channel in an interleaved RGB pixel.
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        }
    }

    /// The 2x2 RGGB unit cell for this channel, row-major.
    pub fn unit_pattern(self) -> [[bool; 2]; 2] {
        match self {
            Channel::Red => [[true, false], [false, false]],
            Channel::Green => [[false, true], [true, false]],
            Channel::Blue => [[false, false], [false, true]],
        }
    }
}

/// RGB image data after debayering, values nominally in [0,1]
#[derive(Debug, Clone, PartialEq)]
pub struct ColorImage {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// RGB pixel data interleaved [R, G, B, R, G, B, ...]
    pub data: Vec<f32>,
}

impl ColorImage {
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != width * height * 3 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }
        Ok(Self { width, height, data })
    }

    /// Interleaves three equally sized planes into one image.
    pub fn from_planes(planes: [&Plane; 3]) -> Result<Self> {
        let [red, green, blue] = planes;
        let (width, height) = (red.width, red.height);
        if [green, blue].iter().any(|p| p.width != width || p.height != height) {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        let data = red
            .data
            .iter()
            .zip(&green.data)
            .zip(&blue.data)
            .flat_map(|((&r, &g), &b)| [r, g, b])
            .collect();

        Ok(Self { width, height, data })
    }

    /// An image where only `channel` carries `plane`, the others are black.
    pub fn from_single_channel(plane: &Plane, channel: Channel) -> Self {
        let mut data = vec![0.0; plane.data.len() * 3];
        for (pixel, &value) in data.chunks_exact_mut(3).zip(&plane.data) {
            pixel[channel.index()] = value;
        }
        Self {
            width: plane.width,
            height: plane.height,
            data,
        }
    }

    pub fn pixel(&self, row: usize, col: usize) -> Result<[f32; 3]> {
        if row >= self.height || col >= self.width {
            return Err(ConversionError::OutOfBounds {
                row,
                col,
                width: self.width,
                height: self.height,
            });
        }
        let idx = (row * self.width + col) * 3;
        Ok([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    pub fn channel(&self, channel: Channel) -> Plane {
        Plane {
            width: self.width,
            height: self.height,
            data: self.data.iter().skip(channel.index()).step_by(3).copied().collect(),
        }
    }
}
