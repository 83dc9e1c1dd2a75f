//! Per-channel RGGB masks tiled over the sensor.

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::plane::{Plane, SensorArray};
use crate::image_pipeline::debayer::types::Channel;

/// Marks which photosites of the sensor sampled one color channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMask {
    pub channel: Channel,
    pub width: usize,
    pub height: usize,
    /// Row-major membership flags
    pub data: Vec<bool>,
}

impl ChannelMask {
    /// Replicates the channel's 2x2 unit cell `height / 2` times down and `width / 2` times across.
    pub fn tile(channel: Channel, width: usize, height: usize) -> Result<Self> {
        if width % 2 != 0 || height % 2 != 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        let unit = channel.unit_pattern();
        let data = (0..height)
            .flat_map(|row| (0..width).map(move |col| unit[row % 2][col % 2]))
            .collect();

        Ok(Self {
            channel,
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn weight(&self, row: usize, col: usize) -> f32 {
        if self.data[row * self.width + col] { 1.0 } else { 0.0 }
    }

    /// Element-wise product of the sensor and this mask.
    pub fn apply(&self, sensor: &SensorArray) -> Result<Plane> {
        if sensor.width != self.width || sensor.height != self.height {
            return Err(ConversionError::InvalidDimensions(sensor.width, sensor.height));
        }

        let data = sensor
            .data
            .iter()
            .zip(&self.data)
            .map(|(&v, &keep)| if keep { v } else { 0.0 })
            .collect();

        Plane::from_vec(self.width, self.height, data)
    }
}

/// Builds the red, green and blue masks for a `width` x `height` sensor.
pub fn build_masks(width: usize, height: usize) -> Result<[ChannelMask; 3]> {
    Ok([
        ChannelMask::tile(Channel::Red, width, height)?,
        ChannelMask::tile(Channel::Green, width, height)?,
        ChannelMask::tile(Channel::Blue, width, height)?,
    ])
}
