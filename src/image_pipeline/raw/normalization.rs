//! Rescaling of raw sensor counts into the [0,1] working range.

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::plane::SensorArray;
use crate::image_pipeline::raw::types::RawImageData;

/// Maps the visible samples linearly so the darkest becomes 0 and the brightest 1.
pub fn normalize(raw: &RawImageData) -> Result<SensorArray> {
    if raw.data.is_empty() || raw.data.len() != raw.width * raw.height {
        return Err(ConversionError::InvalidDimensions(raw.width, raw.height));
    }

    let (min, max) = raw
        .data
        .iter()
        .fold((u16::MAX, u16::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if min == max {
        return Err(ConversionError::EmptyDynamicRange(min));
    }

    debug!(min, max, "Normalizing sensor data");

    let offset = min as f32;
    let range = (max - min) as f32;
    let data = raw.data.iter().map(|&v| (v as f32 - offset) / range).collect();

    SensorArray::from_vec(raw.width, raw.height, data)
}
