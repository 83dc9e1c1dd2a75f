use tracing::{debug, info, instrument};

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::common::plane::{Plane, SensorArray};
use crate::image_pipeline::debayer::kernel::{convolve, BorderMode, GREEN_KERNEL, RED_BLUE_KERNEL};
use crate::image_pipeline::debayer::mask::build_masks;
use crate::image_pipeline::debayer::types::{Channel, ColorImage};

/// Bilinear RGGB demosaicing by masked convolution.
///
/// Each channel keeps only the photosites that sampled it, then a fixed 3x3
/// kernel spreads those samples into the gaps. No clamping is performed, so
/// values next to the image edge may leave [0,1] depending on the border mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct BilinearDebayer {
    border: BorderMode,
}

impl BilinearDebayer {
    pub fn new(border: BorderMode) -> Self {
        Self { border }
    }

    pub fn border(&self) -> BorderMode {
        self.border
    }

    /// Sensor samples split by owning channel, in red, green, blue order.
    pub fn masked_channels(&self, sensor: &SensorArray) -> Result<[Plane; 3]> {
        let [red, green, blue] = build_masks(sensor.width, sensor.height)?;
        Ok([red.apply(sensor)?, green.apply(sensor)?, blue.apply(sensor)?])
    }

    /// Fills the gaps of each masked channel and stacks the result.
    pub fn interpolate(&self, masked: &[Plane; 3]) -> Result<ColorImage> {
        let planes: Vec<Plane> = Channel::ALL
            .iter()
            .zip(masked)
            .map(|(&channel, plane)| {
                let kernel = match channel {
                    Channel::Green => &GREEN_KERNEL,
                    Channel::Red | Channel::Blue => &RED_BLUE_KERNEL,
                };
                debug!(channel = channel.name(), "Interpolating channel");
                convolve(plane, kernel, self.border)
            })
            .collect();

        ColorImage::from_planes([&planes[0], &planes[1], &planes[2]])
    }

    #[instrument(skip(self, sensor), fields(width = sensor.width, height = sensor.height, border = %self.border))]
    pub fn process(&self, sensor: &SensorArray) -> Result<ColorImage> {
        info!("START demosaicing");
        let masked = self.masked_channels(sensor)?;
        let image = self.interpolate(&masked)?;
        info!("END demosaicing");
        Ok(image)
    }
}

/// Demosaics a normalized RGGB sensor array into a full RGB image.
pub fn demosaic(sensor: &SensorArray, border: BorderMode) -> Result<ColorImage> {
    BilinearDebayer::new(border).process(sensor)
}
