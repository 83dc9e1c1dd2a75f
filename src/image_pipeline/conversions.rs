//! Pipeline conversions module
//!
//! This module contains the orchestration of RAW development: decoding,
//! the pixel stages in order, and writing of the stage images.

mod raw_to_rgb;
mod timing;
pub mod types;

#[cfg(test)]
mod tests;

pub use raw_to_rgb::RawToRgbPipeline;
pub use timing::{PipelineTimings, StepTiming, Timer};
pub use types::{DecodeConfig, DecodeConfigBuilder, DevelopedImage, Stage, StageImage};
