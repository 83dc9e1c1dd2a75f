//! Image processing pipeline module
//!
//! This module turns a Bayer RAW capture into a viewable RGB image, with
//! separate modules for RAW reading, demosaicing, color correction, image
//! writing, and the orchestration of the stages.

pub mod raw;
pub mod debayer;
pub mod color;
pub mod export;
pub mod conversions;
pub mod common;

pub use common::{
    ConversionError,
    Plane,
    Result,
    SensorArray,
};

pub use raw::{
    normalize,
    RawImageData,
    RawImageReader,
    RawLoaderReader,
};

pub use debayer::{
    build_masks,
    demosaic,
    BilinearDebayer,
    BorderMode,
    Channel,
    ChannelMask,
    ColorImage,
};

pub use color::{
    gamma_correct,
    white_balance,
    Gamma,
    WhiteBalanceReference,
};

pub use export::{
    ImageWriter,
    OutputFormat,
    StandardImageWriter,
    StandardTiffWriter,
    TiffCompression,
};

pub use conversions::{
    DecodeConfig,
    DecodeConfigBuilder,
    DevelopedImage,
    PipelineTimings,
    RawToRgbPipeline,
    Stage,
};
