//! Pipeline configuration and stage bookkeeping types

use crate::image_pipeline::color::{Gamma, WhiteBalanceReference};
use crate::image_pipeline::common::plane::Plane;
use crate::image_pipeline::debayer::{BorderMode, Channel, ColorImage};
use crate::image_pipeline::export::TiffCompression;

/// Configuration for a RAW development run
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// Source of the white balance gains
    pub white_reference: WhiteBalanceReference,
    /// Exponent of the final power-law transform
    pub gamma: Gamma,
    /// Extension of every written stage image, e.g. ".png"
    pub extension: String,
    /// Compression used when `extension` selects TIFF
    pub tiff_compression: TiffCompression,
    /// Edge policy of the demosaic convolution
    pub border: BorderMode,
    /// Whether to reject empty or odd-sized sensors before processing
    pub validate_dimensions: bool,
    /// Whether to write stages 01-06 in addition to the final image
    pub write_intermediates: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            white_reference: WhiteBalanceReference::default(),
            gamma: Gamma::default(),
            extension: ".png".to_string(),
            tiff_compression: TiffCompression::None,
            border: BorderMode::Reflect,
            validate_dimensions: true,
            write_intermediates: true,
        }
    }
}

impl DecodeConfig {
    pub fn builder() -> DecodeConfigBuilder {
        DecodeConfigBuilder::default()
    }
}

/// Builder for DecodeConfig
#[derive(Default)]
pub struct DecodeConfigBuilder {
    white_reference: Option<WhiteBalanceReference>,
    gamma: Option<Gamma>,
    extension: Option<String>,
    tiff_compression: Option<TiffCompression>,
    border: Option<BorderMode>,
    validate_dimensions: Option<bool>,
    write_intermediates: Option<bool>,
}

impl DecodeConfigBuilder {
    pub fn white_reference(mut self, reference: WhiteBalanceReference) -> Self {
        self.white_reference = Some(reference);
        self
    }

    pub fn gamma(mut self, gamma: Gamma) -> Self {
        self.gamma = Some(gamma);
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn tiff_compression(mut self, compression: TiffCompression) -> Self {
        self.tiff_compression = Some(compression);
        self
    }

    pub fn border(mut self, border: BorderMode) -> Self {
        self.border = Some(border);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn write_intermediates(mut self, enable: bool) -> Self {
        self.write_intermediates = Some(enable);
        self
    }

    pub fn build(self) -> DecodeConfig {
        let default = DecodeConfig::default();
        DecodeConfig {
            white_reference: self.white_reference.unwrap_or(default.white_reference),
            gamma: self.gamma.unwrap_or(default.gamma),
            extension: self.extension.unwrap_or(default.extension),
            tiff_compression: self.tiff_compression.unwrap_or(default.tiff_compression),
            border: self.border.unwrap_or(default.border),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            write_intermediates: self.write_intermediates.unwrap_or(default.write_intermediates),
        }
    }
}

/// Pipeline checkpoints that produce an inspectable image, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SceneRaw,
    Masked(Channel),
    Demosaiced,
    WhiteBalanced,
    GammaCorrected,
}

impl Stage {
    /// File name of the stage image, without extension.
    pub fn file_stem(self) -> &'static str {
        match self {
            Stage::SceneRaw => "01_scene_raw",
            Stage::Masked(Channel::Red) => "02_red",
            Stage::Masked(Channel::Green) => "03_green",
            Stage::Masked(Channel::Blue) => "04_blue",
            Stage::Demosaiced => "05_demosaiced",
            Stage::WhiteBalanced => "06_wb",
            Stage::GammaCorrected => "07_gamma",
        }
    }
}

/// Image handed out at a stage checkpoint
#[derive(Debug, Clone, Copy)]
pub enum StageImage<'a> {
    Gray(&'a Plane),
    /// Masked samples of one channel, shown in that channel's color
    Channel(&'a Plane, Channel),
    Rgb(&'a ColorImage),
}

/// Results of the three color stages
#[derive(Debug, Clone)]
pub struct DevelopedImage {
    pub demosaiced: ColorImage,
    pub white_balanced: ColorImage,
    pub gamma_corrected: ColorImage,
}
