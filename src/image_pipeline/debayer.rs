//! Debayering module for converting Bayer pattern sensor data to RGB

pub mod bilinear_debayer;
pub mod kernel;
pub mod mask;
pub mod types;

pub use bilinear_debayer::{demosaic, BilinearDebayer};
pub use kernel::{convolve, BorderMode, Kernel3x3, GREEN_KERNEL, RED_BLUE_KERNEL};
pub use mask::{build_masks, ChannelMask};
pub use types::{Channel, ColorImage};
