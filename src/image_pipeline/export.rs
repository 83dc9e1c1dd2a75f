//! Stage image writing module
//!
//! Encodes intermediate and final pipeline images to PNG, JPEG, BMP or TIFF.

mod writer;
mod standard_image_writer;
mod standard_tiff_writer;
pub mod types;

pub use writer::ImageWriter;
pub use standard_image_writer::StandardImageWriter;
pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{OutputFormat, TiffCompression};
