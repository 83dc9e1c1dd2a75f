use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::common::plane::Plane;
use crate::image_pipeline::debayer::types::ColorImage;

pub trait ImageWriter {
    /// File extension (with leading dot) matching what this writer produces.
    fn extension(&self) -> &str;
    fn write_gray(&self, image: &Plane, output: &mut dyn Write) -> Result<()>;
    fn write_rgb(&self, image: &ColorImage, output: &mut dyn Write) -> Result<()>;
}
