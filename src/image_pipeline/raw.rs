//! RAW image reading module
//!
//! This module provides format-agnostic RAW image reading and normalization.

mod reader;
mod rawloader_reader;
mod normalization;
pub mod types;

pub use reader::RawImageReader;
pub use rawloader_reader::RawLoaderReader;
pub use normalization::normalize;
pub use types::RawImageData;
