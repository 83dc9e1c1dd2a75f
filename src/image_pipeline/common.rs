//! Common utilities module
//!
//! This module contains the error type and the grid types shared across the image pipeline.

pub mod error;
pub mod plane;

pub use error::{ConversionError, Result};
pub use plane::{Plane, SensorArray};
