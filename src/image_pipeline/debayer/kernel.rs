//! 3x3 convolution used to fill in missing mosaic samples.

use std::fmt;
use std::str::FromStr;

use crate::image_pipeline::common::error::ConversionError;
use crate::image_pipeline::common::plane::Plane;

/// How samples beyond the image edge are synthesized during convolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// Half-sample symmetric extension: `d c b a | a b c d | d c b a`
    #[default]
    Reflect,
    /// Everything outside the image is zero
    Zero,
}

impl BorderMode {
    #[inline]
    fn sample(self, plane: &Plane, row: isize, col: isize) -> f32 {
        match self {
            BorderMode::Reflect => {
                let r = reflect_index(row, plane.height);
                let c = reflect_index(col, plane.width);
                plane.get(r, c)
            }
            BorderMode::Zero => {
                if row < 0 || col < 0 || row as usize >= plane.height || col as usize >= plane.width {
                    0.0
                } else {
                    plane.get(row as usize, col as usize)
                }
            }
        }
    }
}

fn reflect_index(i: isize, len: usize) -> usize {
    let period = 2 * len as isize;
    let m = i.rem_euclid(period);
    if m >= len as isize {
        (period - 1 - m) as usize
    } else {
        m as usize
    }
}

impl FromStr for BorderMode {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reflect" => Ok(BorderMode::Reflect),
            "zero" | "constant" => Ok(BorderMode::Zero),
            other => Err(ConversionError::InvalidArgument(format!(
                "unknown border mode '{other}', expected 'reflect' or 'zero'"
            ))),
        }
    }
}

impl fmt::Display for BorderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BorderMode::Reflect => write!(f, "reflect"),
            BorderMode::Zero => write!(f, "zero"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel3x3(pub [[f32; 3]; 3]);

/// `[[1,2,1],[2,4,2],[1,2,1]] / 4`, for channels sampled once per 2x2 cell.
pub const RED_BLUE_KERNEL: Kernel3x3 = Kernel3x3([
    [0.25, 0.5, 0.25],
    [0.5, 1.0, 0.5],
    [0.25, 0.5, 0.25],
]);

/// `[[0,1,0],[1,4,1],[0,1,0]] / 4`, for the doubly sampled green channel.
pub const GREEN_KERNEL: Kernel3x3 = Kernel3x3([
    [0.0, 0.25, 0.0],
    [0.25, 1.0, 0.25],
    [0.0, 0.25, 0.0],
]);

/// Same-size convolution of `plane` with `kernel`.
pub fn convolve(plane: &Plane, kernel: &Kernel3x3, border: BorderMode) -> Plane {
    let mut out = Plane::zeros(plane.width, plane.height);

    for row in 0..plane.height {
        for col in 0..plane.width {
            let mut acc = 0.0;
            for (ki, weights) in kernel.0.iter().enumerate() {
                for (kj, &w) in weights.iter().enumerate() {
                    if w == 0.0 {
                        continue;
                    }
                    // Flipped taps: out[r, c] = sum k[i, j] * in[r + 1 - i, c + 1 - j]
                    let r = row as isize + 1 - ki as isize;
                    let c = col as isize + 1 - kj as isize;
                    acc += w * border.sample(plane, r, c);
                }
            }
            out.set(row, col, acc);
        }
    }

    out
}
