//! Contains the PlaneMapper struct, which describes the relationship
//! between the integral plane of the frame, with an origin at 0,0 in
//! the upper-left corner, and the complex plane as seen through the
//! current view.
use num::Complex;
use std::fmt;

use crate::view::View;

/// The width and height of an integral plane that starts at 0,0.  All
/// values are non-negative integers, so the origin is not stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameSize {
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
}

impl FrameSize {
    /// Constructor.
    pub fn new(width: usize, height: usize) -> Self {
        FrameSize { width, height }
    }

    /// The total number of pixels in the frame.  Used to size buffers.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// True when the frame has no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The linear offset of a pixel in a row-major buffer.
    pub fn offset(&self, pixel: Pixel) -> usize {
        pixel.1 * self.width + pixel.0
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Describes the column, row of a pixel in the frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels in a frame of a given size onto the complex plane for
/// one view.  The frame center sits on the view offset, and the full
/// frame width spans `4 / scale` units of the real axis; pixels are
/// square, so the imaginary axis uses the same step.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// The integral plane.
    pub size: FrameSize,
    /// The view being looked through.
    pub view: View,
}

impl PlaneMapper {
    /// Constructor.
    pub fn new(size: FrameSize, view: View) -> PlaneMapper {
        PlaneMapper { size, view }
    }

    /// Given a pixel on the integral plane, find the complex number it
    /// represents.  The half-frame subtraction is done in integers
    /// before the offset is added, so odd frame sizes place the center
    /// exactly where the reference output expects it.
    pub fn pixel_to_point(&self, pixel: Pixel) -> Complex<f64> {
        let span = self.size.width as f64 * self.view.scale;
        let xpos = (pixel.0 as i64 - (self.size.width / 2) as i64) as f64 + self.view.x_offset;
        let ypos = (pixel.1 as i64 - (self.size.height / 2) as i64) as f64 + self.view.y_offset;
        Complex::new(xpos * 4.0 / span, ypos * 4.0 / span)
    }
}
