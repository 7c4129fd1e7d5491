// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel.
//!
//! Iterates `z <- z^2 + c` from zero and counts the steps until
//! `|z|^2 > 4` or the cap is reached.  The squares of the real and
//! imaginary parts are computed once per step and reused for both the
//! update and the escape test; changing that changes the rounding, and
//! with it the counts near the boundary of the set.

use num::Complex;

use crate::planes::{FrameSize, Pixel, PlaneMapper};
use crate::view::View;

/// Returns the number of iterations before `c` escapes, or
/// `max_iterations` if it never does.
#[inline]
pub fn escape_iterations(c: Complex<f64>, max_iterations: usize) -> usize {
    let (mut x, mut y) = (0.0_f64, 0.0_f64);
    let (mut x2, mut y2) = (0.0_f64, 0.0_f64);
    let mut iteration = 0;
    while x2 + y2 <= 4.0 && iteration < max_iterations {
        y = 2.0 * x * y + c.im;
        x = x2 - y2 + c.re;
        x2 = x * x;
        y2 = y * y;
        iteration += 1;
    }
    iteration
}

/// The kernel for one pixel of a frame seen through a view.
pub fn pixel_iterations(pixel: Pixel, size: FrameSize, view: View, max_iterations: usize) -> usize {
    escape_iterations(
        PlaneMapper::new(size, view).pixel_to_point(pixel),
        max_iterations,
    )
}
