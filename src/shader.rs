// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! What a worker computes for each pixel of its tile.

use std::sync::Arc;

use crate::kernel::pixel_iterations;
use crate::palette::Palette;
use crate::planes::{FrameSize, Pixel};
use crate::tiles::Rect;
use crate::view::View;

/// Everything a worker needs to know about the frame it is rendering.
/// A copy travels with every render job, so workers never look at the
/// coordinator's mutable state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    /// Monotonic frame counter; the first rendered frame is 1.
    pub generation: u64,
    /// The whole frame, not just the tile.
    pub size: FrameSize,
    /// The view being rendered.
    pub view: View,
}

/// Computes one pixel of a frame.  Shared by reference across all
/// workers, so it must be immutable once the pool starts.
pub trait Shader: Send + Sync + 'static {
    /// The packed color for `pixel`.
    fn shade(&self, frame: &Frame, pixel: Pixel) -> u32;
}

/// Colors each pixel by its escape count.
#[derive(Clone, Debug)]
pub struct MandelbrotShader {
    palette: Arc<Palette>,
}

impl MandelbrotShader {
    /// The iteration cap is the palette length.
    pub fn new(palette: Arc<Palette>) -> Self {
        MandelbrotShader { palette }
    }
}

impl Shader for MandelbrotShader {
    fn shade(&self, frame: &Frame, pixel: Pixel) -> u32 {
        let iterations = pixel_iterations(pixel, frame.size, frame.view, self.palette.len());
        self.palette.color(iterations)
    }
}

/// Fills `pixels`, a row-major buffer exactly the size of `bounds`.
pub fn render_rect<S: Shader + ?Sized>(shader: &S, frame: &Frame, bounds: &Rect, pixels: &mut [u32]) {
    debug_assert_eq!(pixels.len(), bounds.area());
    for (slot, pixel) in pixels.iter_mut().zip(bounds.pixels()) {
        *slot = shader.shade(frame, pixel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::escape_iterations;
    use crate::palette::BACKGROUND;
    use crate::planes::PlaneMapper;

    fn frame(width: usize, height: usize) -> Frame {
        Frame {
            generation: 1,
            size: FrameSize::new(width, height),
            view: View::default(),
        }
    }

    #[test]
    fn center_is_background() {
        let shader = MandelbrotShader::new(Arc::new(Palette::new(1000)));
        assert_eq!(shader.shade(&frame(600, 400), Pixel(300, 200)), BACKGROUND);
    }

    #[test]
    fn escaping_pixels_use_the_palette() {
        let palette = Arc::new(Palette::new(1000));
        let shader = MandelbrotShader::new(palette.clone());
        // The left edge of the default view is at -2, the right at +2.
        let right_edge = shader.shade(&frame(600, 400), Pixel(599, 0));
        let point = PlaneMapper::new(FrameSize::new(600, 400), View::default())
            .pixel_to_point(Pixel(599, 0));
        assert_eq!(right_edge, palette.color(escape_iterations(point, 1000)));
        assert_ne!(right_edge, BACKGROUND);
    }

    struct Coordinates;

    impl Shader for Coordinates {
        fn shade(&self, _frame: &Frame, pixel: Pixel) -> u32 {
            (pixel.1 * 1000 + pixel.0) as u32
        }
    }

    #[test]
    fn rect_is_filled_row_major() {
        let bounds = Rect {
            top: 2,
            left: 1,
            bottom: 4,
            right: 4,
        };
        let mut pixels = vec![0; bounds.area()];
        render_rect(&Coordinates, &frame(10, 10), &bounds, &mut pixels);
        assert_eq!(pixels, vec![2001, 2002, 2003, 3001, 3002, 3003]);
    }
}
