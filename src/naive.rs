// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A single-threaded renderer.  It draws the whole frame in one pass
//! on the calling thread, with the same shader the pool uses, so its
//! output is the reference the pool has to match pixel for pixel.

use crate::planes::FrameSize;
use crate::shader::{render_rect, Frame, Shader};
use crate::tiles::Rect;
use crate::view::View;

/// Renders frames of one size with one shader.
pub struct NaiveRenderer<S> {
    shader: S,
    size: FrameSize,
}

impl<S: Shader> NaiveRenderer<S> {
    /// Constructor.
    pub fn new(shader: S, size: FrameSize) -> Self {
        NaiveRenderer { shader, size }
    }

    /// Renders one frame into a freshly allocated row-major buffer.
    pub fn render(&self, view: View) -> Vec<u32> {
        let frame = Frame {
            generation: 0,
            size: self.size,
            view,
        };
        let mut buffer = vec![0; self.size.len()];
        render_rect(&self.shader, &frame, &Rect::frame(self.size), &mut buffer);
        buffer
    }
}
