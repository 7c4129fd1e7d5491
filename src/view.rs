// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The view onto the complex plane, and the dirty flag that says the
//! frame on screen no longer matches it.
//!
//! Only the coordinating thread ever touches a `ViewState`.  Workers
//! receive a copy of the `View` inside each render job, so there is
//! nothing to lock: by the time the coordinator can mutate the state
//! again it has already collected every report for the last frame.

use std::fmt;

/// A snapshot of scale and offset.  Offsets are in pixels at the
/// current scale, measured from the frame center.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct View {
    /// Magnification; always greater than zero.
    pub scale: f64,
    /// Horizontal offset of the frame center.
    pub x_offset: f64,
    /// Vertical offset of the frame center.
    pub y_offset: f64,
}

impl Default for View {
    fn default() -> Self {
        View {
            scale: 1.0,
            x_offset: 0.0,
            y_offset: 0.0,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "scale: {} x: {} y: {}",
            self.scale, self.x_offset, self.y_offset
        )
    }
}

/// The mutable view plus its dirty flag.  A fresh state starts dirty
/// so that the first frame is always rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    view: View,
    dirty: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(View::default())
    }
}

impl ViewState {
    /// Starts from the given view, marked dirty.
    pub fn new(view: View) -> Self {
        ViewState { view, dirty: true }
    }

    /// The current view, by value.
    pub fn view(&self) -> View {
        self.view
    }

    /// Whether the frame must be recomputed before it is presented.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Forces the next frame to be recomputed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Called by the pool once every tile of the frame has reported.
    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Moves the view center by the given deltas.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.view.x_offset += dx;
        self.view.y_offset += dy;
        self.dirty = true;
    }

    /// Multiplies the scale.  A factor that would leave the scale
    /// non-positive or non-finite is ignored.
    pub fn zoom(&mut self, factor: f64) {
        let scale = self.view.scale * factor;
        if !(factor > 0.0) || !scale.is_finite() || scale <= 0.0 {
            warn!("Ignoring zoom factor {} at scale {}", factor, self.view.scale);
            return;
        }
        self.view.scale = scale;
        self.dirty = true;
    }
}
