#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandeltile: an interactive Mandelbrot explorer
//!
//! The Mandelbrot set is drawn by taking the point on the complex plane
//! under each pixel, repeatedly squaring it and adding the original
//! point back in, and counting how many steps it takes before the
//! result runs off toward infinity.  That count picks a color out of a
//! precomputed palette.  Points that never escape are painted with the
//! background color.
//!
//! Every time the view is panned or zoomed the whole frame is
//! recomputed.  The work is split into a fixed grid of tiles, and each
//! tile belongs to exactly one long-lived worker thread for the life of
//! the program.  The coordinating thread hands every worker a job
//! tagged with a frame generation, then waits until it has collected
//! exactly one report per worker for that generation before the frame
//! is presented.  Changing the view and rendering are strictly
//! alternating phases; the borrow checker sees to it, since rendering
//! takes the view state by mutable reference.

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;

pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod explorer;
pub mod kernel;
pub mod naive;
pub mod palette;
pub mod planes;
pub mod pool;
pub mod present;
pub mod shader;
pub mod tiles;
pub mod view;

pub use config::Config;
pub use context::RenderContext;
pub use error::{RenderError, Result};
pub use events::{Command, EventSource, InputEvent, ScriptedEvents};
pub use explorer::Explorer;
pub use naive::NaiveRenderer;
pub use palette::Palette;
pub use planes::{FrameSize, Pixel, PlaneMapper};
pub use pool::{FrameOutcome, RenderPool};
pub use present::{FrameSnapshot, PnmPresenter, Presenter};
pub use shader::{Frame, MandelbrotShader, Shader};
pub use tiles::{Grid, Rect, Tile};
pub use view::{View, ViewState};
