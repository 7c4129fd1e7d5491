// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The error type shared by every part of the renderer.
//!
//! Rendering itself is total: the kernel always terminates and the
//! partition is deterministic.  What can go wrong is setup (a bad
//! configuration, an OS refusing to give us a thread), a worker thread
//! dying in the middle of a frame, and writing the picture out.

use failure::Fail;
use std::io;

/// Everything the renderer can report to its caller.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The configuration cannot describe a drawable frame.
    #[fail(display = "invalid configuration: {}", _0)]
    InvalidConfig(String),

    /// The operating system refused to start a worker thread.
    #[fail(display = "could not start worker {}: {}", owner, cause)]
    Spawn {
        /// The tile the worker would have owned.
        owner: usize,
        /// The underlying failure.
        #[fail(cause)]
        cause: io::Error,
    },

    /// A worker thread exited while a frame was still waiting on it.
    #[fail(display = "worker {} stopped before finishing frame {}", owner, generation)]
    WorkerLost {
        /// The tile the lost worker owned.
        owner: usize,
        /// The frame that can no longer complete.
        generation: u64,
    },

    /// Every worker has hung up its report channel.
    #[fail(display = "the render pool has shut down")]
    PoolClosed,

    /// The frame could not be handed to the display.
    #[fail(display = "could not present frame: {}", _0)]
    Present(#[fail(cause)] io::Error),
}

/// Shorthand used across the crate.
pub type Result<T> = std::result::Result<T, RenderError>;
