// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The write-once state built at startup: frame size, tile
//! assignment and palette.  None of it changes afterward, so workers
//! share it without locks.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::palette::Palette;
use crate::planes::FrameSize;
use crate::shader::MandelbrotShader;
use crate::tiles::{partition, Grid, Tile};

/// Owned render setup, handed to every component that needs it.
#[derive(Clone, Debug)]
pub struct RenderContext {
    size: FrameSize,
    grid: Grid,
    tiles: Vec<Tile>,
    palette: Arc<Palette>,
    stall_timeout: Duration,
}

impl RenderContext {
    /// Validates the configuration, partitions the frame and builds the
    /// palette.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(RenderContext {
            size: config.size,
            grid: config.grid,
            tiles: partition(config.size, config.grid),
            palette: Arc::new(Palette::new(config.max_iterations)),
            stall_timeout: config.stall_timeout,
        })
    }

    /// The frame dimensions.
    pub fn size(&self) -> FrameSize {
        self.size
    }

    /// The tile grid.
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// One tile per worker, in owner order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// The shared palette.
    pub fn palette(&self) -> &Arc<Palette> {
        &self.palette
    }

    /// How long to wait on reports between liveness checks.
    pub fn stall_timeout(&self) -> Duration {
        self.stall_timeout
    }

    /// The escape-time shader over this context's palette.
    pub fn shader(&self) -> MandelbrotShader {
        MandelbrotShader::new(Arc::clone(&self.palette))
    }
}
