// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Startup configuration.  Everything here is fixed for the life of
//! the render pool: the frame is never resized and the tile grid is
//! never rebalanced.

use std::time::Duration;

use crate::error::{RenderError, Result};
use crate::planes::FrameSize;
use crate::tiles::Grid;

/// The escape cap, which is also the palette length.
pub const PALETTE_MAX: usize = 1000;

/// How long the coordinator waits on reports before checking whether a
/// worker has died.
pub const DEFAULT_STALL_TIMEOUT: Duration = Duration::from_millis(200);

/// Everything needed to build a `RenderContext` and its pool.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    /// Frame dimensions in pixels.
    pub size: FrameSize,
    /// Tile grid; one worker per cell.
    pub grid: Grid,
    /// Iteration cap for the escape kernel.
    pub max_iterations: usize,
    /// Interval between liveness checks while waiting on a frame.
    pub stall_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            size: FrameSize::new(600, 400),
            grid: Grid::default(),
            max_iterations: PALETTE_MAX,
            stall_timeout: DEFAULT_STALL_TIMEOUT,
        }
    }
}

impl Config {
    /// Rejects configurations that cannot describe a drawable frame.
    pub fn validate(&self) -> Result<()> {
        if self.size.is_empty() {
            return Err(RenderError::InvalidConfig(format!(
                "frame size {} has no pixels",
                self.size
            )));
        }
        if self.grid.rows == 0 || self.grid.cols == 0 {
            return Err(RenderError::InvalidConfig(
                "the tile grid needs at least one row and one column".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(RenderError::InvalidConfig(
                "the iteration cap must be at least 1".to_string(),
            ));
        }
        if self.stall_timeout == Duration::from_millis(0) {
            return Err(RenderError::InvalidConfig(
                "the stall timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_window() {
        let config = Config::default();
        assert_eq!(config.size, FrameSize::new(600, 400));
        assert_eq!(config.grid, Grid { rows: 4, cols: 5 });
        assert_eq!(config.max_iterations, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_frames_are_rejected() {
        let config = Config {
            size: FrameSize::new(0, 400),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_grids_are_rejected() {
        let config = Config {
            grid: Grid { rows: 3, cols: 0 },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_iterations_are_rejected() {
        let config = Config {
            max_iterations: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
