// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Splits the frame into a fixed grid of tiles, one per worker.
//!
//! Row heights and column widths come from integer division.  Whatever
//! the division leaves over belongs to the last row and the last
//! column, whose bottom and right edges are pinned to the frame edge,
//! so every pixel is owned by exactly one tile.

use itertools::iproduct;
use std::fmt;
use std::ops::Range;

use crate::planes::{FrameSize, Pixel};

/// The shape of the tile grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Number of tile rows.
    pub rows: usize,
    /// Number of tile columns.
    pub cols: usize,
}

impl Default for Grid {
    fn default() -> Self {
        Grid { rows: 4, cols: 5 }
    }
}

impl Grid {
    /// The number of tiles, and therefore workers.
    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    /// A grid with exactly `workers` cells, as close to square as the
    /// factors of `workers` allow, with no more rows than columns.
    pub fn fit(workers: usize) -> Self {
        let workers = workers.max(1);
        let rows = (1..=workers)
            .take_while(|r| r * r <= workers)
            .filter(|r| workers % r == 0)
            .last()
            .unwrap_or(1);
        Grid {
            rows,
            cols: workers / rows,
        }
    }
}

/// A half-open rectangle of pixels: `top..bottom` by `left..right`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    /// First row.
    pub top: usize,
    /// First column.
    pub left: usize,
    /// One past the last row.
    pub bottom: usize,
    /// One past the last column.
    pub right: usize,
}

impl Rect {
    /// The rectangle covering a whole frame.
    pub fn frame(size: FrameSize) -> Self {
        Rect {
            top: 0,
            left: 0,
            bottom: size.height,
            right: size.width,
        }
    }

    /// Columns in the rectangle.
    pub fn width(&self) -> usize {
        self.right.saturating_sub(self.left)
    }

    /// Rows in the rectangle.
    pub fn height(&self) -> usize {
        self.bottom.saturating_sub(self.top)
    }

    /// Pixels in the rectangle.
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// The row range.
    pub fn rows(&self) -> Range<usize> {
        self.top..self.bottom
    }

    /// The column range.
    pub fn cols(&self) -> Range<usize> {
        self.left..self.right
    }

    /// Every pixel in the rectangle in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> {
        iproduct!(self.rows(), self.cols()).map(|(row, col)| Pixel(col, row))
    }

    /// Whether the pixel lies inside the rectangle.
    pub fn contains(&self, pixel: Pixel) -> bool {
        self.cols().contains(&pixel.0) && self.rows().contains(&pixel.1)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "columns {} to {}, rows {} to {}",
            self.left, self.right, self.top, self.bottom
        )
    }
}

/// A rectangle and the index of the worker that owns it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    /// The owning worker, which is also the tile's position in the
    /// partition.
    pub owner: usize,
    /// The pixels the worker renders.
    pub bounds: Rect,
}

/// Partitions the frame into `grid.rows * grid.cols` tiles in row-major
/// order.  When the grid has more rows or columns than the frame has
/// pixels, the leading tiles are empty and the last row or column
/// takes everything.
pub fn partition(size: FrameSize, grid: Grid) -> Vec<Tile> {
    if grid.rows == 0 || grid.cols == 0 {
        return vec![];
    }
    let row_height = size.height / grid.rows;
    let col_width = size.width / grid.cols;

    iproduct!(0..grid.rows, 0..grid.cols)
        .enumerate()
        .map(|(owner, (y, x))| {
            let bottom = if y + 1 == grid.rows {
                size.height
            } else {
                (y + 1) * row_height
            };
            let right = if x + 1 == grid.cols {
                size.width
            } else {
                (x + 1) * col_width
            };
            Tile {
                owner,
                bounds: Rect {
                    top: y * row_height,
                    left: x * col_width,
                    bottom,
                    right,
                },
            }
        })
        .collect()
}
