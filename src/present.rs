// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Handing finished frames to something that shows them.

use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{RenderError, Result};
use crate::palette::channels;
use crate::planes::{FrameSize, Pixel};

/// A read-only view of a completed frame buffer.
#[derive(Copy, Clone, Debug)]
pub struct FrameSnapshot<'a> {
    /// Row-major 0xAARRGGBB pixels.
    pub pixels: &'a [u32],
    /// Frame dimensions.
    pub size: FrameSize,
    /// The generation the pixels belong to; 0 if nothing has been
    /// rendered yet.
    pub generation: u64,
}

impl<'a> FrameSnapshot<'a> {
    /// The color at a pixel.
    pub fn pixel(&self, pixel: Pixel) -> u32 {
        self.pixels[self.size.offset(pixel)]
    }

    /// Packed 8-bit RGB triples, alpha dropped.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixels.len() * 3);
        for &color in self.pixels {
            rgb.extend_from_slice(&channels(color));
        }
        rgb
    }
}

/// The display side of the main loop.  Called once per loop iteration
/// whether or not the frame changed.
pub trait Presenter {
    /// Shows the frame.
    fn present(&mut self, frame: &FrameSnapshot) -> Result<()>;
}

/// Writes each new frame to a binary PPM file, overwriting the last
/// one.  Re-presenting a generation already on disk does nothing.
#[derive(Debug)]
pub struct PnmPresenter {
    path: PathBuf,
    last: Option<u64>,
    writes: usize,
}

impl PnmPresenter {
    /// Frames go to `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        PnmPresenter {
            path: path.as_ref().to_path_buf(),
            last: None,
            writes: 0,
        }
    }

    /// How many times the file has actually been written.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

fn write_image(path: &Path, pixels: &[u8], size: FrameSize) -> Result<()> {
    let output = File::create(path).map_err(RenderError::Present)?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
    encoder
        .encode(pixels, size.width as u32, size.height as u32, ColorType::RGB(8))
        .map_err(RenderError::Present)
}

impl Presenter for PnmPresenter {
    fn present(&mut self, frame: &FrameSnapshot) -> Result<()> {
        if self.last == Some(frame.generation) {
            return Ok(());
        }
        write_image(&self.path, &frame.to_rgb(), frame.size)?;
        debug!(
            "Wrote frame {} to {}",
            frame.generation,
            self.path.display()
        );
        self.last = Some(frame.generation);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::make_color;
    use std::fs;

    #[test]
    fn rgb_drops_alpha() {
        let pixels = [make_color(1, 2, 3), make_color(4, 5, 6)];
        let snapshot = FrameSnapshot {
            pixels: &pixels,
            size: FrameSize::new(2, 1),
            generation: 1,
        };
        assert_eq!(snapshot.to_rgb(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(snapshot.pixel(Pixel(1, 0)), make_color(4, 5, 6));
    }

    #[test]
    fn writes_once_per_generation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.ppm");
        let pixels = vec![make_color(255, 0, 0); 6];
        let mut presenter = PnmPresenter::new(&path);
        let snapshot = FrameSnapshot {
            pixels: &pixels,
            size: FrameSize::new(3, 2),
            generation: 1,
        };

        presenter.present(&snapshot).unwrap();
        presenter.present(&snapshot).unwrap();
        assert_eq!(presenter.writes(), 1);

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P6"));
        assert_eq!(&bytes[bytes.len() - 3..], &[255, 0, 0]);

        presenter
            .present(&FrameSnapshot {
                generation: 2,
                ..snapshot
            })
            .unwrap();
        assert_eq!(presenter.writes(), 2);
    }

    #[test]
    fn unwritable_paths_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut presenter = PnmPresenter::new(dir.path().join("missing").join("frame.ppm"));
        let pixels = [0u32; 1];
        let snapshot = FrameSnapshot {
            pixels: &pixels,
            size: FrameSize::new(1, 1),
            generation: 1,
        };
        match presenter.present(&snapshot) {
            Err(RenderError::Present(_)) => {}
            other => panic!("expected a present error, got {:?}", other),
        }
    }
}
