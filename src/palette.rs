// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-count palette.
//!
//! Colors are packed as 0xAARRGGBB and are always opaque.  The palette
//! walks the hue wheel once every 256 iterations while the brightness
//! climbs quickly toward full, so shallow escapes are dark and the
//! boundary of the set glows.  It is computed once at startup and
//! shared read-only with every worker.

/// Packs an opaque color.
pub const fn make_color(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Unpacks a color into its red, green and blue channels.
pub fn channels(color: u32) -> [u8; 3] {
    [(color >> 16) as u8, (color >> 8) as u8, color as u8]
}

/// The color of points that never escape.
pub const BACKGROUND: u32 = make_color(0, 0, 0);

/// Converts hue (degrees), saturation and value (both percentages) to
/// RGB using the six-sector formula.  Anything out of range comes back
/// black.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    if !(0.0..=360.0).contains(&h) || !(0.0..=100.0).contains(&s) || !(0.0..=100.0).contains(&v)
    {
        return (0, 0, 0);
    }

    let s = s / 100.0;
    let v = v / 100.0;
    let c = s * v;
    let x = (f64::from(c) * (1.0 - ((f64::from(h) / 60.0) % 2.0 - 1.0).abs())) as f32;
    let m = v - c;
    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}

/// Packs an HSV color.
pub fn make_color_hsv(h: f32, s: f32, v: f32) -> u32 {
    let (r, g, b) = hsv_to_rgb(h, s, v);
    make_color(r, g, b)
}

/// An immutable table from escape iteration to color.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<u32>,
}

impl Palette {
    /// Builds a palette with one entry per possible escape iteration,
    /// `0..max_iterations`.
    pub fn new(max_iterations: usize) -> Self {
        let colors = (0..max_iterations)
            .map(|i| {
                let i = i as f64;
                let hue = (i / 256.0) * 360.0;
                let value = 100.0 * (i / (8.0 + i));
                make_color_hsv(((hue as i64) % 360) as f32, 100.0, value as f32)
            })
            .collect();
        Palette { colors }
    }

    /// The number of colors, which is also the escape cap.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True only for a palette with no escape colors at all.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The color for an iteration count.  Counts at or past the end of
    /// the table never escaped and get the background.
    pub fn color(&self, iterations: usize) -> u32 {
        self.colors.get(iterations).cloned().unwrap_or(BACKGROUND)
    }
}
