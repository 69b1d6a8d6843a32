//! Text on top of pixels.
//!
//! There are two independent ways to put text on screen:
//!
//! *   [`TextOverlay`]: one terminal character per cell, drawn by the compositor on top of the
//!     pixel pair of that cell. Cheap, monospace, no font needed.
//! *   [`Font::rasterize`]: anti-aliased glyph shapes rendered into an RGBA bitmap with
//!     `ab_glyph`, which is then turned into colored pixels like any other image.

use crate::error::Result;
use ab_glyph::{Font as _, FontVec, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Sparse layer of single characters keyed by pixel coordinate.
///
/// The compositor looks characters up at `(column, pixel_row)` for the *upper* pixel row of each
/// character cell, so only characters on even rows are visible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextOverlay {
    chars: HashMap<(i64, i64), char>,
}

impl TextOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `text` one character per consecutive column, starting at `pos`.
    pub fn put_str(&mut self, (x, y): (i64, i64), text: &str) {
        for (offset, c) in (0..).zip(text.chars()) {
            self.chars.insert((x + offset, y), c);
        }
    }

    pub fn get(&self, pos: (i64, i64)) -> Option<char> {
        self.chars.get(&pos).copied()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// A scalable font used by the pixel text path.
pub struct Font {
    inner: FontVec,
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("glyphs", &self.inner.glyph_count())
            .finish()
    }
}

impl Font {
    /// Loads a TrueType/OpenType font from raw file contents.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Ok(Self {
            inner: FontVec::try_from_vec(data)?,
        })
    }

    /// Loads a TrueType/OpenType font file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        log::debug!("loaded font {} ({} bytes)", path.as_ref().display(), data.len());
        Self::from_bytes(data)
    }

    /// Scale at which one em is `size` pixels tall.
    fn scale(&self, size: u32) -> PxScale {
        let height = self.inner.height_unscaled();
        let units_per_em = self.inner.units_per_em().unwrap_or(height);
        PxScale::from(size as f32 * height / units_per_em)
    }

    /// The advance width of `text` in pixels at em size `size`.
    pub fn text_width(&self, text: &str, size: u32) -> u32 {
        let scaled = self.inner.as_scaled(self.scale(size));
        let width: f32 = text
            .chars()
            .map(|c| scaled.h_advance(scaled.glyph_id(c)))
            .sum();
        width.max(0.0) as u32
    }

    /// Renders `text` into a transparent bitmap `text_width x size` pixels large.
    ///
    /// Glyph coverage becomes the alpha channel; the color channels are `color` everywhere the
    /// glyph touches.
    pub fn rasterize(&self, text: &str, color: [u8; 3], size: u32) -> RgbaImage {
        let width = self.text_width(text, size);
        let mut bitmap = RgbaImage::from_pixel(width, size, Rgba([255, 255, 255, 0]));
        let scale = self.scale(size);
        let scaled = self.inner.as_scaled(scale);
        let mut caret = point(0.0, scaled.ascent());

        for c in text.chars() {
            let glyph_id = scaled.glyph_id(c);
            let glyph = glyph_id.with_scale_and_position(scale, caret);
            caret.x += scaled.h_advance(glyph_id);
            let Some(outlined) = self.inner.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + gx as i64;
                let py = bounds.min.y as i64 + gy as i64;
                if px < 0 || py < 0 || px >= width as i64 || py >= size as i64 {
                    return;
                }
                let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                let target = bitmap.get_pixel_mut(px as u32, py as u32);
                // overlapping glyphs keep the strongest coverage
                if alpha > target.0[3] {
                    *target = Rgba([color[0], color[1], color[2], alpha]);
                }
            });
        }
        bitmap
    }
}
