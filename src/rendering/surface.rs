//! Sparse pixel surfaces.
//!
//! A [`Surface`] maps integer coordinates to RGB colors. Only painted coordinates are stored:
//! a missing entry means *transparent*, not black. The same type is used for standalone images
//! (sprites, decoded files, rasterized text) and as the committed frame of a
//! [`Display`](crate::rendering::display::Display).
//!
//! Note on bounds: [`Surface::fill`] and the mask used by [`Surface::blit`] both treat
//! `[0, width] x [0, height]` as *inclusive*, so they cover one column and one row more than the
//! nominal size. Existing drawings depend on this, keep it.

use crate::error::Result;
use crate::rendering::color::Color;
use crate::rendering::text::Font;
use crate::util::region::{Anchor, Region};
use image::RgbaImage;
use std::collections::HashMap;
use std::path::Path;

/// Something pixels can be written to and read from.
///
/// Implemented by [`Surface`] and [`Display`](crate::rendering::display::Display), so that
/// drawing primitives and transforms work on either.
pub trait Canvas {
    /// Writes one pixel. [`Color::Transparent`] removes the pixel.
    fn set_color(&mut self, pos: (i64, i64), color: Color);

    /// Reads one pixel, [`Color::Transparent`] if unset.
    fn color_at(&self, pos: (i64, i64)) -> Color;

    /// Nominal width in pixels.
    fn width(&self) -> usize;

    /// Nominal height in pixels.
    fn height(&self) -> usize;
}

/// A sparse, exclusively owned pixel buffer.
///
/// # Example
///
/// ```rust
/// use pixterm::rendering::color::Color;
/// use pixterm::rendering::surface::Surface;
///
/// let mut sprite = Surface::new(4, 4);
/// sprite.put_pixel((1, 1), [255, 0, 0]);
///
/// let mut frame = Surface::new(80, 48);
/// frame.fill([0, 0, 64]);
/// frame.blit(&sprite, (10, 10));
/// assert_eq!(frame.get_pixel((11, 11)), Color::Rgb([255, 0, 0]));
/// // unset sprite pixels leave the background alone
/// assert_eq!(frame.get_pixel((10, 10)), Color::Rgb([0, 0, 64]));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Surface {
    width: usize,
    height: usize,
    pixels: HashMap<(i64, i64), [u8; 3]>,
}

impl Surface {
    /// Creates an empty (fully transparent) surface. No storage is allocated up front.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: HashMap::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Changes the nominal size. Stored pixels are kept, including those now out of range.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Number of painted pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Iterates over every painted pixel, in no particular order.
    pub fn pixels(&self) -> impl Iterator<Item = ((i64, i64), [u8; 3])> + '_ {
        self.pixels.iter().map(|(pos, rgb)| (*pos, *rgb))
    }

    /// Fills the surface.
    ///
    /// A transparent color removes every pixel, including out-of-range ones. A solid color
    /// paints every coordinate of `[0, width] x [0, height]`, bounds inclusive.
    pub fn fill(&mut self, color: impl Into<Color>) {
        match color.into() {
            Color::Transparent => self.pixels.clear(),
            Color::Rgb(rgb) => {
                self.pixels.reserve((self.width + 1) * (self.height + 1));
                for x in 0..=self.width as i64 {
                    for y in 0..=self.height as i64 {
                        self.pixels.insert((x, y), rgb);
                    }
                }
            }
        }
    }

    /// Writes one pixel. Transparent deletes the pixel if present.
    ///
    /// There is no bounds check: out-of-range pixels are stored but never rendered.
    pub fn put_pixel(&mut self, pos: (i64, i64), color: impl Into<Color>) {
        match color.into() {
            Color::Transparent => {
                self.pixels.remove(&pos);
            }
            Color::Rgb(rgb) => {
                self.pixels.insert(pos, rgb);
            }
        }
    }

    /// Reads one pixel, [`Color::Transparent`] if it was never painted.
    pub fn get_pixel(&self, pos: (i64, i64)) -> Color {
        self.pixels.get(&pos).copied().into()
    }

    /// Copies the painted pixels of `source` onto `self`, translated by `dest`.
    ///
    /// Only source pixels with `0 <= x <= source.width` and `0 <= y <= source.height` are
    /// copied. Unset source pixels leave the destination untouched: this is a masked overwrite,
    /// colors are never blended.
    pub fn blit(&mut self, source: &Surface, (dx, dy): (i64, i64)) {
        let (max_x, max_y) = (source.width as i64, source.height as i64);
        for (&(x, y), &rgb) in &source.pixels {
            if (0..=max_x).contains(&x) && (0..=max_y).contains(&y) {
                self.pixels.insert((x + dx, y + dy), rgb);
            }
        }
    }

    /// Returns a new surface of `region`'s size holding the part of `self` inside `region`.
    pub fn cropped(&self, region: Region) -> Surface {
        let mut cropped = Surface::new(region.width.max(0) as usize, region.height.max(0) as usize);
        cropped.blit(self, (-region.x, -region.y));
        // the blit mask only looks at the source, trim to the crop's own inclusive bounds
        let (max_x, max_y) = (cropped.width as i64, cropped.height as i64);
        cropped
            .pixels
            .retain(|&(x, y), _| (0..=max_x).contains(&x) && (0..=max_y).contains(&y));
        cropped
    }

    /// Converts a decoded RGBA image. Pixels with zero alpha stay unset.
    pub fn from_rgba_image(image: &RgbaImage) -> Surface {
        let mut surface = Surface::new(image.width() as usize, image.height() as usize);
        for (x, y, pixel) in image.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            if a > 0 {
                surface.put_pixel((x as i64, y as i64), [r, g, b]);
            }
        }
        surface
    }

    /// Decodes an image file with the `image` crate.
    pub fn open(path: impl AsRef<Path>) -> Result<Surface> {
        let image = image::open(path.as_ref())?.to_rgba8();
        log::debug!(
            "decoded {} ({}x{})",
            path.as_ref().display(),
            image.width(),
            image.height()
        );
        Ok(Surface::from_rgba_image(&image))
    }

    /// Rasterizes `text` with `font` at em size `size` and blits it at `pos`.
    pub fn add_text(
        &mut self,
        pos: (i64, i64),
        text: &str,
        color: impl Into<Color>,
        font: &Font,
        size: u32,
    ) {
        let Color::Rgb(rgb) = color.into() else {
            return;
        };
        let glyphs = Surface::from_rgba_image(&font.rasterize(text, rgb, size));
        self.blit(&glyphs, pos);
    }

    /// Builds a region of this surface's size, positioned by `anchors` applied in order.
    pub fn to_region(&self, anchors: &[Anchor]) -> Region {
        let mut region = Region::new(0, 0, self.width as i64, self.height as i64);
        for anchor in anchors {
            region.apply_anchor(*anchor);
        }
        region
    }
}

impl Canvas for Surface {
    fn set_color(&mut self, pos: (i64, i64), color: Color) {
        self.put_pixel(pos, color);
    }

    fn color_at(&self, pos: (i64, i64)) -> Color {
        self.get_pixel(pos)
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }
}
