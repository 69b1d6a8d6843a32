//! Pixel-pair to glyph compositing.
//!
//! A terminal cell can show two colors, foreground and background. Drawing an upper half block
//! `▀` with the top pixel as foreground and the bottom pixel as background turns one character
//! cell into a 1x2 column of pixels.
//!
//! **Per frame:**
//!
//! 1.  The rendered area is the surface clipped to the [`Viewport`].
//! 2.  The sparse surface is scattered into a dense scratch [`Grid`] one row and one column
//!     larger than the rendered area, so top and bottom pixel can be indexed directly.
//! 3.  Every pair of pixel rows becomes one line of cells, chosen by [`write_cell`].
//! 4.  Lines are joined with `"\r\n"`.
//!
//! Cells without any pixel are written as a plain space without escape codes, and every colored
//! cell ends with a reset, so no color ever bleeds into a neighboring cell.

use crate::error::Result;
use crate::rendering::grid::Grid;
use crate::rendering::surface::Surface;
use crate::rendering::text::TextOverlay;
use std::fmt;
use std::fmt::Write;

pub const UPPER_HALF_BLOCK: char = '▀';
pub const LOWER_HALF_BLOCK: char = '▄';

const SGR_RESET: &str = "\x1b[0m";
const ROW_SEPARATOR: &str = "\r\n";

/// Area of the terminal that can be drawn to, in pixels.
///
/// `height` counts pixel rows, i.e. twice the number of terminal rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// The viewport of a terminal with `cols x rows` character cells.
    pub fn from_terminal(cols: u16, rows: u16) -> Self {
        Self {
            width: usize::from(cols),
            height: usize::from(rows) * 2,
        }
    }
}

/// Turns a surface plus text overlay into one frame of styled terminal text.
///
/// The compositor keeps its scratch grid and frame buffer between frames to reuse their
/// allocations; the scratch contents are discarded after every frame.
#[derive(Debug)]
pub struct Compositor {
    scratch: Grid<Option<[u8; 3]>>,
    frame: String,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            scratch: Grid::new(0, 0, None),
            frame: String::new(),
        }
    }

    /// Composes one frame and returns it.
    ///
    /// The result only depends on the arguments: composing unchanged state twice yields
    /// byte-identical frames.
    pub fn compose(
        &mut self,
        surface: &Surface,
        overlay: &TextOverlay,
        viewport: Viewport,
    ) -> Result<&str> {
        let width = surface.width().min(viewport.width);
        let height = surface.height().min(viewport.height);

        self.scratch.reset(width + 1, height + 1);
        for ((x, y), rgb) in surface.pixels() {
            if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
                self.scratch.set(x, y, Some(rgb));
            }
        }

        self.frame.clear();
        // never touch the last terminal row, writing there scrolls the screen
        let rows = height.min(viewport.height.saturating_sub(1));
        let cols = (width + 1).min(viewport.width);
        for y in (0..rows).step_by(2) {
            if y > 0 {
                self.frame.push_str(ROW_SEPARATOR);
            }
            for x in 0..cols {
                let top = self.scratch[(x, y)];
                let bottom = self.scratch[(x, y + 1)];
                let text = overlay.get((x as i64, y as i64));
                write_cell(&mut self.frame, top, bottom, text)?;
            }
        }

        self.scratch.clear();
        Ok(&self.frame)
    }
}

/// Writes one character cell for the pixel pair `top`/`bottom`.
///
/// | top   | bottom | text | output                                   |
/// |-------|--------|------|------------------------------------------|
/// | -     | -      | -    | `' '`, no escape codes                   |
/// | -     | set    | -    | `▄` in `bottom`                          |
/// | set   | -      | -    | `▀` in `top`                             |
/// | set   | set    | -    | `▀` in `top` on `bottom`                 |
/// | any   | any    | `c`  | `c` on the average of the set pixels     |
pub fn write_cell(
    out: &mut impl Write,
    top: Option<[u8; 3]>,
    bottom: Option<[u8; 3]>,
    text: Option<char>,
) -> fmt::Result {
    if let Some(c) = text {
        let background = match (top, bottom) {
            (Some(top), Some(bottom)) => Some(average(top, bottom)),
            (Some(color), None) | (None, Some(color)) => Some(color),
            (None, None) => None,
        };
        return match background {
            Some(bg) => {
                write_bg(out, bg)?;
                out.write_char(c)?;
                out.write_str(SGR_RESET)
            }
            None => out.write_char(c),
        };
    }

    match (top, bottom) {
        // no need to draw anything
        (None, None) => out.write_char(' '),
        (None, Some(color)) => {
            write_fg(out, color)?;
            out.write_char(LOWER_HALF_BLOCK)?;
            out.write_str(SGR_RESET)
        }
        (Some(color), None) => {
            write_fg(out, color)?;
            out.write_char(UPPER_HALF_BLOCK)?;
            out.write_str(SGR_RESET)
        }
        (Some(top), Some(bottom)) => {
            write_fg(out, top)?;
            write_bg(out, bottom)?;
            out.write_char(UPPER_HALF_BLOCK)?;
            out.write_str(SGR_RESET)
        }
    }
}

/// Channel-wise integer average.
pub fn average(a: [u8; 3], b: [u8; 3]) -> [u8; 3] {
    [0, 1, 2].map(|i| ((u16::from(a[i]) + u16::from(b[i])) / 2) as u8)
}

fn write_fg(out: &mut impl Write, [r, g, b]: [u8; 3]) -> fmt::Result {
    write!(out, "\x1b[38;2;{r};{g};{b}m")
}

fn write_bg(out: &mut impl Write, [r, g, b]: [u8; 3]) -> fmt::Result {
    write!(out, "\x1b[48;2;{r};{g};{b}m")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 3] = [255, 0, 0];
    const BLUE: [u8; 3] = [0, 0, 255];

    fn cell(top: Option<[u8; 3]>, bottom: Option<[u8; 3]>, text: Option<char>) -> String {
        let mut out = String::new();
        write_cell(&mut out, top, bottom, text).unwrap();
        out
    }

    #[test]
    fn test_cell_rule_table() {
        assert_eq!(cell(None, None, None), " ");
        assert_eq!(cell(Some(RED), None, None), "\x1b[38;2;255;0;0m▀\x1b[0m");
        assert_eq!(cell(None, Some(RED), None), "\x1b[38;2;255;0;0m▄\x1b[0m");
        assert_eq!(
            cell(Some(RED), Some(BLUE), None),
            "\x1b[38;2;255;0;0m\x1b[48;2;0;0;255m▀\x1b[0m"
        );
    }

    #[test]
    fn test_top_only_has_no_background_code() {
        assert!(!cell(Some(RED), None, None).contains("\x1b[48;"));
    }

    #[test]
    fn test_text_cells_blend_background() {
        assert_eq!(
            cell(Some(RED), Some(BLUE), Some('x')),
            "\x1b[48;2;127;0;127mx\x1b[0m"
        );
        assert_eq!(cell(None, Some(BLUE), Some('x')), "\x1b[48;2;0;0;255mx\x1b[0m");
        assert_eq!(cell(Some(RED), None, Some('x')), "\x1b[48;2;255;0;0mx\x1b[0m");
        assert_eq!(cell(None, None, Some('x')), "x");
    }

    #[test]
    fn test_compose_pairs_rows() {
        let mut surface = Surface::new(2, 4);
        surface.put_pixel((0, 0), RED);
        surface.put_pixel((1, 3), BLUE);
        let mut compositor = Compositor::new();
        let frame = compositor
            .compose(&surface, &TextOverlay::new(), Viewport::new(3, 10))
            .unwrap()
            .to_string();
        let expected = format!(
            "{} {}\r\n {} ",
            cell(Some(RED), None, None),
            " ",
            cell(None, Some(BLUE), None)
        );
        assert_eq!(frame, expected);
    }

    #[test]
    fn test_compose_clips_to_viewport() {
        let mut surface = Surface::new(100, 100);
        surface.fill(RED);
        let mut compositor = Compositor::new();
        let frame = compositor
            .compose(&surface, &TextOverlay::new(), Viewport::from_terminal(4, 3))
            .unwrap()
            .to_string();
        let lines: Vec<&str> = frame.split(ROW_SEPARATOR).collect();
        assert_eq!(lines.len(), 3);
        for line in lines {
            assert_eq!(line.matches(UPPER_HALF_BLOCK).count(), 4);
        }
    }

    #[test]
    fn test_compose_is_idempotent() {
        let mut surface = Surface::new(6, 6);
        surface.put_pixel((1, 1), RED);
        surface.put_pixel((2, 4), BLUE);
        surface.put_pixel((-3, 2), BLUE);
        let mut overlay = TextOverlay::new();
        overlay.put_str((0, 2), "ok");
        let mut compositor = Compositor::new();
        let viewport = Viewport::new(10, 10);
        let first = compositor.compose(&surface, &overlay, viewport).unwrap().to_string();
        let second = compositor.compose(&surface, &overlay, viewport).unwrap().to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn test_overlay_suppresses_block_glyphs() {
        let mut surface = Surface::new(1, 2);
        surface.fill(RED);
        let mut overlay = TextOverlay::new();
        overlay.put_str((0, 0), "A");
        let mut compositor = Compositor::new();
        let frame = compositor
            .compose(&surface, &overlay, Viewport::new(1, 4))
            .unwrap()
            .to_string();
        assert_eq!(frame, "\x1b[48;2;255;0;0mA\x1b[0m");
    }
}
