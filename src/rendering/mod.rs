//! Rendering pixels to a terminal.
//!
//! **Sub-modules:**
//!
//! *   [`color`](crate::rendering::color): The [`Color`](color::Color) of a pixel and how names
//!     and hex strings resolve to it.
//! *   [`surface`](crate::rendering::surface): The sparse [`Surface`](surface::Surface) pixel
//!     store and the [`Canvas`](surface::Canvas) trait.
//! *   [`text`](crate::rendering::text): Raw character overlay and font rasterization.
//! *   [`grid`](crate::rendering::grid): Dense scratch buffer used while compositing.
//! *   [`compositor`](crate::rendering::compositor): Turns pixel pairs into half-block glyphs.
//! *   [`display`](crate::rendering::display): The terminal-backed
//!     [`Display`](display::Display).
//!
//! **Key Concepts:**
//!
//! *   **Half blocks:** A terminal cell is twice as tall as it is wide. Printing `▀` with the
//!     foreground set to one pixel and the background set to the pixel below yields square
//!     pixels, two per cell.
//! *   **Sparse frames:** Surfaces only store painted pixels. Everything else is transparent and
//!     shows the terminal's own background.
//! *   **Full redraw:** Every [`Display::update`](display::Display::update) rewrites the whole
//!     visible area, so the output of a frame only depends on the frame itself.

pub mod color;
pub mod compositor;
pub mod display;
pub mod grid;
pub mod surface;
pub mod text;
