//! The terminal-backed drawing surface.
//!
//! A [`Display`] owns the committed frame (a [`Surface`]), the raw text overlay, the compositor
//! and the output sink. On a real terminal it also owns the input worker: the worker is spawned
//! by [`Display::new`] and stopped by [`Display::exit`] (or on drop).
//!
//! # Example
//!
//! ```rust ,no_run
//! use pixterm::config::DisplayConfig;
//! use pixterm::input::{Event, Key, KeyboardEvent};
//! use pixterm::rendering::display::Display;
//!
//! fn main() -> pixterm::Result<()> {
//!     let mut display = Display::new(DisplayConfig::fullscreen())?;
//!     while !display.ended() {
//!         for event in display.events() {
//!             if event == Event::Keyboard(KeyboardEvent::down(Key::Char('q'))) {
//!                 display.exit()?;
//!             }
//!         }
//!         display.fill([0, 0, 40]);
//!         display.put_pixel((3, 3), [255, 200, 0]);
//!         display.add_raw_text((2, 0), "press q");
//!         display.update()?;
//!     }
//!     Ok(())
//! }
//! ```

use crate::config::DisplayConfig;
use crate::error::{Error, Result};
use crate::input::context::InputContext;
use crate::input::keys::Key;
use crate::input::worker::InputWorker;
use crate::input::Event;
use crate::rendering::color::Color;
use crate::rendering::compositor::{Compositor, Viewport};
use crate::rendering::surface::{Canvas, Surface};
use crate::rendering::text::{Font, TextOverlay};
use crate::terminal::FrameWriter;
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, execute, queue};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

/// A pixel surface rendered to a terminal with half-block characters.
pub struct Display<W: Write = FrameWriter> {
    surface: Surface,
    overlay: TextOverlay,
    viewport: Viewport,
    compositor: Compositor,
    sink: W,
    context: Arc<InputContext>,
    input: Option<InputWorker>,
    ended: bool,
}

#[cfg(unix)]
impl Display<FrameWriter> {
    /// Opens a display on the process' terminal and starts reading input.
    pub fn new(config: DisplayConfig) -> Result<Self> {
        Self::new_with_probe(config, crate::input::worker::NoWindowProbe)
    }

    /// Like [`Display::new`], with a probe guarding against keystrokes typed into other windows.
    pub fn new_with_probe(
        config: DisplayConfig,
        probe: impl crate::input::worker::WindowProbe + 'static,
    ) -> Result<Self> {
        use crate::input::worker::InputSettings;
        use crate::terminal::{RawTerminal, StdinSource};

        let (cols, rows) = crossterm::terminal::size()?;
        let context = Arc::new(InputContext::new());
        let worker = InputWorker::spawn(
            StdinSource::new()?,
            probe,
            RawTerminal::new(config.mouse_tracking, config.focus_reporting),
            context.clone(),
            InputSettings::from(&config),
        )?;

        let mut display = Self::build(
            &config,
            Viewport::from_terminal(cols, rows),
            FrameWriter::new(),
            context,
        );
        display.input = Some(worker);
        execute!(display.sink, Clear(ClearType::All))?;
        log::info!(
            "display opened: {}x{} pixels on a {cols}x{rows} terminal",
            display.width(),
            display.height()
        );
        Ok(display)
    }
}

impl<W: Write> Display<W> {
    /// A display rendering into `sink` without touching the terminal or reading input.
    ///
    /// Size flags in `config` are resolved against `viewport` as if it were the terminal.
    pub fn headless(config: DisplayConfig, viewport: Viewport, sink: W) -> Self {
        Self::build(&config, viewport, sink, Arc::new(InputContext::new()))
    }

    fn build(config: &DisplayConfig, viewport: Viewport, sink: W, context: Arc<InputContext>) -> Self {
        let cols = u16::try_from(viewport.width).unwrap_or(u16::MAX);
        let rows = u16::try_from(viewport.height / 2).unwrap_or(u16::MAX);
        let (width, height) = config.resolve_size(cols, rows);
        Self {
            surface: Surface::new(width, height),
            overlay: TextOverlay::new(),
            viewport,
            compositor: Compositor::new(),
            sink,
            context,
            input: None,
            ended: false,
        }
    }

    pub fn width(&self) -> usize {
        self.surface.width()
    }

    pub fn height(&self) -> usize {
        self.surface.height()
    }

    pub fn size(&self) -> (usize, usize) {
        self.surface.size()
    }

    /// The drawable terminal area in pixels.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The committed frame.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn overlay(&self) -> &TextOverlay {
        &self.overlay
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// The input state shared with the worker.
    pub fn context(&self) -> &Arc<InputContext> {
        &self.context
    }

    /// Fills the frame (see [`Surface::fill`]) and removes all raw text.
    pub fn fill(&mut self, color: impl Into<Color>) {
        self.surface.fill(color);
        self.overlay.clear();
    }

    pub fn put_pixel(&mut self, pos: (i64, i64), color: impl Into<Color>) {
        self.surface.put_pixel(pos, color);
    }

    pub fn get_pixel(&self, pos: (i64, i64)) -> Color {
        self.surface.get_pixel(pos)
    }

    pub fn blit(&mut self, source: &Surface, dest: (i64, i64)) {
        self.surface.blit(source, dest);
    }

    /// Rasterizes `text` and blits it at `pos`, see [`Surface::add_text`].
    pub fn add_text(
        &mut self,
        pos: (i64, i64),
        text: &str,
        color: impl Into<Color>,
        font: &Font,
        size: u32,
    ) {
        self.surface.add_text(pos, text, color, font, size);
    }

    /// Writes terminal characters on top of the pixels, one per column starting at `pos`.
    ///
    /// `pos.1` is a pixel row; only even rows line up with a character cell.
    pub fn add_raw_text(&mut self, pos: (i64, i64), text: &str) {
        self.overlay.put_str(pos, text);
    }

    /// Renders the frame to the sink.
    ///
    /// A terminal resize noticed by the input worker is applied first.
    pub fn update(&mut self) -> Result<()> {
        if let Some((cols, rows)) = self.context.take_resize() {
            self.resize_viewport(cols, rows)?;
        }
        let frame = self
            .compositor
            .compose(&self.surface, &self.overlay, self.viewport)?;
        queue!(self.sink, cursor::MoveTo(0, 0))?;
        self.sink.write_all(frame.as_bytes())?;
        self.sink.flush()?;
        Ok(())
    }

    /// Adapts to a terminal of `cols x rows` cells and clears it.
    ///
    /// The logical size does not change; only what is visible of it.
    pub fn resize_viewport(&mut self, cols: u16, rows: u16) -> Result<()> {
        self.viewport = Viewport::from_terminal(cols, rows);
        log::debug!("viewport is now {}x{}", self.viewport.width, self.viewport.height);
        execute!(self.sink, Clear(ClearType::All))?;
        Ok(())
    }

    /// Drains the input queue.
    pub fn events(&mut self) -> Vec<Event> {
        self.context.drain()
    }

    /// A snapshot of the pressed-key table.
    pub fn pressed(&self) -> HashMap<Key, bool> {
        self.context.pressed()
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.context.is_pressed(key)
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    /// Clears the terminal and stops the input worker, which restores the terminal mode.
    ///
    /// Calling this again does nothing.
    pub fn exit(&mut self) -> Result<()> {
        if self.ended {
            return Ok(());
        }
        self.ended = true;
        self.context.close();
        let cleared = execute!(self.sink, Clear(ClearType::All), cursor::MoveTo(0, 0))
            .map_err(Error::from);
        let joined = self.input.take().map_or(Ok(()), InputWorker::join);
        log::info!("display closed");
        cleared.and(joined)
    }
}

impl<W: Write> Canvas for Display<W> {
    fn set_color(&mut self, pos: (i64, i64), color: Color) {
        self.surface.put_pixel(pos, color);
    }

    fn color_at(&self, pos: (i64, i64)) -> Color {
        self.surface.get_pixel(pos)
    }

    fn width(&self) -> usize {
        self.surface.width()
    }

    fn height(&self) -> usize {
        self.surface.height()
    }
}

impl<W: Write> Drop for Display<W> {
    fn drop(&mut self) {
        if let Err(err) = self.exit() {
            log::warn!("failed to close display: {err}");
        }
    }
}
