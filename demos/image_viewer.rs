//! Shows an image fitted to the terminal.
//!
//! Usage: `cargo run --example image-viewer -- <image> [font.ttf]`.
//!
//! Arrows pan, `+`/`-` zoom, `f` flips horizontally, `r` rotates by 90 degrees, `q` quits.

mod common;

use anyhow::Context;
use pixterm::input::keys::Symbol;
use pixterm::transform;
use pixterm::util::clock::Clock;
use pixterm::{Anchor, Display, DisplayConfig, Event, Font, Key, KeyPhase, Surface};

const PAN_STEP: i64 = 4;

#[derive(Debug, Default)]
struct View {
    offset: (i64, i64),
    zoom: f64,
    flipped: bool,
    quarter_turns: u8,
}

impl View {
    fn apply(&mut self, key: Key) -> bool {
        match key {
            Key::Up => self.offset.1 += PAN_STEP,
            Key::Down => self.offset.1 -= PAN_STEP,
            Key::Left => self.offset.0 += PAN_STEP,
            Key::Right => self.offset.0 -= PAN_STEP,
            Key::Symbol(Symbol::Plus) | Key::Symbol(Symbol::Equals) => self.zoom *= 1.25,
            Key::Symbol(Symbol::Minus) => self.zoom = (self.zoom / 1.25).max(0.05),
            Key::Char('f') => self.flipped = !self.flipped,
            Key::Char('r') => self.quarter_turns = (self.quarter_turns + 1) % 4,
            _ => return false,
        }
        true
    }

    /// Image transformed for the current view, scaled to fit `bounds` at zoom 1.
    fn render(&self, image: &Surface, bounds: (usize, usize)) -> Surface {
        let mut out = if self.flipped {
            transform::flip(image, true, false)
        } else {
            image.clone()
        };
        if self.quarter_turns != 0 {
            out = transform::rotate(&out, 90.0 * self.quarter_turns as f64);
        }
        let (w, h) = (out.width().max(1) as f64, out.height().max(1) as f64);
        let fit = (bounds.0 as f64 / w).min(bounds.1 as f64 / h) * self.zoom;
        transform::scale_by(&out, (fit, fit))
    }
}

fn main() -> anyhow::Result<()> {
    common::init_logging()?;
    pixterm::install_panic_handler();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .context("usage: image-viewer <image> [font.ttf]")?;
    let image = Surface::open(&path).with_context(|| format!("cannot open {path}"))?;
    let font = args.next().map(Font::open).transpose()?;

    let mut display = Display::new(DisplayConfig::fullscreen())?;
    let mut clock = Clock::new();
    let mut view = View {
        zoom: 1.0,
        ..View::default()
    };
    let mut shown = view.render(&image, display.size());

    while !display.ended() {
        let mut changed = false;
        for event in display.events() {
            if common::is_quit(&event) {
                display.exit()?;
                return Ok(());
            }
            if let Event::Keyboard(keyboard) = event {
                if keyboard.phase == KeyPhase::Down {
                    changed |= view.apply(keyboard.key);
                }
            }
        }
        if changed {
            log::debug!("view changed: {view:?}");
            shown = view.render(&image, display.size());
        }

        let (width, height) = display.size();
        let center = (width as i64 / 2 + view.offset.0, height as i64 / 2 + view.offset.1);
        let placed = shown.to_region(&[Anchor::Center(center)]);

        display.fill([0, 0, 0]);
        display.blit(&shown, placed.top_left());
        match &font {
            Some(font) => display.add_text((1, 1), &path, [255, 255, 255], font, 10),
            None => display.add_raw_text((0, 0), &path),
        }
        display.update()?;
        clock.tick(20.0);
    }
    Ok(())
}
