//! Animated tour of the drawing primitives and transforms.
//!
//! Usage: `cargo run --example showcase [config.toml]`. Move the mouse to drag the cursor ring,
//! click to drop a star, `q` or escape quits.

mod common;

use pixterm::draw;
use pixterm::transform;
use pixterm::util::clock::Clock;
use pixterm::{Anchor, Display, DisplayConfig, Event, MouseKind, Region, Surface};
use rand::Rng;

fn sprite() -> Surface {
    let mut sprite = Surface::new(9, 5);
    draw::rect(&mut sprite, [40, 200, 120], Region::new(0, 0, 9, 5), 1);
    draw::line(&mut sprite, [250, 250, 90], (0, 0), (8, 4), 1);
    sprite
}

fn main() -> anyhow::Result<()> {
    common::init_logging()?;
    pixterm::install_panic_handler();

    let config = match std::env::args().nth(1) {
        Some(path) => DisplayConfig::load(path)?,
        None => DisplayConfig::fullscreen(),
    };
    let mut display = Display::new(config)?;
    let mut clock = Clock::new();
    let mut rng = rand::thread_rng();

    let (width, height) = (display.width() as i64, display.height() as i64);
    let mut stars: Vec<(i64, i64)> = (0..40)
        .map(|_| (rng.gen_range(0..width.max(1)), rng.gen_range(0..height.max(1))))
        .collect();
    let sprite = sprite();
    let big_sprite = transform::scale2x(&sprite);
    let mut cursor = (width / 2, height / 2);
    let mut frame: u64 = 0;

    while !display.ended() {
        for event in display.events() {
            if common::is_quit(&event) {
                display.exit()?;
                return Ok(());
            }
            if let Event::Mouse(mouse) = event {
                cursor = mouse.pos;
                if mouse.kind == MouseKind::LeftMouseDown {
                    stars.push(mouse.pos);
                }
            }
        }

        display.fill([8, 8, 24]);
        for &(x, y) in &stars {
            let twinkle = 120 + (x * 7 + y * 13 + frame as i64).rem_euclid(8) as u8 * 16;
            display.put_pixel((x, y), [twinkle, twinkle, 255]);
        }

        let phase = frame as i64 % width.max(1);
        draw::rect(&mut display, [200, 60, 60], Region::new(phase, 4, 10, 6), 0);
        draw::circle(&mut display, [255, 170, 0], (width / 4, height / 2), 7, 2);
        draw::polygon(
            &mut display,
            [90, 160, 255],
            &[(width / 2, 6), (width / 2 + 10, 20), (width / 2 - 10, 20)],
            true,
        );

        let rotated = transform::rotate(&sprite, (frame * 6 % 360) as f64);
        let spot = rotated.to_region(&[Anchor::Center((3 * width / 4, height / 2))]);
        display.blit(&rotated, spot.top_left());
        display.blit(&transform::flip(&big_sprite, frame / 30 % 2 == 1, false), (2, height - 12));

        draw::circle(&mut display, [255, 255, 255], cursor, 2, 1);
        display.add_raw_text((1, 0), &format!("{:5.1} fps  {} stars", clock.fps(), stars.len()));
        display.update()?;

        clock.tick(30.0);
        frame += 1;
    }
    Ok(())
}
