//! Shows decoded input as it arrives.
//!
//! Usage:
//!
//! * `cargo run --example input-echo` prints events.
//! * `cargo run --example input-echo -- --record out.bin` also records them.
//! * `cargo run --example input-echo -- --replay out.bin` plays a recording back.

mod common;

use pixterm::input::recorder::{EventRecorder, EventReplayer, Recording};
use pixterm::util::clock::Clock;
use pixterm::{Display, DisplayConfig, Event, Key};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const HISTORY: usize = 12;

fn describe(event: &Event) -> String {
    match event {
        Event::Keyboard(keyboard) => format!("{:?} {}", keyboard.phase, keyboard.key),
        Event::Mouse(mouse) => format!("{:?} at {:?}", mouse.kind, mouse.pos),
    }
}

fn main() -> anyhow::Result<()> {
    common::init_logging()?;
    pixterm::install_panic_handler();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let record_to = args
        .iter()
        .position(|a| a == "--record")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);
    let replay_from = args
        .iter()
        .position(|a| a == "--replay")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);

    let config = DisplayConfig::fullscreen().with_key_release(Some(Duration::from_millis(500)));
    let mut display = Display::new(config)?;
    let mut recorder = record_to.as_ref().map(|_| EventRecorder::start(display.size()));
    let mut replayer = match &replay_from {
        Some(path) => Some(EventReplayer::new(Recording::read_from_file(path)?)),
        None => None,
    };
    let mut clock = Clock::new();
    let mut history: VecDeque<String> = VecDeque::with_capacity(HISTORY);

    while !display.ended() {
        if let Some(replayer) = &mut replayer {
            replayer.replay_until(Instant::now(), display.context());
        }
        let events = display.events();
        if let Some(recorder) = &mut recorder {
            recorder.record_all(&events);
        }
        for event in &events {
            if common::is_quit(event) {
                display.exit()?;
                break;
            }
            if history.len() == HISTORY {
                history.pop_front();
            }
            history.push_back(describe(event));
        }
        if display.ended() {
            break;
        }

        display.fill([20, 20, 20]);
        display.add_raw_text((1, 0), "input echo, q to quit");
        for (row, line) in history.iter().enumerate() {
            display.add_raw_text((1, 4 + 2 * row as i64), line);
        }
        let mut pressed: Vec<Key> = display
            .pressed()
            .into_iter()
            .filter_map(|(key, down)| down.then_some(key))
            .collect();
        pressed.sort();
        let pressed: Vec<String> = pressed.iter().map(Key::name).collect();
        display.add_raw_text((1, 2), &format!("pressed: {}", pressed.join(" ")));
        display.update()?;
        clock.tick(30.0);
    }

    if let (Some(recorder), Some(path)) = (recorder, record_to) {
        recorder.finish().save_to_file(path)?;
    }
    Ok(())
}
