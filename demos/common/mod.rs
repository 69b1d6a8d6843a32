//! Setup shared by the demos.

use std::fs::OpenOptions;

/// Logs to `pixterm.log` in the working directory, anything on stderr would tear the frame.
/// Default filter is "info" if RUST_LOG is not set.
pub fn init_logging() -> anyhow::Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("pixterm.log")?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

/// True for the keys every demo quits on.
pub fn is_quit(event: &pixterm::Event) -> bool {
    use pixterm::{Event, Key, KeyPhase};
    matches!(
        event,
        Event::Keyboard(keyboard)
            if keyboard.phase == KeyPhase::Down
                && matches!(keyboard.key, Key::Char('q') | Key::Escape | Key::Ctrl('c'))
    )
}
