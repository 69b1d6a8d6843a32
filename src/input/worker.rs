//! The background input worker.
//!
//! The worker reads one byte at a time from a [`ByteSource`] with a bounded timeout, feeds it to
//! the [`Decoder`] and publishes the results into the shared [`InputContext`]. Between polls it
//! checks the stop flag, expires keys that were not repeated (if key release synthesis is on) and
//! watches the terminal size.
//!
//! The terminal is switched into input mode when the worker starts and restored when it stops.
//! Restoration is tied to a [`ModeGuard`], so it runs on every exit path: a normal stop, an I/O
//! error from the source, or a panic unwinding the worker thread.

use crate::config::DisplayConfig;
use crate::error::{Error, Result};
use crate::input::context::InputContext;
use crate::input::decoder::{Decoded, Decoder};
use crate::input::keys::Key;
use std::collections::HashMap;
use std::io;
use std::ops::Deref;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Where input bytes come from.
pub trait ByteSource: Send {
    /// Waits up to `timeout` for the next byte. `Ok(None)` means the timeout elapsed.
    fn next_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>>;
}

/// Identifies the window that currently has focus.
///
/// The worker captures the identity once at start. Whenever it later differs, keystrokes are
/// assumed to belong to another window: they are dropped and every pressed key is released.
/// Return `None` if the platform cannot tell, which disables the check.
pub trait WindowProbe: Send {
    fn current_window(&mut self) -> Option<String>;
}

/// Probe for platforms without a way to query the focused window.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoWindowProbe;

impl WindowProbe for NoWindowProbe {
    fn current_window(&mut self) -> Option<String> {
        None
    }
}

impl<F> WindowProbe for F
where
    F: FnMut() -> Option<String> + Send,
{
    fn current_window(&mut self) -> Option<String> {
        self()
    }
}

/// Terminal mode switching.
pub trait TerminalMode: Send {
    /// Switches the terminal into input mode (raw mode, mouse tracking, ...).
    fn enter(&mut self) -> io::Result<()>;

    /// Undoes [`enter`](TerminalMode::enter). Must be safe to call more than once.
    fn restore(&mut self) -> io::Result<()>;

    /// Terminal size in `(columns, rows)`.
    fn size(&self) -> io::Result<(u16, u16)>;
}

/// Holds a [`TerminalMode`] in input mode for as long as it lives.
pub struct ModeGuard<'a, M: TerminalMode + ?Sized> {
    mode: &'a mut M,
}

impl<'a, M: TerminalMode + ?Sized> ModeGuard<'a, M> {
    /// Enters input mode. If that fails halfway, whatever was changed is restored.
    pub fn acquire(mode: &'a mut M) -> io::Result<Self> {
        if let Err(err) = mode.enter() {
            if let Err(restore_err) = mode.restore() {
                log::warn!("failed to restore terminal after failed setup: {restore_err}");
            }
            return Err(err);
        }
        log::debug!("terminal entered input mode");
        Ok(Self { mode })
    }
}

impl<M: TerminalMode + ?Sized> Deref for ModeGuard<'_, M> {
    type Target = M;

    fn deref(&self) -> &Self::Target {
        self.mode
    }
}

impl<M: TerminalMode + ?Sized> Drop for ModeGuard<'_, M> {
    fn drop(&mut self) {
        match self.mode.restore() {
            Ok(()) => log::debug!("terminal restored"),
            Err(err) => log::warn!("failed to restore terminal: {err}"),
        }
    }
}

/// Timing knobs of the input loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputSettings {
    pub poll_interval: Duration,
    pub escape_timeout: Duration,
    pub key_release: Option<Duration>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for InputSettings {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            escape_timeout: config.escape_timeout(),
            key_release: config.key_release(),
        }
    }
}

/// The decoding loop, independent of any thread.
pub struct InputLoop<S, P> {
    source: S,
    probe: P,
    context: Arc<InputContext>,
    decoder: Decoder,
    settings: InputSettings,
    start_window: Option<String>,
    focused: bool,
    last_seen: HashMap<Key, Instant>,
}

impl<S: ByteSource, P: WindowProbe> InputLoop<S, P> {
    /// Creates the loop and captures the current window identity from `probe`.
    pub fn new(source: S, mut probe: P, context: Arc<InputContext>, settings: InputSettings) -> Self {
        let start_window = probe.current_window();
        log::debug!("input loop bound to window {start_window:?}");
        Self {
            source,
            probe,
            context,
            decoder: Decoder::new(),
            settings,
            start_window,
            focused: true,
            last_seen: HashMap::new(),
        }
    }

    /// Waits for at most one byte and processes it.
    ///
    /// While a sequence is partially decoded the wait is the (short) escape timeout, otherwise
    /// the poll interval. The window identity is checked on every poll, also when nothing was
    /// read: while it differs from the one captured at start, all keys are released and only
    /// focus reports get through.
    pub fn poll_once(&mut self) -> io::Result<()> {
        let timeout = if self.decoder.is_idle() {
            self.settings.poll_interval
        } else {
            self.settings.escape_timeout
        };
        let decoded = match self.source.next_byte(timeout)? {
            Some(byte) => self.decoder.feed(byte),
            None => self.decoder.flush_idle(),
        };

        let away = self.window_changed();
        if away {
            self.release_all();
        }
        match decoded {
            Some(decoded @ (Decoded::FocusLost | Decoded::FocusGained)) => self.dispatch(decoded),
            Some(decoded) if away => log::trace!("dropping {decoded:?}, window changed"),
            Some(decoded) => self.dispatch(decoded),
            None => {}
        }
        self.expire_keys(Instant::now());
        Ok(())
    }

    /// Publishes one decoded unit into the context.
    pub fn dispatch(&mut self, decoded: Decoded) {
        match decoded {
            Decoded::FocusLost => {
                log::debug!("terminal lost focus");
                self.focused = false;
                self.release_all();
                return;
            }
            Decoded::FocusGained => {
                log::debug!("terminal gained focus");
                self.focused = true;
                return;
            }
            _ => {}
        }

        if !self.focused {
            log::trace!("dropping {decoded:?}, terminal not focused");
            self.release_all();
            return;
        }

        match decoded {
            Decoded::Key(key) => {
                self.context.key_down(key);
                self.last_seen.insert(key, Instant::now());
            }
            Decoded::Mouse(mouse) => {
                self.context.push(mouse.into());
            }
            Decoded::FocusLost | Decoded::FocusGained => {}
        }
    }

    /// Releases keys that have not been seen for longer than the key release timeout.
    pub fn expire_keys(&mut self, now: Instant) {
        let Some(timeout) = self.settings.key_release else {
            return;
        };
        let expired: Vec<Key> = self
            .last_seen
            .iter()
            .filter(|(_, seen)| now.saturating_duration_since(**seen) >= timeout)
            .map(|(key, _)| *key)
            .collect();
        for key in expired {
            self.last_seen.remove(&key);
            self.context.key_up(key);
        }
    }

    fn window_changed(&mut self) -> bool {
        match &self.start_window {
            Some(start) => self.probe.current_window().as_ref() != Some(start),
            None => false,
        }
    }

    fn release_all(&mut self) {
        self.last_seen.clear();
        self.context.release_all();
    }

    /// Runs until the context is closed or the source fails.
    ///
    /// The terminal is in input mode for exactly the duration of this call.
    pub fn run<M: TerminalMode + ?Sized>(mut self, mode: &mut M) -> io::Result<()> {
        let guard = ModeGuard::acquire(mode)?;
        let mut last_size = guard.size().ok();
        log::info!("input worker started");

        while !self.context.is_closed() {
            self.poll_once()?;
            if let Ok(size) = guard.size() {
                if last_size != Some(size) {
                    log::debug!("terminal resized to {}x{}", size.0, size.1);
                    last_size = Some(size);
                    self.context.post_resize(size.0, size.1);
                }
            }
        }

        log::info!("input worker stopped");
        Ok(())
    }
}

/// Handle to the worker thread.
#[derive(Debug)]
pub struct InputWorker {
    handle: Option<JoinHandle<io::Result<()>>>,
    context: Arc<InputContext>,
}

impl InputWorker {
    /// Spawns the worker thread. The terminal enters input mode on that thread.
    pub fn spawn<S, P, M>(
        source: S,
        probe: P,
        mut mode: M,
        context: Arc<InputContext>,
        settings: InputSettings,
    ) -> Result<Self>
    where
        S: ByteSource + 'static,
        P: WindowProbe + 'static,
        M: TerminalMode + 'static,
    {
        let loop_context = context.clone();
        let handle = thread::Builder::new()
            .name("pixterm-input".to_string())
            .spawn(move || InputLoop::new(source, probe, loop_context, settings).run(&mut mode))?;
        Ok(Self {
            handle: Some(handle),
            context,
        })
    }

    /// Signals the worker to stop. It notices within one poll interval.
    pub fn stop(&self) {
        self.context.close();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stops the worker and waits for it, returning the error it stopped with, if any.
    pub fn join(mut self) -> Result<()> {
        self.finish()
    }

    fn finish(&mut self) -> Result<()> {
        self.stop();
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        match handle.join() {
            Ok(result) => result.map_err(Error::from),
            Err(_) => Err(Error::WorkerPanicked),
        }
    }
}

impl Drop for InputWorker {
    fn drop(&mut self) {
        if let Err(err) = self.finish() {
            log::warn!("input worker ended with an error: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Event, KeyboardEvent, MouseEvent, MouseKind};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Plays back a fixed byte script. `None` entries are timeouts.
    struct Script {
        bytes: VecDeque<Option<u8>>,
        /// Closed once the script runs out.
        close_when_done: Option<Arc<InputContext>>,
        fail_when_done: bool,
    }

    impl Script {
        fn new(bytes: &[u8]) -> Self {
            Self {
                bytes: bytes.iter().map(|b| Some(*b)).collect(),
                close_when_done: None,
                fail_when_done: false,
            }
        }
    }

    impl ByteSource for Script {
        fn next_byte(&mut self, _timeout: Duration) -> io::Result<Option<u8>> {
            match self.bytes.pop_front() {
                Some(byte) => Ok(byte),
                None if self.fail_when_done => {
                    Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"))
                }
                None => {
                    if let Some(ctx) = &self.close_when_done {
                        ctx.close();
                    }
                    Ok(None)
                }
            }
        }
    }

    #[derive(Clone, Default)]
    struct RecordingMode {
        calls: Arc<Mutex<Vec<&'static str>>>,
        size: Arc<Mutex<(u16, u16)>>,
    }

    impl TerminalMode for RecordingMode {
        fn enter(&mut self) -> io::Result<()> {
            self.calls.lock().unwrap().push("enter");
            Ok(())
        }

        fn restore(&mut self) -> io::Result<()> {
            self.calls.lock().unwrap().push("restore");
            Ok(())
        }

        fn size(&self) -> io::Result<(u16, u16)> {
            Ok(*self.size.lock().unwrap())
        }
    }

    fn run_script(bytes: &[u8]) -> Arc<InputContext> {
        let ctx = Arc::new(InputContext::new());
        let mut input = InputLoop::new(
            Script::new(bytes),
            NoWindowProbe,
            ctx.clone(),
            InputSettings::default(),
        );
        for _ in 0..bytes.len() {
            input.poll_once().unwrap();
        }
        ctx
    }

    #[test]
    fn test_mouse_report_is_queued() {
        let ctx = run_script(&[0x1b, b'[', b'M', 0x20, 0x21, 0x22]);
        assert_eq!(
            ctx.drain(),
            vec![Event::Mouse(MouseEvent {
                kind: MouseKind::LeftMouseDown,
                pos: (0, 2),
            })]
        );
        assert!(ctx.drain().is_empty());
    }

    #[test]
    fn test_keys_are_pressed_and_deduplicated() {
        let ctx = run_script(b"aab");
        assert!(ctx.is_pressed(Key::Char('a')));
        assert!(ctx.is_pressed(Key::Char('b')));
        assert_eq!(
            ctx.drain(),
            vec![
                Event::Keyboard(KeyboardEvent::down(Key::Char('a'))),
                Event::Keyboard(KeyboardEvent::down(Key::Char('b'))),
            ]
        );
    }

    #[test]
    fn test_lone_escape_after_timeout() {
        let ctx = Arc::new(InputContext::new());
        let mut script = Script::new(&[0x1b]);
        script.bytes.push_back(None);
        let mut input = InputLoop::new(script, NoWindowProbe, ctx.clone(), InputSettings::default());
        input.poll_once().unwrap();
        assert_eq!(ctx.queued(), 0);
        input.poll_once().unwrap();
        assert_eq!(ctx.drain(), vec![Event::Keyboard(KeyboardEvent::down(Key::Escape))]);
    }

    #[test]
    fn test_window_change_clears_pressed_keys() {
        let ctx = Arc::new(InputContext::new());
        let window = Arc::new(Mutex::new("term".to_string()));
        let probe_window = window.clone();
        let probe = move || Some(probe_window.lock().unwrap().clone());
        let mut input = InputLoop::new(Script::new(b"xy"), probe, ctx.clone(), InputSettings::default());

        input.poll_once().unwrap();
        assert!(ctx.is_pressed(Key::Char('x')));
        ctx.drain();

        *window.lock().unwrap() = "browser".to_string();
        input.poll_once().unwrap();
        assert!(!ctx.is_pressed(Key::Char('x')));
        assert!(!ctx.is_pressed(Key::Char('y')));
        assert!(ctx.drain().is_empty());
    }

    #[test]
    fn test_window_change_releases_keys_without_input() {
        let ctx = Arc::new(InputContext::new());
        let window = Arc::new(Mutex::new("term".to_string()));
        let probe_window = window.clone();
        let probe = move || Some(probe_window.lock().unwrap().clone());
        let mut script = Script::new(b"x");
        script.bytes.extend([None, None]);
        let mut input = InputLoop::new(script, probe, ctx.clone(), InputSettings::default());

        input.poll_once().unwrap();
        assert!(ctx.is_pressed(Key::Char('x')));

        *window.lock().unwrap() = "browser".to_string();
        input.poll_once().unwrap();
        assert!(!ctx.is_pressed(Key::Char('x')));
        input.poll_once().unwrap();
        assert!(!ctx.is_pressed(Key::Char('x')));
        assert_eq!(ctx.drain(), vec![Event::Keyboard(KeyboardEvent::down(Key::Char('x')))]);
    }

    #[test]
    fn test_stale_mouse_prefix_does_not_swallow_keys() {
        let ctx = Arc::new(InputContext::new());
        let mut script = Script::new(b"\x1b[M");
        script.bytes.push_back(None);
        script.bytes.extend(b"abc".iter().map(|b| Some(*b)));
        let mut input = InputLoop::new(script, NoWindowProbe, ctx.clone(), InputSettings::default());
        for _ in 0..7 {
            input.poll_once().unwrap();
        }
        assert_eq!(
            ctx.drain(),
            vec![
                Event::Keyboard(KeyboardEvent::down(Key::Char('a'))),
                Event::Keyboard(KeyboardEvent::down(Key::Char('b'))),
                Event::Keyboard(KeyboardEvent::down(Key::Char('c'))),
            ]
        );
    }

    #[test]
    fn test_focus_report_clears_pressed_keys_until_focus_returns() {
        let ctx = run_script(b"x\x1b[Oy\x1b[Iz");
        assert!(!ctx.is_pressed(Key::Char('x')));
        assert!(!ctx.is_pressed(Key::Char('y')));
        assert!(ctx.is_pressed(Key::Char('z')));
        assert_eq!(
            ctx.drain(),
            vec![
                Event::Keyboard(KeyboardEvent::down(Key::Char('x'))),
                Event::Keyboard(KeyboardEvent::down(Key::Char('z'))),
            ]
        );
    }

    #[test]
    fn test_key_release_synthesis() {
        let ctx = Arc::new(InputContext::new());
        let settings = InputSettings {
            key_release: Some(Duration::from_millis(100)),
            ..InputSettings::default()
        };
        let mut input = InputLoop::new(Script::new(b"q"), NoWindowProbe, ctx.clone(), settings);
        input.poll_once().unwrap();
        assert!(ctx.is_pressed(Key::Char('q')));

        input.expire_keys(Instant::now() + Duration::from_secs(1));
        assert!(!ctx.is_pressed(Key::Char('q')));
        assert_eq!(
            ctx.drain(),
            vec![
                Event::Keyboard(KeyboardEvent::down(Key::Char('q'))),
                Event::Keyboard(KeyboardEvent::up(Key::Char('q'))),
            ]
        );
    }

    #[test]
    fn test_without_key_release_keys_stay_pressed() {
        let ctx = Arc::new(InputContext::new());
        let mut input = InputLoop::new(Script::new(b"q"), NoWindowProbe, ctx.clone(), InputSettings::default());
        input.poll_once().unwrap();
        input.expire_keys(Instant::now() + Duration::from_secs(60));
        assert!(ctx.is_pressed(Key::Char('q')));
    }

    #[test]
    fn test_run_restores_mode_on_error() {
        let ctx = Arc::new(InputContext::new());
        let mut script = Script::new(b"ab");
        script.fail_when_done = true;
        let mut mode = RecordingMode::default();
        let input = InputLoop::new(script, NoWindowProbe, ctx.clone(), InputSettings::default());

        let result = input.run(&mut mode);
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(*mode.calls.lock().unwrap(), vec!["enter", "restore"]);
        assert!(ctx.is_pressed(Key::Char('b')));
    }

    /// Resizes the terminal on the first poll and stops the loop on the second.
    struct ResizingSource {
        size: Arc<Mutex<(u16, u16)>>,
        ctx: Arc<InputContext>,
        polls: usize,
    }

    impl ByteSource for ResizingSource {
        fn next_byte(&mut self, _timeout: Duration) -> io::Result<Option<u8>> {
            self.polls += 1;
            match self.polls {
                1 => *self.size.lock().unwrap() = (100, 30),
                _ => self.ctx.close(),
            }
            Ok(None)
        }
    }

    #[test]
    fn test_run_posts_resize() {
        let ctx = Arc::new(InputContext::new());
        let mut mode = RecordingMode::default();
        *mode.size.lock().unwrap() = (80, 24);
        let source = ResizingSource {
            size: mode.size.clone(),
            ctx: ctx.clone(),
            polls: 0,
        };
        let input = InputLoop::new(source, NoWindowProbe, ctx.clone(), InputSettings::default());
        input.run(&mut mode).unwrap();
        assert_eq!(ctx.take_resize(), Some((100, 30)));
    }

    #[test]
    fn test_worker_thread_stops_and_restores() {
        let ctx = Arc::new(InputContext::new());
        let mode = RecordingMode::default();
        let calls = mode.calls.clone();
        let worker = InputWorker::spawn(
            Script::new(b"k"),
            NoWindowProbe,
            mode,
            ctx.clone(),
            InputSettings::default(),
        )
        .unwrap();
        worker.stop();
        worker.join().unwrap();
        assert!(ctx.is_closed());
        assert_eq!(*calls.lock().unwrap(), vec!["enter", "restore"]);
    }
}
