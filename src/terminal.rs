//! The real terminal: mode switching, stdin polling, frame output and panic cleanup.

#[cfg(unix)]
use crate::input::worker::ByteSource;
use crate::input::worker::TerminalMode;
use crossterm::{cursor, execute, terminal};
use std::io;
use std::io::{Stdout, Write, stdout};
#[cfg(unix)]
use std::time::Duration;

/// Report every mouse motion, not only button changes.
pub const MOUSE_TRACKING_ON: &str = "\x1b[?1003h";
pub const MOUSE_TRACKING_OFF: &str = "\x1b[?1003l";
/// Report focus changes as `ESC [ I` / `ESC [ O`.
pub const FOCUS_REPORTING_ON: &str = "\x1b[?1004h";
pub const FOCUS_REPORTING_OFF: &str = "\x1b[?1004l";

/// Raw mode plus mouse tracking and focus reporting on the process' terminal.
#[derive(Clone, Copy, Debug)]
pub struct RawTerminal {
    mouse_tracking: bool,
    focus_reporting: bool,
}

impl RawTerminal {
    pub fn new(mouse_tracking: bool, focus_reporting: bool) -> Self {
        Self {
            mouse_tracking,
            focus_reporting,
        }
    }
}

impl TerminalMode for RawTerminal {
    fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = stdout();
        if self.mouse_tracking {
            stdout.write_all(MOUSE_TRACKING_ON.as_bytes())?;
        }
        if self.focus_reporting {
            stdout.write_all(FOCUS_REPORTING_ON.as_bytes())?;
        }
        // don't print cursor
        execute!(stdout, cursor::Hide)?;
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        let written = stdout
            .write_all(MOUSE_TRACKING_OFF.as_bytes())
            .and_then(|()| stdout.write_all(FOCUS_REPORTING_OFF.as_bytes()))
            .and_then(|()| execute!(stdout, cursor::Show));
        // raw mode goes off even if the terminal stopped accepting output
        let raw = terminal::disable_raw_mode();
        written.and(raw)
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

/// Reads stdin byte by byte, bypassing std's buffered `Stdin` so that polling sees every byte.
#[cfg(unix)]
#[derive(Debug)]
pub struct StdinSource {
    file: std::fs::File,
}

#[cfg(unix)]
impl StdinSource {
    pub fn new() -> io::Result<Self> {
        use std::os::fd::AsFd;
        let fd = io::stdin().as_fd().try_clone_to_owned()?;
        Ok(Self {
            file: std::fs::File::from(fd),
        })
    }
}

#[cfg(unix)]
impl ByteSource for StdinSource {
    fn next_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        use nix::errno::Errno;
        use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
        use std::io::Read;
        use std::os::fd::AsFd;

        let millis = u16::try_from(timeout.as_millis()).unwrap_or(u16::MAX);
        let mut fds = [PollFd::new(self.file.as_fd(), PollFlags::POLLIN)];
        match poll(&mut fds, PollTimeout::from(millis)) {
            Ok(0) | Err(Errno::EINTR) => return Ok(None),
            Ok(_) => {}
            Err(errno) => return Err(errno.into()),
        }

        let mut byte = [0u8; 1];
        match self.file.read(&mut byte)? {
            0 => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed")),
            _ => Ok(Some(byte[0])),
        }
    }
}

/// Buffered stdout that _only_ writes on an explicit flush, so a frame reaches the terminal in
/// one piece.
#[derive(Debug)]
pub struct FrameWriter {
    buf: Vec<u8>,
    stdout: Stdout,
}

impl Default for FrameWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameWriter {
    pub fn new() -> Self {
        Self {
            buf: vec![],
            stdout: stdout(),
        }
    }

    /// Bytes written since the last flush.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

impl Write for FrameWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut lock = self.stdout.lock();
        lock.write_all(&self.buf)?;
        lock.flush()?;
        self.buf.clear();
        Ok(())
    }
}

/// Puts the terminal back into a usable state without touching any display state.
///
/// Used by the panic hook, where the display cannot be reached.
pub fn emergency_restore() -> io::Result<()> {
    let mut stdout = stdout();
    RawTerminal::new(true, true).restore()?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    Ok(())
}

/// Installs a panic handler that restores the terminal before the panic message is printed.
///
/// Without this, the message would be garbled by raw mode and the terminal left unusable.
pub fn install_panic_handler() {
    let old_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |pinfo| {
        if let Err(err) = emergency_restore() {
            eprintln!("failed to restore terminal: {err}");
        }
        old_hook(pinfo);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_writer_buffers_until_flush() {
        let mut writer = FrameWriter::new();
        writer.write_all(b"abc").unwrap();
        writer.write_all(b"def").unwrap();
        assert_eq!(writer.pending(), 6);
        writer.flush().unwrap();
        assert_eq!(writer.pending(), 0);
    }
}
