//! Terminal input.
//!
//! Input is read by a background [`InputWorker`](worker::InputWorker) that owns stdin while the
//! display is open:
//!
//! *   [`decoder`]: byte-level state machine turning raw terminal input into keys, mouse reports
//!     and focus changes.
//! *   [`context`]: the event queue and pressed-key table shared between the worker and the
//!     [`Display`](crate::rendering::display::Display).
//! *   [`worker`]: the polling loop, terminal mode guard and thread handle.
//! *   [`recorder`]: records drained events to disk and replays them later.

pub mod context;
pub mod decoder;
pub mod keys;
pub mod recorder;
pub mod worker;

pub use keys::{Key, Symbol};
use serde::{Deserialize, Serialize};

/// An input event, as returned by [`Display::events`](crate::rendering::display::Display::events).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    Keyboard(KeyboardEvent),
    Mouse(MouseEvent),
}

/// Whether a key went down or up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyPhase {
    Down,
    Up,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyboardEvent {
    pub key: Key,
    pub phase: KeyPhase,
}

impl KeyboardEvent {
    pub fn down(key: Key) -> Self {
        Self {
            key,
            phase: KeyPhase::Down,
        }
    }

    pub fn up(key: Key) -> Self {
        Self {
            key,
            phase: KeyPhase::Up,
        }
    }
}

/// Kind of a mouse report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseKind {
    LeftMouseDown,
    LeftMouseUp,
    MouseMove,
    ScrollDown,
    ScrollUp,
    ScrollLeft,
    ScrollRight,
}

impl MouseKind {
    /// Maps the button code of an X10 mouse report (first byte minus 32).
    ///
    /// Codes without an entry yield `None` and the report is dropped.
    pub fn from_code(code: u8) -> Option<MouseKind> {
        let kind = match code {
            0 => MouseKind::LeftMouseDown,
            3 => MouseKind::LeftMouseUp,
            32 | 35 => MouseKind::MouseMove,
            64 => MouseKind::ScrollDown,
            65 => MouseKind::ScrollUp,
            66 => MouseKind::ScrollLeft,
            67 => MouseKind::ScrollRight,
            _ => return None,
        };
        Some(kind)
    }
}

/// A mouse report.
///
/// `pos` is `(column, pixel_row)`: the column is the terminal column, the row is the terminal
/// row doubled so it addresses the upper pixel of the reported cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MouseEvent {
    pub kind: MouseKind,
    pub pos: (i64, i64),
}

impl From<KeyboardEvent> for Event {
    fn from(event: KeyboardEvent) -> Self {
        Event::Keyboard(event)
    }
}

impl From<MouseEvent> for Event {
    fn from(event: MouseEvent) -> Self {
        Event::Mouse(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_table() {
        assert_eq!(MouseKind::from_code(0), Some(MouseKind::LeftMouseDown));
        assert_eq!(MouseKind::from_code(3), Some(MouseKind::LeftMouseUp));
        assert_eq!(MouseKind::from_code(32), Some(MouseKind::MouseMove));
        assert_eq!(MouseKind::from_code(35), Some(MouseKind::MouseMove));
        assert_eq!(MouseKind::from_code(66), Some(MouseKind::ScrollLeft));
        assert_eq!(MouseKind::from_code(1), None);
        assert_eq!(MouseKind::from_code(2), None);
    }
}
