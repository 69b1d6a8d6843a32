//! Raw terminal byte decoder.
//!
//! [`Decoder`] is fed one byte at a time and yields a [`Decoded`] value whenever a complete key,
//! mouse report or focus report has been read. Recognized sequences:
//!
//! | bytes                      | result                              |
//! |----------------------------|-------------------------------------|
//! | `ESC [ M b x y`            | mouse report                        |
//! | `ESC [ A`..`D`, `ESC O A`..`D` | arrow keys                      |
//! | `ESC [ I` / `ESC [ O`      | focus gained / lost                 |
//! | `ESC 0x7F`                 | backspace                           |
//! | `ESC` followed by silence  | escape (see [`Decoder::flush_idle`])|
//! | other partial sequence followed by silence | dropped           |
//! | anything else              | UTF-8, classified by [`Key::from_char`] |
//!
//! Malformed or unknown sequences are dropped without an error.

use crate::input::keys::Key;
use crate::input::{MouseEvent, MouseKind};
use smallvec::SmallVec;

const ESC: u8 = 0x1b;
const DEL: u8 = 0x7f;

/// A complete unit of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decoded {
    Key(Key),
    Mouse(MouseEvent),
    FocusGained,
    FocusLost,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum State {
    #[default]
    Ground,
    Escape,
    Csi,
    Ss3,
    Mouse(SmallVec<[u8; 3]>),
    Utf8 {
        buf: SmallVec<[u8; 4]>,
        needed: usize,
    },
}

/// Incremental input decoder.
#[derive(Clone, Debug, Default)]
pub struct Decoder {
    state: State,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no sequence is partially decoded.
    pub fn is_idle(&self) -> bool {
        self.state == State::Ground
    }

    /// Discards any partially decoded sequence.
    pub fn reset(&mut self) {
        self.state = State::Ground;
    }

    /// Called when no byte arrived within the escape timeout.
    ///
    /// A pending lone `ESC` is the escape key. Any other partial sequence is dropped, so the
    /// next byte is decoded from scratch.
    pub fn flush_idle(&mut self) -> Option<Decoded> {
        match std::mem::take(&mut self.state) {
            State::Ground => None,
            State::Escape => Some(Decoded::Key(Key::Escape)),
            stale => {
                log::trace!("dropping incomplete sequence {stale:?}");
                None
            }
        }
    }

    pub fn feed(&mut self, byte: u8) -> Option<Decoded> {
        match std::mem::take(&mut self.state) {
            State::Ground => self.ground(byte),
            State::Escape => match byte {
                b'[' => {
                    self.state = State::Csi;
                    None
                }
                b'O' => {
                    self.state = State::Ss3;
                    None
                }
                DEL => Some(Decoded::Key(Key::Backspace)),
                ESC => {
                    // the first one was a lone escape
                    self.state = State::Escape;
                    Some(Decoded::Key(Key::Escape))
                }
                _ => {
                    log::trace!("dropping unknown escape sequence ESC {byte:#04x}");
                    None
                }
            },
            State::Csi => match byte {
                b'M' => {
                    self.state = State::Mouse(SmallVec::new());
                    None
                }
                b'I' => Some(Decoded::FocusGained),
                b'O' => Some(Decoded::FocusLost),
                _ => arrow(byte).map(Decoded::Key).or_else(|| {
                    log::trace!("dropping unknown sequence ESC [ {byte:#04x}");
                    None
                }),
            },
            State::Ss3 => arrow(byte).map(Decoded::Key).or_else(|| {
                log::trace!("dropping unknown sequence ESC O {byte:#04x}");
                None
            }),
            State::Mouse(mut buf) => {
                buf.push(byte);
                if buf.len() < 3 {
                    self.state = State::Mouse(buf);
                    return None;
                }
                decode_mouse([buf[0], buf[1], buf[2]]).map(Decoded::Mouse)
            }
            State::Utf8 { mut buf, needed } => {
                if byte & 0xc0 != 0x80 {
                    log::trace!("dropping truncated utf-8 sequence {buf:02x?}");
                    return self.ground(byte);
                }
                buf.push(byte);
                if buf.len() < needed {
                    self.state = State::Utf8 { buf, needed };
                    return None;
                }
                match std::str::from_utf8(&buf).ok().and_then(|s| s.chars().next()) {
                    Some(c) => Key::from_char(c).map(Decoded::Key),
                    None => {
                        log::trace!("dropping invalid utf-8 sequence {buf:02x?}");
                        None
                    }
                }
            }
        }
    }

    fn ground(&mut self, byte: u8) -> Option<Decoded> {
        let needed = match byte {
            ESC => {
                self.state = State::Escape;
                return None;
            }
            0x00..=0x7f => {
                return Key::from_char(char::from(byte)).map(Decoded::Key);
            }
            0xc2..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf4 => 4,
            _ => {
                log::trace!("dropping invalid utf-8 lead byte {byte:#04x}");
                return None;
            }
        };
        let mut buf = SmallVec::new();
        buf.push(byte);
        self.state = State::Utf8 { buf, needed };
        None
    }
}

fn arrow(byte: u8) -> Option<Key> {
    match byte {
        b'A' => Some(Key::Up),
        b'B' => Some(Key::Down),
        b'C' => Some(Key::Right),
        b'D' => Some(Key::Left),
        _ => None,
    }
}

/// Decodes the three payload bytes of an X10 mouse report.
///
/// Coordinates are 1-based and offset by 32 on the wire. The row is doubled to address pixels.
fn decode_mouse([code, col, row]: [u8; 3]) -> Option<MouseEvent> {
    let kind = code.checked_sub(32).and_then(MouseKind::from_code);
    let (Some(kind), Some(col), Some(row)) = (kind, col.checked_sub(33), row.checked_sub(33))
    else {
        log::trace!("dropping mouse report {code:#04x} {col:#04x} {row:#04x}");
        return None;
    };
    Some(MouseEvent {
        kind,
        pos: (i64::from(col), i64::from(row) * 2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::keys::Symbol;

    fn decode_all(bytes: &[u8]) -> Vec<Decoded> {
        let mut decoder = Decoder::new();
        bytes.iter().filter_map(|b| decoder.feed(*b)).collect()
    }

    #[test]
    fn test_mouse_report() {
        assert_eq!(
            decode_all(&[0x1b, b'[', b'M', 0x20, 0x21, 0x22]),
            vec![Decoded::Mouse(MouseEvent {
                kind: MouseKind::LeftMouseDown,
                pos: (0, 2),
            })]
        );
    }

    #[test]
    fn test_unknown_mouse_button_is_dropped() {
        assert!(decode_all(&[0x1b, b'[', b'M', 0x21, 0x21, 0x21]).is_empty());
        // and the decoder is usable afterwards
        assert_eq!(
            decode_all(&[0x1b, b'[', b'M', 0x21, 0x21, 0x21, b'a']),
            vec![Decoded::Key(Key::Char('a'))]
        );
    }

    #[test]
    fn test_arrows() {
        assert_eq!(
            decode_all(b"\x1b[A\x1b[B\x1bOC\x1bOD"),
            vec![
                Decoded::Key(Key::Up),
                Decoded::Key(Key::Down),
                Decoded::Key(Key::Right),
                Decoded::Key(Key::Left),
            ]
        );
    }

    #[test]
    fn test_focus_reports() {
        assert_eq!(
            decode_all(b"\x1b[O\x1b[I"),
            vec![Decoded::FocusLost, Decoded::FocusGained]
        );
    }

    #[test]
    fn test_escape_variants() {
        assert_eq!(decode_all(&[0x1b, 0x7f]), vec![Decoded::Key(Key::Backspace)]);
        assert!(decode_all(b"\x1bx").is_empty());
        assert!(decode_all(b"\x1b[Z").is_empty());
    }

    #[test]
    fn test_lone_escape_needs_idle_flush() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.feed(0x1b), None);
        assert!(!decoder.is_idle());
        assert_eq!(decoder.flush_idle(), Some(Decoded::Key(Key::Escape)));
        assert!(decoder.is_idle());
        assert_eq!(decoder.flush_idle(), None);
    }

    #[test]
    fn test_idle_flush_drops_incomplete_sequences() {
        let partials: [&[u8]; 5] = [b"\x1b[", b"\x1bO", b"\x1b[M", b"\x1b[M\x20\x21", &[0xe2, 0x82]];
        for partial in partials {
            let mut decoder = Decoder::new();
            for &byte in partial {
                assert_eq!(decoder.feed(byte), None);
            }
            assert_eq!(decoder.flush_idle(), None, "{partial:02x?}");
            assert!(decoder.is_idle());
            assert_eq!(decoder.feed(b'a'), Some(Decoded::Key(Key::Char('a'))));
        }
    }

    #[test]
    fn test_double_escape() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.feed(0x1b), None);
        assert_eq!(decoder.feed(0x1b), Some(Decoded::Key(Key::Escape)));
        assert_eq!(decoder.feed(b'['), None);
        assert_eq!(decoder.feed(b'A'), Some(Decoded::Key(Key::Up)));
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(
            decode_all(b"a#\t\r \x03"),
            vec![
                Decoded::Key(Key::Char('a')),
                Decoded::Key(Key::Symbol(Symbol::Hashtag)),
                Decoded::Key(Key::Tab),
                Decoded::Key(Key::Return),
                Decoded::Key(Key::Space),
                Decoded::Key(Key::Ctrl('c')),
            ]
        );
    }

    #[test]
    fn test_multibyte_utf8() {
        assert_eq!(
            decode_all("é€".as_bytes()),
            vec![Decoded::Key(Key::Char('é')), Decoded::Key(Key::Char('€'))]
        );
    }

    #[test]
    fn test_invalid_utf8_is_dropped() {
        assert!(decode_all(&[0xff, 0xc0]).is_empty());
        // a truncated sequence gives way to the next valid byte
        assert_eq!(decode_all(&[0xc3, b'b']), vec![Decoded::Key(Key::Char('b'))]);
        // surrogates are rejected by from_utf8
        assert!(decode_all(&[0xed, 0xa0, 0x80]).is_empty());
    }
}
