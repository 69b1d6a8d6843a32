//! Key identities.
//!
//! Every key has a stable mnemonic name of the form `KEY_<NAME>` (see [`Key::name`]), which is
//! what the pressed-key table and log output use.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A decoded key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    /// A printable character that is neither whitespace nor one of the [`Symbol`]s.
    Char(char),
    /// `Ctrl` plus a letter, stored in lowercase.
    Ctrl(char),
    Up,
    Down,
    Left,
    Right,
    Escape,
    Backspace,
    Tab,
    Return,
    Space,
    Symbol(Symbol),
}

impl Key {
    /// Classifies a single decoded character.
    ///
    /// Returns `None` for control characters that have no key, e.g. `NUL`.
    pub fn from_char(c: char) -> Option<Key> {
        let key = match c {
            '\t' => Key::Tab,
            '\r' | '\n' => Key::Return,
            '\x7f' => Key::Backspace,
            ' ' => Key::Space,
            '\x1b' => Key::Escape,
            // Ctrl-A ..= Ctrl-Z, minus the ones taken by Tab and Return
            '\x01'..='\x1a' => Key::Ctrl((b'a' + (c as u8 - 1)) as char),
            c if c.is_control() => return None,
            c => match Symbol::from_char(c) {
                Some(symbol) => Key::Symbol(symbol),
                None => Key::Char(c),
            },
        };
        Some(key)
    }

    /// The mnemonic name, e.g. `KEY_UP`, `KEY_a`, `KEY_HASHTAG` or `KEY_CTRL_C`.
    pub fn name(&self) -> String {
        match self {
            Key::Char(c) => format!("KEY_{c}"),
            Key::Ctrl(c) => format!("KEY_CTRL_{}", c.to_ascii_uppercase()),
            Key::Up => "KEY_UP".to_string(),
            Key::Down => "KEY_DOWN".to_string(),
            Key::Left => "KEY_LEFT".to_string(),
            Key::Right => "KEY_RIGHT".to_string(),
            Key::Escape => "KEY_ESCAPE".to_string(),
            Key::Backspace => "KEY_BACKSPACE".to_string(),
            Key::Tab => "KEY_TAB".to_string(),
            Key::Return => "KEY_RETURN".to_string(),
            Key::Space => "KEY_SPACE".to_string(),
            Key::Symbol(symbol) => format!("KEY_{}", symbol.name()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

macro_rules! symbols {
    ($($variant:ident => $c:literal, $name:literal;)*) => {
        /// Punctuation keys, each with its own mnemonic.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Symbol {
            $($variant,)*
        }

        impl Symbol {
            pub const ALL: &'static [Symbol] = &[$(Symbol::$variant,)*];

            pub fn from_char(c: char) -> Option<Symbol> {
                match c {
                    $($c => Some(Symbol::$variant),)*
                    _ => None,
                }
            }

            pub fn as_char(self) -> char {
                match self {
                    $(Symbol::$variant => $c,)*
                }
            }

            /// Upper snake case name without the `KEY_` prefix.
            pub fn name(self) -> &'static str {
                match self {
                    $(Symbol::$variant => $name,)*
                }
            }
        }
    };
}

symbols! {
    Backtick => '`', "BACKTICK";
    Tilde => '~', "TILDE";
    Exclamation => '!', "EXCLAMATION";
    At => '@', "AT_SIGN";
    Hashtag => '#', "HASHTAG";
    Dollar => '$', "DOLLAR_SIGN";
    Percent => '%', "PERCENT_SIGN";
    Caret => '^', "EXPONENT";
    Ampersand => '&', "AND";
    Asterisk => '*', "ASTERISK";
    OpenParen => '(', "OPEN_ROUND_BRACKET";
    CloseParen => ')', "CLOSE_ROUND_BRACKET";
    Minus => '-', "MINUS";
    Underscore => '_', "UNDERSCORE";
    Equals => '=', "EQUALS";
    Plus => '+', "PLUS";
    OpenBracket => '[', "OPEN_SQUARE_BRACKET";
    CloseBracket => ']', "CLOSE_SQUARE_BRACKET";
    OpenBrace => '{', "OPEN_BRACE";
    CloseBrace => '}', "CLOSE_BRACE";
    Backslash => '\\', "BACKSLASH";
    Slash => '/', "SLASH";
    Pipe => '|', "VERTICAL_PIPE";
    Semicolon => ';', "SEMICOLON";
    Colon => ':', "COLON";
    Quote => '\'', "SINGLE_QUOTE";
    DoubleQuote => '"', "DOUBLE_QUOTES";
    Comma => ',', "COMMA";
    Dot => '.', "DOT";
    Less => '<', "LEFT_ANGLE_BRACKET";
    Greater => '>', "RIGHT_ANGLE_BRACKET";
    Question => '?', "QUESTION_MARK";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_and_control_keys() {
        assert_eq!(Key::from_char('\t'), Some(Key::Tab));
        assert_eq!(Key::from_char('\r'), Some(Key::Return));
        assert_eq!(Key::from_char('\n'), Some(Key::Return));
        assert_eq!(Key::from_char(' '), Some(Key::Space));
        assert_eq!(Key::from_char('\x7f'), Some(Key::Backspace));
        assert_eq!(Key::from_char('\x03'), Some(Key::Ctrl('c')));
        assert_eq!(Key::from_char('\x00'), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(Key::from_char('#').unwrap().name(), "KEY_HASHTAG");
        assert_eq!(Key::from_char('a').unwrap().name(), "KEY_a");
        assert_eq!(Key::from_char('é').unwrap().name(), "KEY_é");
        assert_eq!(Key::Ctrl('c').to_string(), "KEY_CTRL_C");
        assert_eq!(Key::Up.to_string(), "KEY_UP");
    }

    #[test]
    fn test_symbol_table_is_consistent() {
        assert_eq!(Symbol::ALL.len(), 32);
        for symbol in Symbol::ALL {
            assert_eq!(Symbol::from_char(symbol.as_char()), Some(*symbol));
        }
    }
}
