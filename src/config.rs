//! Display and input configuration.
//!
//! A [`DisplayConfig`] can be built in code:
//!
//! ```rust
//! use pixterm::config::{DisplayConfig, SizeFlags};
//!
//! let config = DisplayConfig::new(120, 60).with_flags(SizeFlags::FULL_WIDTH);
//! assert_eq!(config.resolve_size(100, 40), (99, 60));
//! ```
//!
//! or loaded from TOML, where every field is optional:
//!
//! ```toml
//! width = 160
//! height = 90
//! flags = "FULL_HEIGHT"
//! poll_interval_ms = 50
//! key_release_ms = 400
//! ```

use crate::error::Result;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

bitflags! {
    /// How the logical display size follows the terminal size.
    ///
    /// The flags are independent and can be combined; `FULLSCREEN` is simply both.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct SizeFlags: u8 {
        /// Width follows the terminal width.
        const FULL_WIDTH = 1 << 0;
        /// Height follows the terminal height.
        const FULL_HEIGHT = 1 << 1;
        /// Both width and height follow the terminal.
        const FULLSCREEN = Self::FULL_WIDTH.bits() | Self::FULL_HEIGHT.bits();
    }
}

/// Configuration of a [`Display`](crate::rendering::display::Display) and its input worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Logical width in pixels (= terminal columns).
    pub width: usize,
    /// Logical height in pixels (= terminal rows * 2).
    pub height: usize,
    pub flags: SizeFlags,
    /// Columns left free when the width follows the terminal.
    pub margin_cols: usize,
    /// Pixel rows left free when the height follows the terminal.
    pub margin_rows: usize,
    /// Upper bound on how long the input worker waits for a byte before checking its stop flag.
    pub poll_interval_ms: u64,
    /// How long a lone `ESC` waits for the rest of an escape sequence.
    pub escape_timeout_ms: u64,
    pub mouse_tracking: bool,
    /// Ask the terminal to report focus changes (`ESC [ I` / `ESC [ O`).
    pub focus_reporting: bool,
    /// Release a key (and queue a key-up event) when it has not repeated for this long.
    /// `None` keeps keys pressed until focus is lost.
    pub key_release_ms: Option<u64>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 48,
            flags: SizeFlags::empty(),
            margin_cols: 1,
            margin_rows: 3,
            poll_interval_ms: 100,
            escape_timeout_ms: 10,
            mouse_tracking: true,
            focus_reporting: true,
            key_release_ms: None,
        }
    }
}

impl DisplayConfig {
    /// A configuration with a fixed logical size and default everything else.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// A configuration that fills the terminal.
    pub fn fullscreen() -> Self {
        Self::default().with_flags(SizeFlags::FULLSCREEN)
    }

    pub fn with_flags(mut self, flags: SizeFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn with_key_release(mut self, timeout: Option<Duration>) -> Self {
        self.key_release_ms = timeout.map(|t| t.as_millis() as u64);
        self
    }

    pub fn with_mouse_tracking(mut self, enabled: bool) -> Self {
        self.mouse_tracking = enabled;
        self
    }

    /// Parses a TOML document. Missing fields take their default value.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// The logical size for a terminal of `cols x rows` character cells.
    pub fn resolve_size(&self, cols: u16, rows: u16) -> (usize, usize) {
        let full_width = usize::from(cols).saturating_sub(self.margin_cols);
        let full_height = (usize::from(rows) * 2).saturating_sub(self.margin_rows);
        let width = if self.flags.contains(SizeFlags::FULL_WIDTH) {
            full_width
        } else {
            self.width
        };
        let height = if self.flags.contains(SizeFlags::FULL_HEIGHT) {
            full_height
        } else {
            self.height
        };
        (width, height)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn escape_timeout(&self) -> Duration {
        Duration::from_millis(self.escape_timeout_ms)
    }

    pub fn key_release(&self) -> Option<Duration> {
        self.key_release_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_flags_are_independent() {
        let base = DisplayConfig::new(30, 20);
        assert_eq!(base.resolve_size(100, 40), (30, 20));
        assert_eq!(
            base.clone().with_flags(SizeFlags::FULL_WIDTH).resolve_size(100, 40),
            (99, 20)
        );
        assert_eq!(
            base.clone().with_flags(SizeFlags::FULL_HEIGHT).resolve_size(100, 40),
            (30, 77)
        );
        assert_eq!(
            base.with_flags(SizeFlags::FULLSCREEN).resolve_size(100, 40),
            (99, 77)
        );
    }

    #[test]
    fn test_flags_compose() {
        let config = DisplayConfig::new(1, 1)
            .with_flags(SizeFlags::FULL_WIDTH)
            .with_flags(SizeFlags::FULL_HEIGHT);
        assert_eq!(config.flags, SizeFlags::FULLSCREEN);
    }

    #[test]
    fn test_from_toml() {
        let config = DisplayConfig::from_toml_str(
            r#"
            width = 160
            flags = "FULL_HEIGHT"
            key_release_ms = 400
            "#,
        )
        .unwrap();
        assert_eq!(config.width, 160);
        assert_eq!(config.height, 48);
        assert_eq!(config.flags, SizeFlags::FULL_HEIGHT);
        assert_eq!(config.key_release(), Some(Duration::from_millis(400)));
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_bad_toml_is_a_config_error() {
        assert!(matches!(
            DisplayConfig::from_toml_str("width = \"wide\""),
            Err(crate::error::Error::Config(_))
        ));
    }
}
