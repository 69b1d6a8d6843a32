//! Error type shared by the whole crate.

use std::io;
use thiserror::Error;

/// Everything that can go wrong in `pixterm`.
///
/// Malformed terminal input is not represented here: the input decoder drops
/// such bytes silently instead of surfacing them as errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Writing to the terminal or reading from stdin failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// A frame could not be formatted.
    #[error("failed to format frame")]
    Format(#[from] std::fmt::Error),

    /// The image collaborator could not decode a file.
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    /// The font collaborator rejected the font data.
    #[error("failed to load font: {0}")]
    Font(#[from] ab_glyph::InvalidFont),

    /// A color name that does not resolve to an RGB triple.
    #[error("unknown color `{0}`")]
    UnknownColor(String),

    /// An anchor key passed to [`Anchor::from_key`](crate::util::region::Anchor::from_key)
    /// that names no anchor.
    #[error("invalid anchor key `{0}`")]
    InvalidAnchor(String),

    /// The configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// An event recording could not be (de)serialized.
    #[error("event recording failed: {0}")]
    Recording(#[from] bincode::Error),

    /// The background input worker panicked before it could be joined.
    #[error("input worker panicked")]
    WorkerPanicked,
}

/// Shorthand for `Result<T, pixterm::Error>`.
pub type Result<T> = std::result::Result<T, Error>;
