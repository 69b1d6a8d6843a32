#![doc = include_str!("../README.md")]

pub mod config;
pub mod draw;
pub mod error;
pub mod input;
pub mod rendering;
pub mod terminal;
pub mod transform;
pub mod util;

pub use config::{DisplayConfig, SizeFlags};
pub use error::{Error, Result};
pub use input::{Event, Key, KeyPhase, KeyboardEvent, MouseEvent, MouseKind};
pub use rendering::color::Color;
pub use rendering::display::Display;
pub use rendering::surface::{Canvas, Surface};
pub use rendering::text::Font;
pub use terminal::install_panic_handler;
pub use util::region::{Anchor, Region};
