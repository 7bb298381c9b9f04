//! Colors for the 2D overlay.
//!
//! Overlay colors are linear, premultiplied alpha.

mod color;

pub use color::Color;
