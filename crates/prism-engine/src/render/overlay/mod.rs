//! Screen-space renderers for GUI draw lists.

mod common;
mod rect;
mod text;

pub use rect::RectRenderer;
pub use text::TextRenderer;
