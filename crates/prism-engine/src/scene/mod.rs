//! Overlay draw stream.
//!
//! Stores renderer-agnostic rect/text commands with a deterministic paint
//! order (z-index, then insertion order) and an optional clip rect.

mod cmd;
mod list;

pub use cmd::{DrawCmd, RectCmd, TextCmd};
pub use list::{DrawItem, DrawList, ZIndex};
