//! Coordinate and geometry types for the 2D overlay.
//!
//! Canonical CPU space: logical pixels, origin top-left, +X right, +Y down.
//! Overlay renderers convert to NDC in shaders using a viewport uniform.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
