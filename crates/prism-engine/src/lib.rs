//! Prism engine crate.
//!
//! Owns the window/GPU runtime, asset loading and overlay drawing used by the
//! tutorial step binaries. Each step stays a linear `init → frame → exit`
//! program; this crate only removes the repeated boilerplate.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
pub mod text;

pub mod camera;
pub mod gui;
pub mod layout;
pub mod resources;
