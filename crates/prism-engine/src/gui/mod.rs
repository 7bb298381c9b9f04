//! Immediate-mode GUI overlay.
//!
//! Widgets are declared every frame inside [`Gui::panel`]; they record
//! rect/text commands into a [`DrawList`](crate::scene::DrawList) that
//! [`GuiRenderer`] draws on top of the scene.

mod config;
mod context;
mod renderer;
mod widgets;

pub use config::{font_candidates, GuiConfig, GuiStyle, FONT_ENV_VAR};
pub use context::{Gui, Ui};
pub use renderer::GuiRenderer;
