use crate::render::overlay::{RectRenderer, TextRenderer};
use crate::render::{RenderCtx, RenderTarget};

use super::Gui;

/// Draws a [`Gui`]'s recorded frame: rects first, then text.
#[derive(Default)]
pub struct GuiRenderer {
    rects: RectRenderer,
    text: TextRenderer,
}

impl GuiRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, gui: &mut Gui) {
        let (draw_list, fonts) = gui.draw_parts();
        if draw_list.is_empty() {
            return;
        }
        self.rects.render(ctx, target, draw_list);
        if !fonts.is_empty() {
            self.text.render(ctx, target, draw_list, fonts);
        }
    }
}
