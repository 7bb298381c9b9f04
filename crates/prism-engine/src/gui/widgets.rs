use std::ops::RangeInclusive;

use crate::coords::Rect;
use crate::paint::Color;

use super::context::Ui;

impl Ui<'_> {
    pub fn label(&mut self, text: &str) {
        let row = self.allocate_row();
        self.text_in(row, row.origin.x, text);
    }

    /// Horizontal slider. Click or drag anywhere on the track to set the
    /// value. Returns `true` if `value` changed.
    pub fn slider(&mut self, label: &str, value: &mut f32, range: RangeInclusive<f32>) -> bool {
        let row = self.allocate_row();
        let (label_rect, track) = self.split_row(row);
        let resp = self.interact(self.id(label, 0), track);

        let (lo, hi) = (*range.start(), *range.end());
        let before = *value;
        if resp.dragging {
            if let Some(p) = self.pointer() {
                *value = slider_value_at(track, p.x, lo, hi);
            }
        }

        self.fill(track, self.background(resp.hovered || resp.dragging));
        let t = if hi > lo { ((*value - lo) / (hi - lo)).clamp(0.0, 1.0) } else { 0.0 };
        let accent = self.style().accent;
        self.fill(Rect::new(track.origin.x, track.origin.y, track.size.x * t, track.size.y), accent.mul_alpha(0.6));

        let pad = self.style().padding;
        self.text_in(track, track.origin.x + pad, &format!("{value:.3}"));
        self.text_in(label_rect, label_rect.origin.x, label);

        *value != before
    }

    /// Three drag boxes; horizontal pointer motion while pressed changes a
    /// component by `speed` per logical pixel.
    pub fn drag_vec3(&mut self, label: &str, value: &mut [f32; 3], speed: f32) -> bool {
        self.drag_components(label, value, speed, None)
    }

    /// RGB editor: a swatch plus three drag boxes clamped to `[0, 1]`.
    pub fn color_edit(&mut self, label: &str, rgb: &mut [f32; 3]) -> bool {
        let changed = self.drag_components(label, rgb, 0.005, Some((0.0, 1.0)));

        let row = self.allocate_row();
        let (_, control) = self.split_row(row);
        let swatch = Rect::new(control.origin.x, control.origin.y, control.size.x, control.size.y);
        self.fill(swatch, Color::from_rgb(*rgb));
        changed
    }

    pub fn checkbox(&mut self, label: &str, checked: &mut bool) -> bool {
        let row = self.allocate_row();
        let side = row.size.y;
        let bx = Rect::new(row.origin.x, row.origin.y, side, side);
        let resp = self.interact(self.id(label, 0), row);

        if resp.clicked {
            *checked = !*checked;
        }

        self.fill(bx, self.background(resp.hovered));
        if *checked {
            let accent = self.style().accent;
            self.fill(bx.inset(side * 0.25), accent);
        }
        let pad = self.style().padding;
        self.text_in(row, row.origin.x + side + pad, label);

        resp.clicked
    }

    fn drag_components(
        &mut self,
        label: &str,
        value: &mut [f32; 3],
        speed: f32,
        clamp: Option<(f32, f32)>,
    ) -> bool {
        let row = self.allocate_row();
        let (label_rect, control) = self.split_row(row);
        let gap = self.style().spacing;
        let cell_w = ((control.size.x - 2.0 * gap) / 3.0).max(0.0);
        let dx = self.pointer_delta().x;
        let mut changed = false;

        for (i, v) in value.iter_mut().enumerate() {
            let cell = Rect::new(
                control.origin.x + i as f32 * (cell_w + gap),
                control.origin.y,
                cell_w,
                control.size.y,
            );
            let resp = self.interact(self.id(label, i as u32), cell);

            if resp.dragging && !resp.clicked && dx != 0.0 {
                let mut next = *v + dx * speed;
                if let Some((lo, hi)) = clamp {
                    next = next.clamp(lo, hi);
                }
                changed |= next != *v;
                *v = next;
            }

            self.fill(cell, self.background(resp.hovered || resp.dragging));
            let pad = self.style().padding;
            self.text_in(cell, cell.origin.x + pad, &format!("{v:.2}"));
        }

        self.text_in(label_rect, label_rect.origin.x, label);
        changed
    }

    fn background(&self, highlighted: bool) -> Color {
        if highlighted {
            self.style().widget_hover
        } else {
            self.style().widget_bg
        }
    }
}

/// Value under pointer `x` on a horizontal track, clamped to `[lo, hi]`.
fn slider_value_at(track: Rect, x: f32, lo: f32, hi: f32) -> f32 {
    if track.size.x <= 0.0 {
        return lo;
    }
    let t = ((x - track.origin.x) / track.size.x).clamp(0.0, 1.0);
    lo + t * (hi - lo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::gui::{Gui, GuiStyle};
    use crate::input::{ButtonState, InputEvent, InputFrame, InputState, MouseButton, PointerButtonEvent};
    use crate::text::FontSystem;

    struct Harness {
        gui: Gui,
        input: InputState,
        frame: InputFrame,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                gui: Gui::with_fonts(GuiStyle::default(), FontSystem::new(), None),
                input: InputState::default(),
                frame: InputFrame::default(),
            }
        }

        fn move_to(&mut self, x: f32, y: f32) {
            self.input.apply_event(&mut self.frame, InputEvent::PointerMoved { x, y });
        }

        fn button(&mut self, state: ButtonState) {
            let (x, y) = self.input.pointer_pos.unwrap_or_default();
            self.input.apply_event(
                &mut self.frame,
                InputEvent::PointerButton(PointerButtonEvent { button: MouseButton::Left, state, x, y }),
            );
        }

        fn frame<R>(&mut self, f: impl FnOnce(&mut crate::gui::Ui<'_>) -> R) -> R {
            self.gui.begin_frame(&self.input, &self.frame);
            let out = self.gui.panel("test", Vec2::new(0.0, 0.0), 200.0, f);
            self.frame.clear();
            out
        }
    }

    /// Row rects in layout order for the test panel (first row below the title).
    fn first_row_center_y(h: &Harness) -> f32 {
        let style = h.gui.style();
        let row_h = (style.font_size * 1.2 + style.padding).round();
        row_h + style.padding + row_h * 0.5
    }

    #[test]
    fn slider_value_maps_track() {
        let track = Rect::new(10.0, 0.0, 100.0, 10.0);
        assert_eq!(slider_value_at(track, 10.0, 0.0, 1.0), 0.0);
        assert_eq!(slider_value_at(track, 60.0, 0.0, 1.0), 0.5);
        assert_eq!(slider_value_at(track, 500.0, -1.0, 1.0), 1.0);
        assert_eq!(slider_value_at(Rect::new(0.0, 0.0, 0.0, 1.0), 5.0, 2.0, 3.0), 2.0);
    }

    #[test]
    fn clicking_slider_sets_value_and_captures_pointer() {
        let mut h = Harness::new();
        let y = first_row_center_y(&h);
        // The track spans the right 60% of the 188px content width.
        h.move_to(6.0 + 188.0 - 1.0, y);
        h.button(ButtonState::Pressed);

        let mut v = 0.0;
        let changed = h.frame(|ui| ui.slider("hardness", &mut v, 0.0..=10.0));
        assert!(changed);
        assert!(v > 9.5);
        assert!(h.gui.wants_pointer());
    }

    #[test]
    fn checkbox_toggles_once_per_click() {
        let mut h = Harness::new();
        let y = first_row_center_y(&h);
        h.move_to(20.0, y);
        h.button(ButtonState::Pressed);

        let mut checked = false;
        assert!(h.frame(|ui| ui.checkbox("flag", &mut checked)));
        assert!(checked);
        // Held across frames: no second toggle.
        assert!(!h.frame(|ui| ui.checkbox("flag", &mut checked)));
        assert!(checked);
    }

    #[test]
    fn drag_vec3_moves_only_the_grabbed_component() {
        let mut h = Harness::new();
        let y = first_row_center_y(&h);
        // First cell starts right after the label column.
        h.move_to(90.0, y);
        h.button(ButtonState::Pressed);

        let mut v = [0.0f32; 3];
        h.frame(|ui| ui.drag_vec3("dir", &mut v, 0.1));
        assert_eq!(v, [0.0; 3]);

        h.move_to(100.0, y);
        let changed = h.frame(|ui| ui.drag_vec3("dir", &mut v, 0.1));
        assert!(changed);
        assert!((v[0] - 1.0).abs() < 1e-5);
        assert_eq!(v[1], 0.0);
        assert_eq!(v[2], 0.0);
    }

    #[test]
    fn color_edit_clamps_to_unit_range() {
        let mut h = Harness::new();
        let y = first_row_center_y(&h);
        h.move_to(90.0, y);
        h.button(ButtonState::Pressed);

        let mut rgb = [0.9f32, 0.5, 0.5];
        h.frame(|ui| ui.color_edit("light", &mut rgb));
        h.move_to(1000.0, y);
        h.frame(|ui| ui.color_edit("light", &mut rgb));
        assert_eq!(rgb[0], 1.0);
    }

    #[test]
    fn release_frees_pointer() {
        let mut h = Harness::new();
        let y = first_row_center_y(&h);
        h.move_to(190.0, y);
        h.button(ButtonState::Pressed);
        let mut v = 0.0;
        h.frame(|ui| ui.slider("s", &mut v, 0.0..=1.0));

        h.move_to(500.0, 500.0);
        h.button(ButtonState::Released);
        h.frame(|ui| ui.slider("s", &mut v, 0.0..=1.0));
        assert!(!h.gui.wants_pointer());
    }

    #[test]
    fn pointer_over_panel_is_captured() {
        let mut h = Harness::new();
        h.move_to(5.0, 5.0);
        h.frame(|ui| ui.label("hello"));
        assert!(h.gui.wants_pointer());

        h.move_to(300.0, 5.0);
        h.frame(|ui| ui.label("hello"));
        assert!(!h.gui.wants_pointer());
    }

    #[test]
    fn without_font_no_text_is_recorded() {
        let mut h = Harness::new();
        h.frame(|ui| ui.label("hello"));
        let (list, _) = h.gui.draw_parts();
        assert!(list.items().iter().all(|i| matches!(i.cmd, crate::scene::DrawCmd::Rect(_))));
        assert!(!list.is_empty());
    }
}
