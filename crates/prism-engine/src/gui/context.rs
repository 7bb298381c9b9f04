use std::borrow::Cow;
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::coords::{Rect, Vec2};
use crate::input::{InputFrame, InputState, MouseButton};
use crate::paint::Color;
use crate::scene::{DrawList, ZIndex};
use crate::text::{FontId, FontSystem};

use super::{GuiConfig, GuiStyle};

const Z_PANEL: ZIndex = ZIndex(0);
const Z_WIDGET: ZIndex = ZIndex(1);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(super) struct WidgetId(u64);

/// Pointer interaction with one widget this frame.
#[derive(Debug, Copy, Clone, Default)]
pub(super) struct Response {
    pub hovered: bool,
    /// Press started on this widget this frame.
    pub clicked: bool,
    /// Widget owns the pointer (pressed on it and not yet released).
    pub dragging: bool,
}

/// Immediate-mode GUI state carried between frames.
pub struct Gui {
    style: GuiStyle,
    fonts: FontSystem,
    font: Option<FontId>,
    draw_list: DrawList,

    pointer: Option<Vec2>,
    pointer_delta: Vec2,
    pressed: bool,
    down: bool,
    active: Option<WidgetId>,

    /// Panel rects laid out this frame.
    panels: Vec<Rect>,
}

impl Gui {
    /// Creates the GUI and loads its font.
    ///
    /// A missing or unreadable font is not fatal: widgets still work but
    /// their text is not drawn.
    pub fn new(config: GuiConfig) -> Self {
        let mut fonts = FontSystem::new();
        let font = match config.resolve_font() {
            Some(path) => match fonts.load_font_file(&path) {
                Ok(id) => {
                    log::info!("gui font: {}", path.display());
                    Some(id)
                }
                Err(e) => {
                    log::warn!("{e}; gui text disabled");
                    None
                }
            },
            None => {
                log::warn!(
                    "no gui font found (set {} or pass --font); gui text disabled",
                    super::FONT_ENV_VAR
                );
                None
            }
        };

        Self::with_fonts(config.style, fonts, font)
    }

    pub(super) fn with_fonts(style: GuiStyle, fonts: FontSystem, font: Option<FontId>) -> Self {
        Self {
            style,
            fonts,
            font,
            draw_list: DrawList::new(),
            pointer: None,
            pointer_delta: Vec2::zero(),
            pressed: false,
            down: false,
            active: None,
            panels: Vec::new(),
        }
    }

    pub fn style(&self) -> &GuiStyle {
        &self.style
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Starts a new frame: snapshots pointer state and clears last frame's
    /// draw commands.
    pub fn begin_frame(&mut self, input: &InputState, frame: &InputFrame) {
        let pointer = input.pointer_pos.map(Vec2::from);
        self.pointer_delta = match (self.pointer, pointer) {
            (Some(old), Some(new)) => new - old,
            _ => Vec2::zero(),
        };
        self.pointer = pointer;
        self.pressed = frame.button_pressed(MouseButton::Left);
        self.down = input.button_down(MouseButton::Left) || self.pressed;
        if !self.down {
            self.active = None;
        }

        self.draw_list.clear();
        self.panels.clear();
    }

    /// True while the pointer is over a panel or a widget is being dragged;
    /// the scene should ignore pointer input then.
    pub fn wants_pointer(&self) -> bool {
        if self.active.is_some() {
            return true;
        }
        match self.pointer {
            Some(p) => self.panels.iter().any(|r| r.contains(p)),
            None => false,
        }
    }

    /// Lays out a titled panel with its top-left corner at `origin`.
    pub fn panel<R>(&mut self, title: &str, origin: Vec2, width: f32, add_contents: impl FnOnce(&mut Ui<'_>) -> R) -> R {
        let pad = self.style.padding;
        let title_h = self.row_height();

        let mut ui = Ui {
            id_seed: hash_of(&title),
            x: origin.x + pad,
            width: (width - 2.0 * pad).max(0.0),
            cursor_y: origin.y + title_h + pad,
            gui: self,
        };

        ui.gui.draw_list.push_clip(Rect::new(origin.x, origin.y, width, f32::MAX / 4.0));
        let out = add_contents(&mut ui);
        let bottom = ui.cursor_y - ui.gui.style.spacing + pad;
        ui.gui.draw_list.pop_clip();

        let panel = Rect::new(origin.x, origin.y, width, (bottom - origin.y).max(title_h));
        let title_bar = Rect::new(origin.x, origin.y, width, title_h);
        self.draw_list.push_rect(Z_PANEL, panel, self.style.panel_bg);
        self.draw_list.push_rect(Z_PANEL, title_bar, self.style.title_bg);
        let title_pos = Vec2::new(origin.x + pad, origin.y + self.text_inset(title_h));
        self.push_text(title_pos, title, self.style.text, width - 2.0 * pad);

        self.panels.push(panel);
        out
    }

    pub(crate) fn draw_parts(&mut self) -> (&mut DrawList, &FontSystem) {
        (&mut self.draw_list, &self.fonts)
    }

    fn row_height(&self) -> f32 {
        (self.style.font_size * 1.2 + self.style.padding).round()
    }

    fn text_inset(&self, row_h: f32) -> f32 {
        ((row_h - self.style.font_size * 1.2) * 0.5).max(0.0)
    }

    /// Queues `text`, ellipsized to `max_width` logical pixels.
    fn push_text(&mut self, pos: Vec2, text: &str, color: Color, max_width: f32) {
        let Some(font) = self.font else { return };
        let size = self.style.font_size;
        let fonts = &self.fonts;
        let fitted = fit_text(text, max_width, |t| fonts.measure_text(t, font, size).x);
        if !fitted.is_empty() {
            self.draw_list.push_text(Z_WIDGET, fitted, font, size, color, pos);
        }
    }
}

/// Layout cursor handed to panel contents.
pub struct Ui<'g> {
    gui: &'g mut Gui,
    id_seed: u64,
    x: f32,
    width: f32,
    cursor_y: f32,
}

impl<'g> Ui<'g> {
    pub fn style(&self) -> &GuiStyle {
        &self.gui.style
    }

    /// Vertical gap before the next widget.
    pub fn add_space(&mut self, amount: f32) {
        self.cursor_y += amount;
    }

    pub(super) fn id(&self, label: &str, part: u32) -> WidgetId {
        let mut h = DefaultHasher::new();
        self.id_seed.hash(&mut h);
        label.hash(&mut h);
        part.hash(&mut h);
        WidgetId(h.finish())
    }

    /// Reserves the next full-width row.
    pub(super) fn allocate_row(&mut self) -> Rect {
        let h = self.gui.row_height();
        let row = Rect::new(self.x, self.cursor_y, self.width, h);
        self.cursor_y += h + self.gui.style.spacing;
        row
    }

    /// Splits a row into label and control parts.
    pub(super) fn split_row(&self, row: Rect) -> (Rect, Rect) {
        let label_w = (row.size.x * self.gui.style.label_fraction).round();
        let label = Rect::new(row.origin.x, row.origin.y, label_w, row.size.y);
        let control = Rect::new(row.origin.x + label_w, row.origin.y, row.size.x - label_w, row.size.y);
        (label, control)
    }

    pub(super) fn interact(&mut self, id: WidgetId, rect: Rect) -> Response {
        let gui = &mut *self.gui;
        let hovered = gui.pointer.is_some_and(|p| rect.contains(p));
        let clicked = gui.pressed && hovered && gui.active.is_none();
        if clicked {
            gui.active = Some(id);
        }
        Response {
            hovered,
            clicked,
            dragging: gui.down && gui.active == Some(id),
        }
    }

    pub(super) fn pointer(&self) -> Option<Vec2> {
        self.gui.pointer
    }

    pub(super) fn pointer_delta(&self) -> Vec2 {
        self.gui.pointer_delta
    }

    pub(super) fn fill(&mut self, rect: Rect, color: Color) {
        self.gui.draw_list.push_rect(Z_WIDGET, rect, color);
    }

    /// Text vertically centred in `row`, starting at `x`.
    pub(super) fn text_in(&mut self, row: Rect, x: f32, text: &str) {
        let y = row.origin.y + self.gui.text_inset(row.size.y);
        let color = self.gui.style.text;
        let max_width = row.max().x - x - self.gui.style.padding * 0.5;
        self.gui.push_text(Vec2::new(x, y), text, color, max_width);
    }
}

const ELLIPSIS: char = '\u{2026}';

/// `text` cut at a char boundary with a trailing ellipsis so that `measure`
/// reports at most `max_width`. Empty when not even the ellipsis fits.
fn fit_text<'t>(text: &'t str, max_width: f32, measure: impl Fn(&str) -> f32) -> Cow<'t, str> {
    if measure(text) <= max_width {
        return Cow::Borrowed(text);
    }

    let mut end = text.len();
    let mut candidate = String::with_capacity(text.len() + ELLIPSIS.len_utf8());
    while let Some((cut, _)) = text[..end].char_indices().next_back() {
        end = cut;
        candidate.clear();
        candidate.push_str(text[..end].trim_end());
        candidate.push(ELLIPSIS);
        if measure(&candidate) <= max_width {
            return Cow::Owned(candidate);
        }
    }
    Cow::Borrowed("")
}

fn hash_of(v: &impl Hash) -> u64 {
    let mut h = DefaultHasher::new();
    v.hash(&mut h);
    h.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ten pixels per char.
    fn mono(text: &str) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    #[test]
    fn fitting_text_is_borrowed_unchanged() {
        assert!(matches!(fit_text("Hardness", 80.0, mono), Cow::Borrowed("Hardness")));
    }

    #[test]
    fn long_text_is_ellipsized_to_width() {
        let fitted = fit_text("Direction #0", 60.0, mono);
        assert_eq!(fitted, "Direc\u{2026}");
        assert!(mono(&fitted) <= 60.0);
    }

    #[test]
    fn trailing_space_before_ellipsis_is_dropped() {
        assert_eq!(fit_text("K Diffuse", 30.0, mono), "K\u{2026}");
    }

    #[test]
    fn multibyte_text_is_cut_on_char_boundaries() {
        assert_eq!(fit_text("ÄÖÜßé", 30.0, mono), "ÄÖ\u{2026}");
    }

    #[test]
    fn nothing_fits_in_zero_width() {
        assert_eq!(fit_text("abc", 0.0, mono), "");
        assert_eq!(fit_text("abc", 10.0, mono), "\u{2026}");
    }
}
