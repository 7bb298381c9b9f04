use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::text::FontId;

use super::{DrawCmd, RectCmd, TextCmd};

/// Z-layer. Higher values paint on top.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

/// A single draw item: paint-order key + command + clip rect.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub z: ZIndex,
    pub order: u32,
    pub cmd: DrawCmd,
    /// Scissor rect in logical pixels. `None` = draw everywhere.
    pub clip_rect: Option<Rect>,
}

/// Recorded draw stream for a frame.
///
/// Paint-order iteration reuses an internal index buffer, so steady-state
/// frames do not allocate.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,

    /// Top is the current effective clip, already intersected with parents.
    clip_stack: Vec<Rect>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items and the clip stack, keeping capacity.
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_dirty = true;
        self.sorted_indices.clear();
        self.clip_stack.clear();
    }

    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pushes a command; it inherits the current clip rect.
    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.items.push(DrawItem {
            z,
            order,
            cmd,
            clip_rect: self.clip_stack.last().copied(),
        });

        self.sorted_dirty = true;
    }

    pub fn push_rect(&mut self, z: ZIndex, rect: Rect, color: Color) {
        self.push(z, DrawCmd::Rect(RectCmd { rect, color }));
    }

    pub fn push_text(
        &mut self,
        z: ZIndex,
        text: impl Into<String>,
        font: FontId,
        size: f32,
        color: Color,
        origin: Vec2,
    ) {
        self.push(
            z,
            DrawCmd::Text(TextCmd {
                text: text.into(),
                font,
                size,
                color,
                origin,
            }),
        );
    }

    /// Begins a scissor region, intersected with the enclosing one.
    ///
    /// Calls must be balanced with [`DrawList::pop_clip`].
    pub fn push_clip(&mut self, rect: Rect) {
        let effective = match self.clip_stack.last() {
            None => rect,
            // No overlap → zero-area clip; renderers skip those draws.
            Some(&parent) => parent.intersect(rect).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0)),
        };
        self.clip_stack.push(effective);
    }

    pub fn pop_clip(&mut self) {
        debug_assert!(!self.clip_stack.is_empty(), "pop_clip called without matching push_clip");
        self.clip_stack.pop();
    }

    /// Iterates items back-to-front.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }

        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());

        let items = &self.items;
        self.sorted_indices
            .sort_by_key(|&i| (items[i].z, items[i].order));

        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_at(x: f32) -> Rect {
        Rect::new(x, 0.0, 1.0, 1.0)
    }

    fn xs(list: &mut DrawList) -> Vec<f32> {
        list.iter_in_paint_order()
            .map(|item| match &item.cmd {
                DrawCmd::Rect(r) => r.rect.origin.x,
                DrawCmd::Text(t) => t.origin.x,
            })
            .collect()
    }

    #[test]
    fn paint_order_is_z_then_insertion() {
        let mut list = DrawList::new();
        list.push_rect(ZIndex(1), rect_at(0.0), Color::WHITE);
        list.push_rect(ZIndex(0), rect_at(1.0), Color::WHITE);
        list.push_rect(ZIndex(1), rect_at(2.0), Color::WHITE);
        list.push_rect(ZIndex(0), rect_at(3.0), Color::WHITE);

        assert_eq!(xs(&mut list), vec![1.0, 3.0, 0.0, 2.0]);
    }

    #[test]
    fn nested_clips_intersect() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        list.push_clip(Rect::new(5.0, 5.0, 10.0, 10.0));
        list.push_rect(ZIndex(0), rect_at(0.0), Color::WHITE);
        list.pop_clip();
        list.push_rect(ZIndex(0), rect_at(1.0), Color::WHITE);
        list.pop_clip();
        list.push_rect(ZIndex(0), rect_at(2.0), Color::WHITE);

        let clips: Vec<_> = list.items().iter().map(|i| i.clip_rect).collect();
        assert_eq!(
            clips,
            vec![
                Some(Rect::new(5.0, 5.0, 5.0, 5.0)),
                Some(Rect::new(0.0, 0.0, 10.0, 10.0)),
                None,
            ]
        );
    }

    #[test]
    fn disjoint_clip_becomes_empty() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0.0, 0.0, 5.0, 5.0));
        list.push_clip(Rect::new(20.0, 20.0, 5.0, 5.0));
        list.push_rect(ZIndex(0), rect_at(0.0), Color::WHITE);

        assert!(list.items()[0].clip_rect.is_some_and(|r| r.is_empty()));
    }

    #[test]
    fn clear_resets_everything() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0.0, 0.0, 5.0, 5.0));
        list.push_rect(ZIndex(0), rect_at(0.0), Color::WHITE);
        list.clear();
        list.push_rect(ZIndex(0), rect_at(1.0), Color::WHITE);

        assert_eq!(list.items().len(), 1);
        assert_eq!(list.items()[0].clip_rect, None);
        assert_eq!(list.items()[0].order, 0);
    }
}
