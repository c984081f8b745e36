//! Host scrolling surface seen by the controller.
//!
//! The controller never talks to the DOM (or any other scrolling technology)
//! directly. A [`Surface`] reports geometry and mirrors the feed's items; the
//! browser implementation lives in the `web` module, [`FixedRowSurface`] is a
//! headless one with uniform rows.

use crate::viewport::{ItemExtent, ItemId};

/// A visible list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    pub id: ItemId,
    pub text: String,
    /// Rewritten by the forcing engine since the last confirmed stop.
    pub forced: bool,
    /// Shows the verbatim target of a countdown reveal.
    pub revealed: bool,
}

impl RenderedItem {
    pub fn new(id: ItemId, text: String) -> Self {
        Self {
            id,
            text,
            forced: false,
            revealed: false,
        }
    }
}

pub trait Surface {
    /// Vertical center of the viewport, in the coordinates of `item_extents`.
    fn viewport_center(&self) -> f64;

    /// Extents of the currently rendered items, in list order.
    fn item_extents(&self) -> Vec<ItemExtent>;

    /// Content remaining below the bottom edge of the viewport, in px.
    fn tail_distance(&self) -> f64;

    fn append(&mut self, items: &[RenderedItem]);

    /// Replace text and markers of an already rendered item.
    fn rewrite(&mut self, item: &RenderedItem);

    /// Remove every item that comes after `id`.
    fn remove_after(&mut self, id: ItemId);

    fn highlight(&mut self, _id: Option<ItemId>) {}
}

/// Headless surface: rows of equal height stacked from offset 0.
#[derive(Debug, Clone)]
pub struct FixedRowSurface {
    row_height: f64,
    viewport_height: f64,
    scroll_offset: f64,
    rows: Vec<RenderedItem>,
    highlighted: Option<ItemId>,
}

impl FixedRowSurface {
    pub fn new(row_height: f64, viewport_height: f64) -> Self {
        Self {
            row_height,
            viewport_height,
            scroll_offset: 0.0,
            rows: Vec::new(),
            highlighted: None,
        }
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn scroll_to(&mut self, offset: f64) {
        let max = (self.content_height() - self.viewport_height).max(0.0);
        self.scroll_offset = offset.clamp(0.0, max);
    }

    /// Scroll offset that puts row `index` at the viewport center.
    pub fn offset_centering(&self, index: usize) -> f64 {
        index as f64 * self.row_height + self.row_height / 2.0 - self.viewport_height / 2.0
    }

    pub fn content_height(&self) -> f64 {
        self.rows.len() as f64 * self.row_height
    }

    pub fn rows(&self) -> &[RenderedItem] {
        &self.rows
    }

    pub fn position_of(&self, id: ItemId) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    pub fn text_of(&self, id: ItemId) -> Option<&str> {
        self.rows.iter().find(|r| r.id == id).map(|r| r.text.as_str())
    }

    pub fn highlighted(&self) -> Option<ItemId> {
        self.highlighted
    }
}

impl Surface for FixedRowSurface {
    fn viewport_center(&self) -> f64 {
        self.viewport_height / 2.0
    }

    fn item_extents(&self) -> Vec<ItemExtent> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| ItemExtent {
                id: row.id,
                top: i as f64 * self.row_height - self.scroll_offset,
                height: self.row_height,
            })
            .collect()
    }

    fn tail_distance(&self) -> f64 {
        self.content_height() - (self.scroll_offset + self.viewport_height)
    }

    fn append(&mut self, items: &[RenderedItem]) {
        self.rows.extend_from_slice(items);
    }

    fn rewrite(&mut self, item: &RenderedItem) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.id == item.id) {
            *row = item.clone();
        }
    }

    fn remove_after(&mut self, id: ItemId) {
        self.rows.retain(|r| r.id <= id);
    }

    fn highlight(&mut self, id: Option<ItemId>) {
        self.highlighted = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface_with(n: u64) -> FixedRowSurface {
        let mut s = FixedRowSurface::new(40.0, 400.0);
        let items: Vec<RenderedItem> = (0..n)
            .map(|i| RenderedItem::new(ItemId(i), format!("W{i}")))
            .collect();
        s.append(&items);
        s
    }

    #[test]
    fn centering_offset_puts_row_in_middle() {
        let mut s = surface_with(30);
        let offset = s.offset_centering(12);
        s.scroll_to(offset);
        let extents = s.item_extents();
        assert_eq!(extents[12].center(), s.viewport_center());
    }

    #[test]
    fn scroll_is_clamped_to_content() {
        let mut s = surface_with(20);
        s.scroll_to(10_000.0);
        assert_eq!(s.scroll_offset(), 800.0 - 400.0);
        assert_eq!(s.tail_distance(), 0.0);
        s.scroll_to(-5.0);
        assert_eq!(s.scroll_offset(), 0.0);
    }

    #[test]
    fn remove_after_keeps_prefix() {
        let mut s = surface_with(10);
        s.remove_after(ItemId(4));
        assert_eq!(s.rows().len(), 5);
        assert_eq!(s.text_of(ItemId(4)), Some("W4"));
        assert_eq!(s.text_of(ItemId(5)), None);
    }
}
