//! Ordered list of rendered items and the infinite-scroll tail.

use crate::surface::{RenderedItem, Surface};
use crate::viewport::ItemId;

#[derive(Debug, Clone, Default)]
pub struct RenderFeed {
    items: Vec<RenderedItem>,
    next_id: u64,
    marked: Vec<ItemId>,
}

impl RenderFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[RenderedItem] {
        &self.items
    }

    fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.binary_search_by_key(&id, |item| item.id).ok()
    }

    pub fn get(&self, id: ItemId) -> Option<&RenderedItem> {
        self.index_of(id).map(|i| &self.items[i])
    }

    pub fn text(&self, id: ItemId) -> Option<&str> {
        self.get(id).map(|item| item.text.as_str())
    }

    /// Append words at the tail and expose them on the surface.
    pub fn append<S: Surface + ?Sized>(&mut self, words: Vec<String>, surface: &mut S) {
        if words.is_empty() {
            return;
        }
        let start = self.items.len();
        for word in words {
            let id = ItemId(self.next_id);
            self.next_id += 1;
            self.items.push(RenderedItem::new(id, word));
        }
        surface.append(&self.items[start..]);
    }

    /// Whether the tail is close enough to the viewport to need more items.
    pub fn needs_extension<S: Surface + ?Sized>(&self, surface: &S, tail_margin_px: f64) -> bool {
        self.items.is_empty() || surface.tail_distance() < tail_margin_px
    }

    /// Drop every item after `id` (the "future" of the list).
    pub fn truncate_after<S: Surface + ?Sized>(&mut self, id: ItemId, surface: &mut S) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        if index + 1 < self.items.len() {
            self.items.truncate(index + 1);
            self.marked.retain(|m| *m <= id);
            surface.remove_after(id);
        }
    }

    /// Up to `count` ids next to `anchor` in `direction` (+1 toward the
    /// tail, -1 toward the head), nearest first.
    pub fn neighbours(&self, anchor: ItemId, direction: i8, count: usize) -> Vec<ItemId> {
        let Some(index) = self.index_of(anchor) else {
            return Vec::new();
        };
        if direction >= 0 {
            self.items[index + 1..]
                .iter()
                .take(count)
                .map(|item| item.id)
                .collect()
        } else {
            self.items[..index]
                .iter()
                .rev()
                .take(count)
                .map(|item| item.id)
                .collect()
        }
    }

    /// Replace an item's text and mark it as forced.
    pub fn rewrite<S: Surface + ?Sized>(&mut self, id: ItemId, text: String, surface: &mut S) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let item = &mut self.items[index];
        item.text = text;
        item.forced = true;
        if !self.marked.contains(&id) {
            self.marked.push(id);
        }
        surface.rewrite(item);
        true
    }

    /// Show the verbatim target on `id`.
    pub fn reveal<S: Surface + ?Sized>(&mut self, id: ItemId, text: &str, surface: &mut S) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let item = &mut self.items[index];
        item.text = text.to_string();
        item.revealed = true;
        if !self.marked.contains(&id) {
            self.marked.push(id);
        }
        surface.rewrite(item);
        true
    }

    /// Clear forced/revealed markers on every item that carries one.
    pub fn clear_marks<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        for id in std::mem::take(&mut self.marked) {
            if let Some(index) = self.index_of(id) {
                let item = &mut self.items[index];
                item.forced = false;
                item.revealed = false;
                surface.rewrite(item);
            }
        }
    }

    /// Clear only the transient forced markers, keeping reveals visible.
    pub fn clear_forced<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let marked = std::mem::take(&mut self.marked);
        for id in marked {
            let Some(index) = self.index_of(id) else {
                continue;
            };
            let item = &mut self.items[index];
            if item.revealed {
                item.forced = false;
                self.marked.push(id);
            } else {
                item.forced = false;
            }
            surface.rewrite(item);
        }
    }

    pub fn marked_count(&self) -> usize {
        self.marked.len()
    }
}
