//! Which rendered item sits at the vertical center of the viewport.
//!
//! Geometry comes from the host as on-screen extents; the reference point is
//! the viewport's center, not the scroll container's box, so a full-bleed
//! container on mobile still resolves correctly.

/// Stable identity of a rendered item: its position in append order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub u64);

/// On-screen vertical extent of one rendered item, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemExtent {
    pub id: ItemId,
    pub top: f64,
    pub height: f64,
}

impl ItemExtent {
    pub fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Item whose center is closest to `viewport_center`. Ties go to the first
/// item encountered.
pub fn closest_to_center(extents: &[ItemExtent], viewport_center: f64) -> Option<ItemId> {
    let mut best: Option<(ItemId, f64)> = None;
    for extent in extents {
        let diff = (extent.center() - viewport_center).abs();
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((extent.id, diff)),
        }
    }
    best.map(|(id, _)| id)
}

/// Remembers the highlighted item so the host is only told about changes.
#[derive(Debug, Clone, Default)]
pub struct ViewportTracker {
    active: Option<ItemId>,
}

impl ViewportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&self, extents: &[ItemExtent], viewport_center: f64) -> Option<ItemId> {
        closest_to_center(extents, viewport_center)
    }

    /// Record `id` as highlighted; true if it changed.
    pub fn set_active(&mut self, id: Option<ItemId>) -> bool {
        let changed = self.active != id;
        self.active = id;
        changed
    }

    pub fn active(&self) -> Option<ItemId> {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: u64, height: f64, scroll: f64) -> Vec<ItemExtent> {
        (0..n)
            .map(|i| ItemExtent {
                id: ItemId(i),
                top: i as f64 * height - scroll,
                height,
            })
            .collect()
    }

    #[test]
    fn picks_row_under_center() {
        let extents = rows(20, 50.0, 0.0);
        // center 210 lies inside row 4 (200..250)
        assert_eq!(closest_to_center(&extents, 210.0), Some(ItemId(4)));
        let scrolled = rows(20, 50.0, 120.0);
        assert_eq!(closest_to_center(&scrolled, 210.0), Some(ItemId(6)));
    }

    #[test]
    fn tie_goes_to_first() {
        let extents = rows(4, 50.0, 0.0);
        // centers at 25 and 75; 50 is equidistant
        assert_eq!(closest_to_center(&extents, 50.0), Some(ItemId(0)));
    }

    #[test]
    fn empty_list_has_no_active_item() {
        assert_eq!(closest_to_center(&[], 100.0), None);
    }

    #[test]
    fn tracker_reports_changes_only() {
        let mut t = ViewportTracker::new();
        assert!(t.set_active(Some(ItemId(3))));
        assert!(!t.set_active(Some(ItemId(3))));
        assert!(t.set_active(None));
        assert_eq!(t.active(), None);
    }
}
