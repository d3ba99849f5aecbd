//! Drag-and-drop reordering shared by Order Items and Sort Items.
//!
//! A pointer can only drag one thing at a time, so each drag family (Order,
//! Sort) owns exactly one [`DragSession`]. The page holds both sessions and
//! passes the right one to engine handlers; nothing here is global.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::exercise_engine::models::{ContainerId, ItemId};

/// Answer to a drag-over event.
///
/// `Move` means the host must call `preventDefault` and set the `move`
/// drop effect; otherwise the browser rejects the drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropEffect {
    Move,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDrag {
    pub container: ContainerId,
    pub item: ItemId,
}

/// The single in-flight drag of one drag family.
#[derive(Debug, Default)]
pub struct DragSession {
    active: Option<ActiveDrag>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, container: &ContainerId, item: ItemId) {
        if let Some(stale) = self.active.take() {
            debug!(container = %stale.container, item = %stale.item, "replacing stale drag session");
        }
        self.active = Some(ActiveDrag { container: container.clone(), item });
    }

    /// The item being dragged, if the drag started inside `container`.
    pub fn dragged_in(&self, container: &ContainerId) -> Option<ItemId> {
        self.active
            .as_ref()
            .filter(|d| &d.container == container)
            .map(|d| d.item)
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn drag_over(&self, container: &ContainerId) -> DropEffect {
        if self.dragged_in(container).is_some() {
            DropEffect::Move
        } else {
            DropEffect::None
        }
    }

    /// Clear the session whatever happened to the drop.
    pub fn end(&mut self) -> Option<ActiveDrag> {
        self.active.take()
    }
}

/// Vertical extent of one rendered item, as reported by the host layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemBox {
    pub item: ItemId,
    pub top: f64,
    pub height: f64,
}

impl ItemBox {
    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Boxes for items stacked top to bottom with a uniform row height.
///
/// For hosts without real geometry (terminal front-ends, tests).
pub fn stacked_layout(items: impl IntoIterator<Item = ItemId>, row_height: f64) -> Vec<ItemBox> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| ItemBox { item, top: i as f64 * row_height, height: row_height })
        .collect()
}

/// Where a drop at `pointer_y` lands among `siblings`.
///
/// Returns the sibling the dragged item must be inserted before: the one
/// whose midpoint is below the pointer and closest to it. `None` means append
/// at the end. The dragged item itself is never a candidate.
pub fn insertion_point(siblings: &[ItemBox], dragged: ItemId, pointer_y: f64) -> Option<ItemId> {
    siblings
        .iter()
        .filter(|b| b.item != dragged)
        .map(|b| (pointer_y - b.midpoint(), b.item))
        .filter(|(offset, _)| *offset < 0.0)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, item)| item)
}

/// Drop zones currently showing the `drag-over` highlight.
#[derive(Debug, Clone)]
pub struct Highlights<Z: Ord + Copy> {
    zones: BTreeSet<Z>,
}

impl<Z: Ord + Copy> Default for Highlights<Z> {
    fn default() -> Self {
        Highlights { zones: BTreeSet::new() }
    }
}

impl<Z: Ord + Copy> Highlights<Z> {
    pub fn enter(&mut self, zone: Z) {
        self.zones.insert(zone);
    }

    /// Pointer left `zone`'s element towards `related`. The highlight stays
    /// when the pointer only moved onto something inside the same zone.
    pub fn leave(&mut self, zone: Z, related: Option<Z>) {
        if related != Some(zone) {
            self.zones.remove(&zone);
        }
    }

    pub fn remove(&mut self, zone: Z) {
        self.zones.remove(&zone);
    }

    pub fn clear(&mut self) {
        self.zones.clear();
    }

    pub fn contains(&self, zone: Z) -> bool {
        self.zones.contains(&zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(ids: &[u32]) -> Vec<ItemBox> {
        stacked_layout(ids.iter().map(|&i| ItemId(i)), 40.0)
    }

    #[test]
    fn insertion_picks_closest_sibling_below_pointer() {
        // Midpoints: 20, 60, 100.
        let boxes = column(&[1, 2, 3]);
        assert_eq!(insertion_point(&boxes, ItemId(9), 0.0), Some(ItemId(1)));
        assert_eq!(insertion_point(&boxes, ItemId(9), 45.0), Some(ItemId(2)));
        assert_eq!(insertion_point(&boxes, ItemId(9), 61.0), Some(ItemId(3)));
        assert_eq!(insertion_point(&boxes, ItemId(9), 500.0), None);
    }

    #[test]
    fn dragged_item_is_skipped() {
        let boxes = column(&[1, 2, 3]);
        // Pointer above item 2's midpoint, but 2 is the one being dragged.
        assert_eq!(insertion_point(&boxes, ItemId(2), 45.0), Some(ItemId(3)));
        assert_eq!(insertion_point(&[], ItemId(2), 45.0), None);
    }

    #[test]
    fn session_is_scoped_to_its_container() {
        let a = ContainerId::from("a");
        let b = ContainerId::from("b");
        let mut s = DragSession::new();
        assert_eq!(s.drag_over(&a), DropEffect::None);
        s.begin(&a, ItemId(4));
        assert_eq!(s.dragged_in(&a), Some(ItemId(4)));
        assert_eq!(s.dragged_in(&b), None);
        assert_eq!(s.drag_over(&a), DropEffect::Move);
        assert_eq!(s.drag_over(&b), DropEffect::None);
        assert!(s.end().is_some());
        assert!(!s.is_active());
        assert!(s.end().is_none());
    }

    #[test]
    fn highlight_survives_moves_inside_the_zone() {
        let mut h = Highlights::default();
        h.enter(1u8);
        h.leave(1, Some(1));
        assert!(h.contains(1));
        h.leave(1, Some(2));
        assert!(!h.contains(1));
        h.enter(2);
        h.leave(2, None);
        assert!(!h.contains(2));
    }
}
