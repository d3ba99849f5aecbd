//! Logical zone assignment for Sort Items.
//!
//! Mirrors the DOM parent of every item: which zone holds it and in what
//! order. Evaluation reads this index instead of a rendering tree. Every
//! item lives in exactly one zone; moves are atomic.

use std::collections::{BTreeMap, HashMap};

use crate::exercise_engine::models::ItemId;

#[derive(Debug, Clone)]
pub struct Placement<Z: Ord + Copy> {
    zones: BTreeMap<Z, Vec<ItemId>>,
    owner: HashMap<ItemId, Z>,
}

impl<Z: Ord + Copy> Placement<Z> {
    pub fn new(zones: impl IntoIterator<Item = Z>) -> Self {
        Placement {
            zones: zones.into_iter().map(|z| (z, Vec::new())).collect(),
            owner: HashMap::new(),
        }
    }

    pub fn has_zone(&self, zone: Z) -> bool {
        self.zones.contains_key(&zone)
    }

    /// Append a not-yet-placed item to `zone`.
    pub fn insert(&mut self, item: ItemId, zone: Z) -> bool {
        if self.owner.contains_key(&item) {
            return false;
        }
        let Some(list) = self.zones.get_mut(&zone) else {
            return false;
        };
        list.push(item);
        self.owner.insert(item, zone);
        true
    }

    pub fn zone_of(&self, item: ItemId) -> Option<Z> {
        self.owner.get(&item).copied()
    }

    pub fn items_in(&self, zone: Z) -> &[ItemId] {
        self.zones.get(&zone).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reparent `item` into `zone`, before `before` when that item is in the
    /// target zone, else at the end. Unknown item or zone changes nothing.
    pub fn move_to(&mut self, item: ItemId, zone: Z, before: Option<ItemId>) -> bool {
        let Some(from) = self.zone_of(item) else {
            return false;
        };
        if !self.has_zone(zone) || before == Some(item) {
            return false;
        }
        if let Some(list) = self.zones.get_mut(&from) {
            list.retain(|&i| i != item);
        }
        let Some(list) = self.zones.get_mut(&zone) else {
            return false;
        };
        let at = before
            .and_then(|b| list.iter().position(|&i| i == b))
            .unwrap_or(list.len());
        list.insert(at, item);
        self.owner.insert(item, zone);
        true
    }

    /// Replace the order of `zone` with a permutation of its own items.
    pub fn reorder(&mut self, zone: Z, order: Vec<ItemId>) -> bool {
        let Some(list) = self.zones.get_mut(&zone) else {
            return false;
        };
        let mut current = list.clone();
        let mut proposed = order.clone();
        current.sort_unstable();
        proposed.sort_unstable();
        if current != proposed {
            return false;
        }
        *list = order;
        true
    }

    /// Empty every zone, returning all items (zones in key order).
    pub fn drain_all(&mut self) -> Vec<ItemId> {
        self.owner.clear();
        self.zones.values_mut().flat_map(std::mem::take).collect()
    }

    pub fn len(&self) -> usize {
        self.owner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owner.is_empty()
    }
}
