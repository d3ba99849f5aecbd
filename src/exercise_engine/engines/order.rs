use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::MarkupError;
use crate::exercise_engine::{
    config::EngineConfig,
    drag::{insertion_point, DragSession, DropEffect, ItemBox},
    engines::Exercise,
    models::{ContainerId, ControlPanel, ExerciseKind, Item, ItemId, ItemIds},
    shuffle::shuffle,
    timer::{Millis, Timer},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderCheck {
    /// Every item is in its authored position.
    Success,
    /// At least one item is out of place; nothing was changed.
    Mismatch,
}

/// Single-list reordering exercise, checked against the authored order.
#[derive(Debug)]
pub struct OrderItems {
    container: ContainerId,
    /// Authored order, captured by text at mount.
    ground_truth: Vec<String>,
    items: Vec<Item>,
    ids: ItemIds,
    panel: ControlPanel,
    timer: Timer,
    rng: StdRng,
}

impl OrderItems {
    pub fn mount(
        container: ContainerId,
        list: Option<Vec<String>>,
        config: &EngineConfig,
        rng: StdRng,
        now: Millis,
    ) -> Result<Self, MarkupError> {
        let list = list.ok_or_else(|| MarkupError::MissingList { container: container.0.clone() })?;
        if list.is_empty() {
            return Err(MarkupError::Empty { container: container.0.clone() });
        }
        let ground_truth: Vec<String> = list.iter().map(|t| t.trim().to_string()).collect();

        let mut order = OrderItems {
            container,
            ground_truth,
            items: Vec::new(),
            ids: ItemIds::default(),
            panel: ControlPanel::new(ExerciseKind::OrderItems),
            timer: Timer::new(config.tick_interval_ms),
            rng,
        };
        order.rebuild_items();
        order.timer.start(now);
        info!(container = %order.container, items = order.items.len(), "Order Items mounted");
        Ok(order)
    }

    pub fn ground_truth(&self) -> &[String] {
        &self.ground_truth
    }

    pub fn current_order(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.text.as_str()).collect()
    }

    pub fn is_solved(&self) -> bool {
        self.panel.is_success()
    }

    pub fn drag_start(&mut self, session: &mut DragSession, item: ItemId) -> bool {
        if self.is_solved() {
            return false;
        }
        let Some(it) = self.items.iter_mut().find(|i| i.id == item && i.draggable) else {
            return false;
        };
        it.flags.dragging = true;
        session.begin(&self.container, item);
        debug!(container = %self.container, %item, "drag start");
        true
    }

    pub fn drag_over(&self, session: &DragSession) -> DropEffect {
        session.drag_over(&self.container)
    }

    /// Drop the dragged item into the list.
    ///
    /// `onto` is the item under the pointer (dropping an item on itself does
    /// nothing); `layout` is the current geometry of the list.
    pub fn drop(
        &mut self,
        session: &DragSession,
        onto: Option<ItemId>,
        pointer_y: f64,
        layout: &[ItemBox],
    ) -> bool {
        let Some(dragged) = session.dragged_in(&self.container) else {
            return false;
        };
        if onto == Some(dragged) || self.is_solved() {
            return false;
        }
        let Some(from) = self.position(dragged) else {
            return false;
        };
        let before = insertion_point(layout, dragged, pointer_y);
        let moved = self.items.remove(from);
        let at = before
            .and_then(|b| self.position(b))
            .unwrap_or(self.items.len());
        self.items.insert(at, moved);
        debug!(container = %self.container, item = %dragged, at, "dropped");
        true
    }

    pub fn drag_end(&mut self, session: &mut DragSession) {
        for item in &mut self.items {
            item.flags.dragging = false;
        }
        session.end();
    }

    /// Compare the current order to the authored one, element for element.
    pub fn check(&mut self, now: Millis) -> OrderCheck {
        let solved = self
            .items
            .iter()
            .map(|i| i.text.as_str())
            .eq(self.ground_truth.iter().map(String::as_str));
        if !solved {
            debug!(container = %self.container, "order mismatch");
            return OrderCheck::Mismatch;
        }
        if !self.is_solved() {
            for item in &mut self.items {
                item.flags.correct = true;
            }
            self.timer.stop(now);
            let n = self.items.len();
            self.panel.show_success(n, n);
            info!(container = %self.container, time = self.timer.display(), "Order Items solved");
        }
        OrderCheck::Success
    }

    /// Fresh item elements from the authored order, then shuffled.
    fn rebuild_items(&mut self) {
        let mut items: Vec<Item> = self
            .ground_truth
            .iter()
            .map(|text| Item::interactive(self.ids.next_id(), text.clone(), true))
            .collect();
        shuffle(&mut self.rng, &mut items);
        self.items = items;
    }

    fn position(&self, item: ItemId) -> Option<usize> {
        self.items.iter().position(|i| i.id == item)
    }
}

impl Exercise for OrderItems {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::OrderItems
    }

    fn container(&self) -> &ContainerId {
        &self.container
    }

    fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    fn timer(&self) -> &Timer {
        &self.timer
    }

    fn items(&self) -> Vec<&Item> {
        self.items.iter().collect()
    }

    fn poll(&mut self, now: Millis) {
        self.timer.poll(now);
    }

    /// Fresh items from the captured ground truth, shuffled again as at
    /// mount rather than laid out in the authored order.
    fn reset(&mut self, now: Millis) {
        self.panel.restore();
        self.rebuild_items();
        self.timer.reset(now);
        debug!(container = %self.container, "Order Items reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise_engine::drag::stacked_layout;
    use crate::exercise_engine::models::ItemFlags;
    use rand::SeedableRng;

    fn mount(texts: &[&str], seed: u64) -> OrderItems {
        OrderItems::mount(
            ContainerId::from("order"),
            Some(texts.iter().map(|t| t.to_string()).collect()),
            &EngineConfig::seeded(seed),
            StdRng::seed_from_u64(seed),
            0,
        )
        .unwrap()
    }

    fn id_of(o: &OrderItems, text: &str) -> ItemId {
        o.items.iter().find(|i| i.text == text).unwrap().id
    }

    /// Drag `text` so it lands directly before `before` (or at the end).
    fn drag_before(o: &mut OrderItems, s: &mut DragSession, text: &str, before: Option<&str>) {
        let item = id_of(o, text);
        let layout = stacked_layout(o.items.iter().map(|i| i.id), 40.0);
        let y = match before {
            Some(b) => layout.iter().find(|bx| bx.item == id_of(o, b)).unwrap().top + 1.0,
            None => 10_000.0,
        };
        assert!(o.drag_start(s, item));
        assert_eq!(o.drag_over(s), DropEffect::Move);
        o.drop(s, None, y, &layout);
        o.drag_end(s);
    }

    fn arrange(o: &mut OrderItems, s: &mut DragSession, target: &[&str]) {
        for text in target {
            drag_before(o, s, text, None);
        }
        assert_eq!(o.current_order(), target);
    }

    #[test]
    fn mount_rejects_missing_or_empty_lists() {
        let c = EngineConfig::default();
        let rng = || StdRng::seed_from_u64(1);
        assert!(matches!(
            OrderItems::mount("o".into(), None, &c, rng(), 0),
            Err(MarkupError::MissingList { .. })
        ));
        assert!(matches!(
            OrderItems::mount("o".into(), Some(vec![]), &c, rng(), 0),
            Err(MarkupError::Empty { .. })
        ));
    }

    #[test]
    fn ground_truth_is_trimmed_authored_order() {
        let o = mount(&[" A ", "B", "C\n"], 3);
        assert_eq!(o.ground_truth(), ["A", "B", "C"]);
        let mut shown = o.current_order();
        shown.sort_unstable();
        assert_eq!(shown, ["A", "B", "C"]);
        assert!(o.timer().is_running());
    }

    #[test]
    fn correct_order_checks_as_success() {
        let mut o = mount(&["A", "B", "C"], 5);
        let mut s = DragSession::new();
        arrange(&mut o, &mut s, &["A", "B", "C"]);
        assert_eq!(o.check(12_000), OrderCheck::Success);
        assert!(o.items().iter().all(|i| i.flags.correct));
        assert!(!o.timer().is_running());
        assert_eq!(o.timer().display(), "0:12");
        assert_eq!(o.panel().score_text.as_deref(), Some("3/3"));
    }

    #[test]
    fn wrong_order_changes_nothing() {
        let mut o = mount(&["A", "B", "C"], 5);
        let mut s = DragSession::new();
        arrange(&mut o, &mut s, &["A", "C", "B"]);
        assert_eq!(o.check(1_000), OrderCheck::Mismatch);
        assert!(o.items().iter().all(|i| !i.flags.correct));
        assert!(o.timer().is_running());
        assert!(!o.panel().is_success());
        assert_eq!(o.current_order(), ["A", "C", "B"]);
        // Keep dragging and check again.
        drag_before(&mut o, &mut s, "B", Some("C"));
        assert_eq!(o.check(2_000), OrderCheck::Success);
    }

    #[test]
    fn drop_between_siblings_uses_midpoints() {
        let mut o = mount(&["A", "B", "C", "D"], 9);
        let mut s = DragSession::new();
        arrange(&mut o, &mut s, &["A", "B", "C", "D"]);
        drag_before(&mut o, &mut s, "D", Some("B"));
        assert_eq!(o.current_order(), ["A", "D", "B", "C"]);
        drag_before(&mut o, &mut s, "A", Some("C"));
        assert_eq!(o.current_order(), ["D", "B", "A", "C"]);
    }

    #[test]
    fn drop_without_session_or_onto_self_is_ignored() {
        let mut o = mount(&["A", "B", "C"], 2);
        let before = o.current_order().iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let layout = stacked_layout(o.items.iter().map(|i| i.id), 40.0);
        let mut s = DragSession::new();
        assert!(!o.drop(&s, None, 0.0, &layout));

        let first = o.items[0].id;
        o.drag_start(&mut s, first);
        assert!(!o.drop(&s, Some(first), 10_000.0, &layout));
        o.drag_end(&mut s);
        assert!(!s.is_active());
        assert!(o.items().iter().all(|i| !i.flags.dragging));
        assert_eq!(o.current_order(), before);
    }

    #[test]
    fn reset_rebuilds_fresh_items() {
        let mut o = mount(&["A", "B", "C"], 8);
        let mut s = DragSession::new();
        arrange(&mut o, &mut s, &["A", "B", "C"]);
        o.check(4_000);
        let old_ids: Vec<ItemId> = o.items.iter().map(|i| i.id).collect();

        o.reset(5_000);
        assert!(!o.panel().is_success());
        assert!(o.items().iter().all(|i| i.draggable && i.flags == ItemFlags::default()));
        assert!(o.items.iter().all(|i| !old_ids.contains(&i.id)));
        assert!(o.timer().is_running());
        assert_eq!(o.timer().display(), "0:00");

        // Stale handles from before the rebuild no longer resolve.
        assert!(!o.drag_start(&mut s, old_ids[0]));

        o.reset(6_000);
        let mut shown = o.current_order();
        shown.sort_unstable();
        assert_eq!(shown, ["A", "B", "C"]);
        assert!(o.timer().is_running());
    }

    #[test]
    fn duplicate_texts_compare_by_sequence() {
        let mut o = mount(&["X", "X", "Y"], 4);
        let mut s = DragSession::new();
        let y = id_of(&o, "Y");
        let layout = stacked_layout(o.items.iter().map(|i| i.id), 40.0);
        o.drag_start(&mut s, y);
        o.drop(&s, None, 10_000.0, &layout);
        o.drag_end(&mut s);
        assert_eq!(o.check(0), OrderCheck::Success);
    }

    #[test]
    fn solved_list_ignores_drags() {
        let mut o = mount(&["A", "B"], 1);
        let mut s = DragSession::new();
        arrange(&mut o, &mut s, &["A", "B"]);
        o.check(0);
        let a = id_of(&o, "A");
        assert!(!o.drag_start(&mut s, a));
    }

    #[test]
    fn reset_shuffles_instead_of_restoring_the_authored_order() {
        let texts = ["A", "B", "C", "D", "E"];
        let mut o = mount(&texts, 21);
        let mut orders = vec![o.current_order().join("")];
        for round in 0..10 {
            o.reset(round * 1_000);
            orders.push(o.current_order().join(""));
        }
        assert!(orders.iter().any(|x| x != "ABCDE"), "never left the authored order");
        assert!(orders.iter().any(|x| x != &orders[0]), "ten resets never changed the order");
        assert_eq!(o.ground_truth(), texts);
    }
}
