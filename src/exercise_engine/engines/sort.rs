//! Drag items from the answer bank into categorized buckets.
//!
//! Item placement is kept in a [`Placement`] index (zone = pool or bucket),
//! which is the single source of truth for evaluation. Whatever the author
//! pre-placed in buckets, a mounted exercise always starts with every item in
//! the pool.
//!
//! ## Expected counts
//!
//! Each bucket expects the number of items tagged as belonging to it. Items
//! authored inside a bucket belong there unless they name another bucket.
//! A layout with no tags at all falls back to a fixed count per bucket
//! (`sort_fallback_per_bucket`), which is logged as a warning: a fixed
//! count cannot tell whether the right items were sorted.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::MarkupError;
use crate::exercise_engine::{
    config::EngineConfig,
    drag::{insertion_point, DragSession, DropEffect, Highlights, ItemBox},
    engines::Exercise,
    markup::{BucketMarkup, SortItemMarkup},
    models::{ContainerId, ControlPanel, ExerciseKind, Item, ItemId, ItemIds, PanelButton},
    placement::Placement,
    shuffle::shuffle,
    timer::{Millis, Timer},
};

/// Where an item can sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SortZone {
    /// The answer bank.
    Pool,
    Bucket(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    /// Items tagged for this bucket (or the fixed fallback count).
    pub expected: usize,
}

#[derive(Debug, Clone)]
pub struct SortItem {
    pub item: Item,
    /// Index of the bucket the author tagged this item for.
    pub home: Option<usize>,
    /// Image source of a figure item; `item.text` is then its caption.
    pub image: Option<String>,
}

impl SortItem {
    fn from_markup(id: ItemId, m: &SortItemMarkup, home: Option<usize>) -> Self {
        SortItem {
            item: Item::interactive(id, m.text.trim(), true),
            home,
            image: m.image.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpectedCounts {
    /// Derived from bucket tags; every bucket must reach its own count.
    Authored,
    /// Untagged layout: the buckets together must hold `n` per bucket.
    FixedPerBucket(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortReport {
    /// Items currently in any bucket.
    pub sorted: usize,
    pub total: usize,
    pub remaining_in_pool: usize,
    /// Bucketed items that sit in the bucket they are tagged for.
    pub in_home_bucket: usize,
    pub expected: usize,
}

impl SortReport {
    pub fn message(&self) -> String {
        format!(
            "Items sorted: {}/{}\nRemaining in Answer Bank: {}",
            self.sorted, self.total, self.remaining_in_pool
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortCheck {
    Success(SortReport),
    Progress(SortReport),
}

#[derive(Debug)]
pub struct SortItems {
    container: ContainerId,
    buckets: Vec<Bucket>,
    policy: ExpectedCounts,
    items: Vec<SortItem>,
    placement: Placement<SortZone>,
    highlights: Highlights<SortZone>,
    panel: ControlPanel,
    timer: Timer,
    rng: StdRng,
}

impl SortItems {
    pub fn mount(
        container: ContainerId,
        answer_bank: Option<BucketMarkup>,
        buckets: Vec<BucketMarkup>,
        config: &EngineConfig,
        rng: StdRng,
        now: Millis,
    ) -> Result<Self, MarkupError> {
        let bank = answer_bank.ok_or_else(|| MarkupError::MissingAnswerBank { container: container.0.clone() })?;
        if buckets.is_empty() {
            return Err(MarkupError::NoBuckets { container: container.0.clone() });
        }

        let labels: Vec<String> = buckets
            .iter()
            .enumerate()
            .map(|(i, b)| match b.label.trim() {
                "" => format!("Bucket {}", i + 1),
                label => label.to_string(),
            })
            .collect();
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(MarkupError::DuplicateBucket {
                    container: container.0.clone(),
                    label: label.clone(),
                });
            }
        }
        let resolve = |m: &SortItemMarkup, placed_in: Option<usize>| -> Result<Option<usize>, MarkupError> {
            match &m.bucket {
                Some(name) => labels
                    .iter()
                    .position(|l| l == name.trim())
                    .map(Some)
                    .ok_or_else(|| MarkupError::UnknownBucket {
                        container: container.0.clone(),
                        text: m.text.clone(),
                        bucket: name.clone(),
                    }),
                None => Ok(placed_in),
            }
        };

        // Gather everything the author placed, buckets first, then the pool.
        let mut ids = ItemIds::default();
        let mut items = Vec::new();
        for (i, b) in buckets.iter().enumerate() {
            for m in &b.items {
                let home = resolve(m, Some(i))?;
                items.push(SortItem::from_markup(ids.next_id(), m, home));
            }
        }
        for m in &bank.items {
            let home = resolve(m, None)?;
            items.push(SortItem::from_markup(ids.next_id(), m, home));
        }
        if items.is_empty() {
            return Err(MarkupError::Empty { container: container.0.clone() });
        }

        let tagged = items.iter().any(|s| s.home.is_some());
        let policy = if tagged {
            ExpectedCounts::Authored
        } else {
            warn!(
                container = %container,
                per_bucket = config.sort_fallback_per_bucket,
                "sort layout has no bucket tags; falling back to a fixed expected count per bucket"
            );
            ExpectedCounts::FixedPerBucket(config.sort_fallback_per_bucket)
        };
        let buckets: Vec<Bucket> = labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| Bucket {
                label,
                expected: match policy {
                    ExpectedCounts::Authored => items.iter().filter(|s| s.home == Some(i)).count(),
                    ExpectedCounts::FixedPerBucket(n) => n,
                },
            })
            .collect();

        let zones = std::iter::once(SortZone::Pool).chain((0..buckets.len()).map(SortZone::Bucket));
        let mut sort = SortItems {
            container,
            buckets,
            policy,
            items,
            placement: Placement::new(zones),
            highlights: Highlights::default(),
            panel: ControlPanel::new(ExerciseKind::SortItems),
            timer: Timer::new(config.tick_interval_ms),
            rng,
        };
        sort.refill_pool();
        sort.timer.start(now);
        info!(
            container = %sort.container,
            items = sort.items.len(),
            buckets = sort.buckets.len(),
            "Sort Items mounted with every item in the answer bank"
        );
        Ok(sort)
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn policy(&self) -> ExpectedCounts {
        self.policy
    }

    pub fn sort_items(&self) -> &[SortItem] {
        &self.items
    }

    pub fn zone_of(&self, item: ItemId) -> Option<SortZone> {
        self.placement.zone_of(item)
    }

    pub fn items_in(&self, zone: SortZone) -> &[ItemId] {
        self.placement.items_in(zone)
    }

    pub fn item(&self, id: ItemId) -> Option<&SortItem> {
        self.items.iter().find(|s| s.item.id == id)
    }

    pub fn is_highlighted(&self, zone: SortZone) -> bool {
        self.highlights.contains(zone)
    }

    pub fn is_solved(&self) -> bool {
        self.panel.is_success()
    }

    pub fn drag_start(&mut self, session: &mut DragSession, item: ItemId) -> bool {
        if self.is_solved() {
            return false;
        }
        let Some(s) = self.items.iter_mut().find(|s| s.item.id == item && s.item.draggable) else {
            return false;
        };
        s.item.flags.dragging = true;
        session.begin(&self.container, item);
        debug!(container = %self.container, %item, "sort drag start");
        true
    }

    pub fn drag_over(&self, session: &DragSession, zone: SortZone) -> DropEffect {
        if self.placement.has_zone(zone) {
            session.drag_over(&self.container)
        } else {
            DropEffect::None
        }
    }

    pub fn drag_enter(&mut self, zone: SortZone) {
        if self.placement.has_zone(zone) {
            self.highlights.enter(zone);
        }
    }

    /// The pointer left `zone` towards `related` (`None` when it left every
    /// zone of this exercise).
    pub fn drag_leave(&mut self, zone: SortZone, related: Option<SortZone>) {
        self.highlights.leave(zone, related);
    }

    /// Drop the dragged item into `zone`, positioned by `pointer_y` against
    /// the zone's `layout`. A zone this exercise does not have changes
    /// nothing.
    pub fn drop(&mut self, session: &DragSession, zone: SortZone, pointer_y: f64, layout: &[ItemBox]) -> bool {
        self.highlights.remove(zone);
        let Some(dragged) = session.dragged_in(&self.container) else {
            return false;
        };
        if self.is_solved() || !self.placement.has_zone(zone) {
            return false;
        }
        let before = insertion_point(layout, dragged, pointer_y)
            .filter(|b| self.placement.zone_of(*b) == Some(zone));
        let moved = self.placement.move_to(dragged, zone, before);
        if moved {
            debug!(container = %self.container, item = %dragged, ?zone, "sort drop");
        }
        moved
    }

    pub fn drag_end(&mut self, session: &mut DragSession) {
        for s in &mut self.items {
            s.item.flags.dragging = false;
        }
        self.highlights.clear();
        session.end();
    }

    /// Re-randomize the answer bank in place; buckets are left alone.
    pub fn shuffle_pool(&mut self) -> bool {
        if self.is_solved() {
            return false;
        }
        let mut pool = self.placement.items_in(SortZone::Pool).to_vec();
        shuffle(&mut self.rng, &mut pool);
        self.placement.reorder(SortZone::Pool, pool)
    }

    pub fn report(&self) -> SortReport {
        let remaining_in_pool = self.placement.items_in(SortZone::Pool).len();
        let in_home_bucket = self
            .items
            .iter()
            .filter(|s| match (s.home, self.placement.zone_of(s.item.id)) {
                (Some(home), Some(SortZone::Bucket(b))) => home == b,
                _ => false,
            })
            .count();
        SortReport {
            sorted: self.items.len() - remaining_in_pool,
            total: self.items.len(),
            remaining_in_pool,
            in_home_bucket,
            expected: self.buckets.iter().map(|b| b.expected).sum(),
        }
    }

    fn meets_expected_counts(&self, report: &SortReport) -> bool {
        match self.policy {
            ExpectedCounts::Authored => self
                .buckets
                .iter()
                .enumerate()
                .all(|(i, b)| self.placement.items_in(SortZone::Bucket(i)).len() >= b.expected),
            ExpectedCounts::FixedPerBucket(_) => report.sorted >= report.expected,
        }
    }

    pub fn check(&mut self, now: Millis) -> SortCheck {
        let report = self.report();
        if self.is_solved() {
            return SortCheck::Success(report);
        }
        if !self.meets_expected_counts(&report) {
            debug!(container = %self.container, sorted = report.sorted, total = report.total, "sort progress");
            return SortCheck::Progress(report);
        }

        let bucketed: BTreeSet<ItemId> = (0..self.buckets.len())
            .flat_map(|i| self.placement.items_in(SortZone::Bucket(i)).iter().copied())
            .collect();
        for s in &mut self.items {
            if bucketed.contains(&s.item.id) {
                s.item.flags.checkmark = true;
            }
        }
        self.timer.stop(now);
        self.panel.show_success(report.sorted, report.total);
        self.panel.buttons = vec![PanelButton::Reset];
        info!(
            container = %self.container,
            sorted = report.sorted,
            total = report.total,
            time = self.timer.display(),
            "Sort Items solved"
        );
        SortCheck::Success(report)
    }

    /// Pull every item back, shuffle and put them all in the pool.
    fn refill_pool(&mut self) {
        self.placement.drain_all();
        let mut all: Vec<ItemId> = self.items.iter().map(|s| s.item.id).collect();
        shuffle(&mut self.rng, &mut all);
        for id in all {
            self.placement.insert(id, SortZone::Pool);
        }
    }
}

impl Exercise for SortItems {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::SortItems
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

    /// Pool first, then each bucket in order.
    fn items(&self) -> Vec<&Item> {
        std::iter::once(SortZone::Pool)
            .chain((0..self.buckets.len()).map(SortZone::Bucket))
            .flat_map(|z| self.placement.items_in(z).iter())
            .filter_map(|&id| self.item(id).map(|s| &s.item))
            .collect()
    }

    fn poll(&mut self, now: Millis) {
        self.timer.poll(now);
    }

    fn reset(&mut self, now: Millis) {
        for s in &mut self.items {
            s.item.flags = Default::default();
        }
        self.highlights.clear();
        self.refill_pool();
        self.panel.restore();
        self.timer.reset(now);
        debug!(container = %self.container, "Sort Items reset");
    }
}
