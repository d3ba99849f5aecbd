//! Click-to-match over term / definition items.
//!
//! ```text
//! Idle -> OneSelected -> TwoSelected -> Evaluating
//!     -> MatchedFeedback -> Disabled   (same pair id, after `match_confirm_ms`)
//!     -> MismatchFeedback -> Idle      (different pair id, after `mismatch_clear_ms`)
//! ```
//!
//! While a pair is being evaluated `is_processing` is set and every click is
//! ignored, so the selection never grows past two.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::MarkupError;
use crate::exercise_engine::{
    config::EngineConfig,
    engines::Exercise,
    markup::{MatchItemMarkup, MatchSide},
    models::{ContainerId, ControlPanel, ExerciseKind, Item, ItemId, ItemIds},
    scheduler::Deferred,
    shuffle::shuffle,
    timer::{Millis, Timer},
};

#[derive(Debug, Clone)]
pub struct MatchItem {
    pub item: Item,
    pub pair_id: String,
    pub side: MatchSide,
}

/// One entry of the "Matched Items" summary: copies of both texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub first: String,
    pub second: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickOutcome {
    Ignored,
    Selected,
    Deselected,
    /// Second selection shares the first one's pair id.
    Matched,
    /// Second selection belongs to another pair.
    Mismatched,
}

/// Answer to the Check button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub matched_pairs: usize,
    pub total_pairs: usize,
    pub attempts: u32,
    pub message: String,
}

impl MatchReport {
    pub fn is_perfect(&self) -> bool {
        self.matched_pairs == self.total_pairs
    }
}

#[derive(Debug, Clone, Copy)]
enum Pending {
    ConfirmMatch(ItemId, ItemId),
    ClearMismatch(ItemId, ItemId),
    ShowSummary,
}

#[derive(Debug, Clone, Copy)]
struct Delays {
    confirm: Millis,
    mismatch: Millis,
    summary: Millis,
}

#[derive(Debug)]
pub struct MatchItems {
    container: ContainerId,
    items: Vec<MatchItem>,
    selected: Vec<ItemId>,
    is_processing: bool,
    attempts: u32,
    matched: Vec<MatchedPair>,
    pending: Deferred<Pending>,
    delays: Delays,
    panel: ControlPanel,
    timer: Timer,
    rng: StdRng,
}

impl MatchItems {
    pub fn mount(
        container: ContainerId,
        items: Option<Vec<MatchItemMarkup>>,
        config: &EngineConfig,
        rng: StdRng,
        now: Millis,
    ) -> Result<Self, MarkupError> {
        let markup = items.ok_or_else(|| MarkupError::MissingList { container: container.0.clone() })?;
        if markup.is_empty() {
            return Err(MarkupError::Empty { container: container.0.clone() });
        }

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for m in &markup {
            *counts.entry(m.pair_id.as_str()).or_default() += 1;
        }
        if let Some((pair_id, &count)) = counts.iter().find(|(_, c)| **c % 2 != 0) {
            return Err(MarkupError::UnpairedItem {
                container: container.0.clone(),
                pair_id: pair_id.to_string(),
                count,
            });
        }

        let mut ids = ItemIds::default();
        let items = markup
            .into_iter()
            .map(|m| MatchItem {
                item: Item::interactive(ids.next_id(), m.text.trim(), false),
                pair_id: m.pair_id,
                side: m.side,
            })
            .collect();

        let mut game = MatchItems {
            container,
            items,
            selected: Vec::with_capacity(2),
            is_processing: false,
            attempts: 0,
            matched: Vec::new(),
            pending: Deferred::new(),
            delays: Delays {
                confirm: config.match_confirm_ms,
                mismatch: config.mismatch_clear_ms,
                summary: config.completion_summary_ms,
            },
            panel: ControlPanel::new(ExerciseKind::MatchItems),
            timer: Timer::new(config.tick_interval_ms),
            rng,
        };
        shuffle(&mut game.rng, &mut game.items);
        game.timer.start(now);
        info!(container = %game.container, pairs = game.total_pairs(), "Match Items mounted");
        Ok(game)
    }

    pub fn match_items(&self) -> &[MatchItem] {
        &self.items
    }

    pub fn selected(&self) -> &[ItemId] {
        &self.selected
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn matched_pairs(&self) -> &[MatchedPair] {
        &self.matched
    }

    pub fn total_pairs(&self) -> usize {
        self.items.len() / 2
    }

    pub fn is_complete(&self) -> bool {
        self.items.iter().all(|m| m.item.flags.disabled)
    }

    /// Toggle `item`'s selection; the second selection starts evaluation.
    pub fn click(&mut self, item: ItemId, now: Millis) -> ClickOutcome {
        if self.is_processing {
            return ClickOutcome::Ignored;
        }
        let Some(m) = self.items.iter_mut().find(|m| m.item.id == item) else {
            return ClickOutcome::Ignored;
        };
        if m.item.flags.disabled {
            return ClickOutcome::Ignored;
        }

        if m.item.flags.selected {
            m.item.flags.selected = false;
            self.selected.retain(|&i| i != item);
            return ClickOutcome::Deselected;
        }
        m.item.flags.selected = true;
        self.selected.push(item);

        if self.selected.len() < 2 {
            return ClickOutcome::Selected;
        }
        self.evaluate(now)
    }

    fn evaluate(&mut self, now: Millis) -> ClickOutcome {
        self.is_processing = true;
        self.attempts += 1;
        let (a, b) = (self.selected[0], self.selected[1]);
        let same_pair = self.pair_id(a).is_some() && self.pair_id(a) == self.pair_id(b);

        if same_pair {
            for id in [a, b] {
                if let Some(m) = self.find_mut(id) {
                    m.item.flags.matched = true;
                    m.item.flags.checkmark = true;
                }
            }
            self.pending.schedule(now + self.delays.confirm, Pending::ConfirmMatch(a, b));
            debug!(container = %self.container, attempts = self.attempts, "pair matched");
            ClickOutcome::Matched
        } else {
            self.pending.schedule(now + self.delays.mismatch, Pending::ClearMismatch(a, b));
            debug!(container = %self.container, attempts = self.attempts, "pair mismatched");
            ClickOutcome::Mismatched
        }
    }

    /// Run deferred feedback that is due by `now`.
    pub fn advance(&mut self, now: Millis) {
        while let Some((due, action)) = self.pending.pop_due(now) {
            match action {
                Pending::ConfirmMatch(a, b) => self.confirm_match(a, b, due),
                Pending::ClearMismatch(a, b) => {
                    for id in [a, b] {
                        if let Some(m) = self.find_mut(id) {
                            m.item.flags.selected = false;
                        }
                    }
                    self.selected.clear();
                    self.is_processing = false;
                }
                Pending::ShowSummary => {
                    self.timer.stop(due);
                    let total = self.total_pairs();
                    self.panel.show_success(total, total);
                    self.panel.attempts = Some(self.attempts);
                    info!(
                        container = %self.container,
                        attempts = self.attempts,
                        time = self.timer.display(),
                        "Match Items complete"
                    );
                }
            }
        }
    }

    fn confirm_match(&mut self, a: ItemId, b: ItemId, due: Millis) {
        let mut texts = Vec::with_capacity(2);
        for id in [a, b] {
            if let Some(m) = self.find_mut(id) {
                m.item.flags.checkmark = false;
                m.item.flags.selected = false;
                m.item.flags.matched = false;
                m.item.flags.disabled = true;
                texts.push(m.item.text.clone());
            }
        }
        if let [first, second] = texts.as_slice() {
            self.matched.push(MatchedPair { first: first.clone(), second: second.clone() });
        }
        self.selected.clear();
        self.is_processing = false;

        if self.is_complete() {
            self.pending.schedule(due + self.delays.summary, Pending::ShowSummary);
        }
    }

    /// Report progress without changing anything.
    pub fn check(&self) -> MatchReport {
        let total = self.total_pairs();
        let done = self.items.iter().filter(|m| m.item.flags.disabled).count() / 2;
        let message = if done == total {
            format!("Perfect! All {total} pairs matched correctly!")
        } else {
            format!("You have matched {done} out of {total} pairs. Keep trying!")
        };
        MatchReport { matched_pairs: done, total_pairs: total, attempts: self.attempts, message }
    }

    fn pair_id(&self, id: ItemId) -> Option<&str> {
        self.items
            .iter()
            .find(|m| m.item.id == id)
            .map(|m| m.pair_id.as_str())
    }

    fn find_mut(&mut self, id: ItemId) -> Option<&mut MatchItem> {
        self.items.iter_mut().find(|m| m.item.id == id)
    }
}

impl Exercise for MatchItems {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::MatchItems
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
        self.items.iter().map(|m| &m.item).collect()
    }

    fn poll(&mut self, now: Millis) {
        self.advance(now);
        self.timer.poll(now);
    }

    fn reset(&mut self, now: Millis) {
        let cancelled = self.pending.clear();
        for m in &mut self.items {
            m.item.flags = Default::default();
        }
        self.matched.clear();
        self.selected.clear();
        self.is_processing = false;
        self.attempts = 0;
        self.panel.restore();
        shuffle(&mut self.rng, &mut self.items);
        self.timer.reset(now);
        debug!(container = %self.container, cancelled, "Match Items reset");
    }
}
