use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::MarkupError;
use crate::exercise_engine::{
    config::EngineConfig,
    engines::Exercise,
    markup::SelectItemMarkup,
    models::{ContainerId, ControlPanel, ExerciseKind, Item, ItemId, ItemIds},
    shuffle::shuffle,
    timer::{Millis, Timer},
};

#[derive(Debug, Clone)]
pub struct SelectItem {
    pub item: Item,
    /// Author flag: this item belongs in the answer.
    pub correct: bool,
}

/// Keys that act on a focused item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Space,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectReport {
    pub correct_selections: usize,
    pub total_correct: usize,
    pub incorrect_selections: usize,
}

impl SelectReport {
    pub fn score_text(&self) -> String {
        format!("{}/{}", self.correct_selections, self.total_correct)
    }
}

/// Multi-select exercise: pick every correct item, then check.
#[derive(Debug)]
pub struct SelectAll {
    container: ContainerId,
    items: Vec<SelectItem>,
    revealed: bool,
    panel: ControlPanel,
    timer: Timer,
    rng: StdRng,
}

impl SelectAll {
    pub fn mount(
        container: ContainerId,
        list: Option<Vec<SelectItemMarkup>>,
        config: &EngineConfig,
        rng: StdRng,
        now: Millis,
    ) -> Result<Self, MarkupError> {
        let list = list.ok_or_else(|| MarkupError::MissingList { container: container.0.clone() })?;
        if list.is_empty() {
            return Err(MarkupError::Empty { container: container.0.clone() });
        }
        let mut ids = ItemIds::default();
        let items = list
            .into_iter()
            .map(|m| SelectItem {
                item: Item::interactive(ids.next_id(), m.text.trim(), false),
                correct: m.correct,
            })
            .collect();

        let mut exercise = SelectAll {
            container,
            items,
            revealed: false,
            panel: ControlPanel::new(ExerciseKind::SelectAll),
            timer: Timer::new(config.tick_interval_ms),
            rng,
        };
        shuffle(&mut exercise.rng, &mut exercise.items);
        exercise.timer.start(now);
        info!(container = %exercise.container, items = exercise.items.len(), "Select All mounted");
        Ok(exercise)
    }

    pub fn select_items(&self) -> &[SelectItem] {
        &self.items
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// `aria-checked` value for `item`.
    pub fn aria_checked(&self, item: ItemId) -> Option<bool> {
        self.find(item).map(|s| s.item.flags.selected)
    }

    /// Toggle one item. Returns whether anything changed.
    pub fn click(&mut self, item: ItemId) -> bool {
        if self.revealed {
            return false;
        }
        let Some(s) = self.items.iter_mut().find(|s| s.item.id == item) else {
            return false;
        };
        s.item.flags.selected = !s.item.flags.selected;
        debug!(container = %self.container, %item, selected = s.item.flags.selected, "toggled");
        true
    }

    /// Enter and Space toggle like a click. Returns whether the key was
    /// consumed (the host then prevents the default action).
    pub fn key(&mut self, item: ItemId, key: Key) -> bool {
        match key {
            Key::Enter | Key::Space => {
                self.click(item);
                true
            }
            Key::Other => false,
        }
    }

    /// Reveal every item, score the selection and stop the timer.
    pub fn check(&mut self, now: Millis) -> SelectReport {
        let mut report = SelectReport { correct_selections: 0, total_correct: 0, incorrect_selections: 0 };
        for s in &mut self.items {
            s.item.flags.revealed = true;
            let selected = s.item.flags.selected;
            if s.correct {
                report.total_correct += 1;
                if selected {
                    report.correct_selections += 1;
                }
            } else if selected {
                s.item.flags.incorrect = true;
                report.incorrect_selections += 1;
            }
        }
        if !self.revealed {
            self.revealed = true;
            self.timer.stop(now);
            info!(container = %self.container, score = %report.score_text(), "Select All checked");
        }
        self.panel.show_success(report.correct_selections, report.total_correct);
        report
    }

    fn find(&self, item: ItemId) -> Option<&SelectItem> {
        self.items.iter().find(|s| s.item.id == item)
    }
}

impl Exercise for SelectAll {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::SelectAll
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
        self.items.iter().map(|s| &s.item).collect()
    }

    fn poll(&mut self, now: Millis) {
        self.timer.poll(now);
    }

    fn reset(&mut self, now: Millis) {
        for s in &mut self.items {
            s.item.flags = Default::default();
        }
        self.revealed = false;
        self.panel.restore();
        shuffle(&mut self.rng, &mut self.items);
        self.timer.reset(now);
        debug!(container = %self.container, "Select All reset");
    }
}
