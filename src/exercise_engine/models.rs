use std::fmt;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Identity of one mounted exercise: the id of the DOM container it owns.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub String);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContainerId {
    fn from(s: &str) -> Self {
        ContainerId(s.to_string())
    }
}

/// Handle of one item element inside an instance.
///
/// Ids are never reused within an instance: rebuilding items on Reset hands
/// out fresh ids, so a handle held across a rebuild simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

/// Monotonic item id source owned by one instance.
#[derive(Debug, Default, Clone)]
pub struct ItemIds {
    next: u32,
}

impl ItemIds {
    pub fn next_id(&mut self) -> ItemId {
        let id = ItemId(self.next);
        self.next += 1;
        id
    }
}

// ---------------------------------------------------------------------------
// Exercise kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseKind {
    OrderItems,
    MatchItems,
    SelectAll,
    SortItems,
}

impl ExerciseKind {
    /// Class name the engine scans the page for.
    pub fn container_class(self) -> &'static str {
        match self {
            ExerciseKind::OrderItems => "dp-order-wrapper",
            ExerciseKind::MatchItems => "dp-match-items",
            ExerciseKind::SelectAll  => "dp-si-sa",
            ExerciseKind::SortItems  => "dp-si-sort-pool",
        }
    }

    /// Class name of the control panel injected after the container.
    pub fn panel_class(self) -> &'static str {
        match self {
            ExerciseKind::OrderItems => "dp-order-controls",
            ExerciseKind::MatchItems => "match-controls",
            ExerciseKind::SelectAll  => "dp-sa-controls",
            ExerciseKind::SortItems  => "sort-controls",
        }
    }

    /// Class the control panel gains once the exercise is solved.
    pub fn success_class(self) -> &'static str {
        match self {
            ExerciseKind::OrderItems | ExerciseKind::SelectAll => "success",
            ExerciseKind::MatchItems => "game-complete",
            ExerciseKind::SortItems  => "sort-success",
        }
    }

    /// Buttons present on a freshly mounted (or reset) panel.
    pub fn default_buttons(self) -> Vec<PanelButton> {
        match self {
            ExerciseKind::SortItems => vec![PanelButton::Check, PanelButton::Shuffle, PanelButton::Reset],
            _ => vec![PanelButton::Check, PanelButton::Reset],
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExerciseKind::OrderItems => "Order Items",
            ExerciseKind::MatchItems => "Match Items",
            ExerciseKind::SelectAll  => "Select All",
            ExerciseKind::SortItems  => "Sort Items",
        };
        write!(f, "{}", s)
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Transient UI state of one item. Each flag maps to one CSS class.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFlags {
    pub selected: bool,
    pub matched: bool,
    pub disabled: bool,
    pub revealed: bool,
    pub incorrect: bool,
    pub correct: bool,
    pub dragging: bool,
    /// A checkmark span is attached to the item.
    pub checkmark: bool,
}

impl ItemFlags {
    /// CSS classes for the flags that are set, in a stable order.
    pub fn classes(&self) -> Vec<&'static str> {
        let table = [
            (self.selected,  "selected"),
            (self.matched,   "matched"),
            (self.disabled,  "disabled"),
            (self.revealed,  "revealed"),
            (self.incorrect, "incorrect"),
            (self.correct,   "correct"),
            (self.dragging,  "dragging"),
        ];
        table.iter().filter(|(on, _)| *on).map(|(_, c)| *c).collect()
    }
}

/// One draggable or clickable leaf element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    pub draggable: bool,
    pub flags: ItemFlags,
}

impl Item {
    /// Build an item ready for interaction. Mount and rebuild both go
    /// through here.
    pub fn interactive(id: ItemId, text: impl Into<String>, draggable: bool) -> Self {
        Item {
            id,
            text: text.into(),
            draggable,
            flags: ItemFlags::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Control panel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelButton {
    Check,
    Shuffle,
    Reset,
}

impl PanelButton {
    pub fn label(self) -> &'static str {
        match self {
            PanelButton::Check   => "Check",
            PanelButton::Shuffle => "Shuffle",
            PanelButton::Reset   => "Reset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelState {
    Active,
    Success,
}

/// The controls injected right after an exercise container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPanel {
    pub kind: ExerciseKind,
    pub buttons: Vec<PanelButton>,
    pub state: PanelState,
    /// `correct/total` once a score is known.
    pub score_text: Option<String>,
    /// Attempt counter, only shown by Match Items.
    pub attempts: Option<u32>,
}

impl ControlPanel {
    pub fn new(kind: ExerciseKind) -> Self {
        ControlPanel {
            kind,
            buttons: kind.default_buttons(),
            state: PanelState::Active,
            score_text: None,
            attempts: (kind == ExerciseKind::MatchItems).then_some(0),
        }
    }

    pub fn is_success(&self) -> bool {
        self.state == PanelState::Success
    }

    pub fn show_success(&mut self, correct: usize, total: usize) {
        self.state = PanelState::Success;
        self.score_text = Some(format!("{correct}/{total}"));
    }

    /// Back to the freshly mounted layout.
    pub fn restore(&mut self) {
        *self = ControlPanel::new(self.kind);
    }
}
