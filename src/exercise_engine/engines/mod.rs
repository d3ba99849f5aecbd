//! The four exercise engines.
//!
//! Each engine follows the same lifecycle:
//!
//! ```text
//! mount (validate markup, build items) -> randomize -> timer start
//!     -> user events (drag / click / key) -> check -> reset -> ...
//! ```
//!
//! Engines never read a clock. Every operation that depends on time takes
//! `now: Millis` from the caller, which keeps them deterministic under test.

pub mod matching;
pub mod order;
pub mod select_all;
pub mod sort;

use crate::exercise_engine::{
    models::{ContainerId, ControlPanel, ExerciseKind, Item},
    timer::{Millis, Timer},
};

/// Operations every mounted exercise supports.
pub trait Exercise {
    fn kind(&self) -> ExerciseKind;

    fn container(&self) -> &ContainerId;

    fn panel(&self) -> &ControlPanel;

    fn timer(&self) -> &Timer;

    /// Items in presentation order.
    fn items(&self) -> Vec<&Item>;

    /// Run time-driven work that has come due: timer ticks and deferred
    /// feedback.
    fn poll(&mut self, now: Millis);

    /// Back to a freshly randomized, unattempted state with a new timer.
    fn reset(&mut self, now: Millis);
}
