//! # course_drills
//!
//! Headless engines for the interactive exercises embedded in course pages:
//! **Order Items**, **Match Items**, **Select All** and **Sort Items**.
//!
//! Each exercise is a self-contained state machine that randomizes its
//! content, tracks what the learner drags or clicks, scores the result and
//! runs an elapsed-time display with a reset / replay lifecycle. The crate
//! owns no DOM: a host page feeds it authored markup, user events and the
//! current time, and renders the JSON view it gets back.
//!
//! ## How it works
//!
//! 1. Describe the page as JSON (see [`exercise_engine::markup`]) and build
//!    a [`Page`] with an [`EngineConfig`] and a [`Clock`].
//! 2. Every exercise is mounted: markup is validated (a broken exercise is
//!    skipped, the rest still mount), items are shuffled and the timer starts.
//! 3. Route user events to the instance (`order_mut`, `match_mut`,
//!    `select_all_mut`, `sort_mut`) and call [`Page::poll`] periodically to
//!    tick timers and play out delayed feedback.
//! 4. [`dom_adapter::render_page`] turns the state into the classes, control
//!    panel and texts the page applies to the DOM.
//!
//! ## Quick start
//!
//! ```rust
//! use course_drills::{Clock, ContainerId, EngineConfig, ManualClock, Page};
//!
//! let doc = r#"{ "exercises": [
//!     { "kind": "select_all", "container": "colours", "list": [
//!         { "text": "Red", "correct": true },
//!         { "text": "Dog" },
//!         { "text": "Blue", "correct": true } ] }
//! ] }"#;
//!
//! let clock = ManualClock::new(0);
//! let mut page = Page::from_json(doc, EngineConfig::seeded(42), clock.clone()).unwrap();
//!
//! let id = ContainerId::from("colours");
//! let exercise = page.select_all_mut(&id).unwrap();
//! let picks: Vec<_> = exercise
//!     .select_items()
//!     .iter()
//!     .filter(|s| s.correct)
//!     .map(|s| s.item.id)
//!     .collect();
//! for item in picks {
//!     exercise.click(item);
//! }
//!
//! clock.advance(12_000);
//! let report = exercise.check(clock.now_ms());
//! assert_eq!(report.score_text(), "2/2");
//!
//! let view = course_drills::dom_adapter::render_page(&page);
//! assert_eq!(view["instances"][0]["control_panel"]["timer_text"], "0:12");
//! ```

pub mod dom_adapter;
pub mod error;
pub mod exercise_engine;

// Convenience re-exports so callers can use `course_drills::Page`
// directly without reaching into `exercise_engine::`.
pub use error::{MarkupError, PageError, Result};
pub use exercise_engine::{
    Clock, ContainerId, ControlPanel, DragSession, DropEffect, EngineConfig, Exercise,
    ExerciseInstance, ExerciseKind, ExerciseMarkup, Item, ItemBox, ItemFlags, ItemId, ManualClock,
    Millis, Page, PageMarkup, PanelButton, SystemClock, Timer,
};
