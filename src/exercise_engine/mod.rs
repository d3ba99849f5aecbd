//! Core exercise engine: the four interactive exercises and the pieces
//! they share.
//!
//! ## Module overview
//!
//! | Module      | Purpose |
//! |-------------|---------|
//! | `models`    | Shared types: ids, items and their CSS flags, control panel |
//! | `shuffle`   | Fisher-Yates shuffle used by every engine |
//! | `timer`     | Clock trait, `M:SS` elapsed-time timer with explicit tick handles |
//! | `scheduler` | Delayed actions (Match Items feedback) |
//! | `drag`      | Drag session, drop insertion point, drop-zone highlights |
//! | `placement` | Zone index for Sort Items (pool / buckets) |
//! | `config`    | `EngineConfig`: seed, delays, fallback counts |
//! | `markup`    | Authored page structure consumed at mount |
//! | `engines`   | Order Items, Match Items, Select All, Sort Items |
//! | `page`      | Mounts a whole page and routes events to instances |

pub mod config;
pub mod drag;
pub mod engines;
pub mod markup;
pub mod models;
pub mod page;
pub mod placement;
pub mod scheduler;
pub mod shuffle;
pub mod timer;

// Re-export the public API surface so callers can use
// `exercise_engine::Page` without reaching into sub-modules.
pub use config::EngineConfig;
pub use drag::{DragSession, DropEffect, ItemBox};
pub use engines::Exercise;
pub use markup::{ExerciseMarkup, PageMarkup};
pub use models::{ContainerId, ControlPanel, ExerciseKind, Item, ItemFlags, ItemId, PanelButton};
pub use page::{ExerciseInstance, Page};
pub use timer::{Clock, ManualClock, Millis, SystemClock, Timer};
