//! `soil-history` — the replay log behind step-forward / step-backward.
//!
//! # Two phases
//!
//! ```text
//!   StagingHead ──append(t=1)──▶ Sealed ──append(t+1)──▶ Sealed
//!        ▲                          │
//!        └──── truncate_last ───────┘   (back down to a single entry)
//! ```
//!
//! While only entry 0 exists the run is still being set up: edits are
//! merged into that entry (last value wins) instead of growing the log.
//! Once a step has been appended every entry is an immutable point-in-time
//! record; the log only grows at the end or loses its newest entry.
//!
//! Each entry holds a full [`Grid`](soil_grid::Grid), but grids share their
//! cell buffer, so an entry that did not change the grid costs O(1).

pub mod action;
pub mod entry;
pub mod error;
pub mod log;


pub use action::{ActionKind, UserAction};
pub use entry::{HistoryEntry, ParameterChanges};
pub use error::{HistoryError, HistoryResult};
pub use log::{HistoryLog, Phase};
