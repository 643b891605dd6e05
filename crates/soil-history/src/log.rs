//! `HistoryLog` — the two-phase append log.

use std::mem;

use soil_core::{SimulationParams, TimeStep};
use soil_grid::Grid;

use crate::{HistoryEntry, HistoryError, HistoryResult, ParameterChanges, UserAction};

/// Which phase the log is in.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Only entry 0 exists and it still absorbs edits in place.
    StagingHead,
    /// At least one step has been appended; entries are immutable.
    Sealed,
}

/// Internal state.  Both variants own the entry vector so a phase change is
/// a re-wrap, not a copy.
#[derive(Clone, Debug)]
enum LogState {
    /// Exactly one entry (time step 0).
    StagingHead(Vec<HistoryEntry>),
    /// Two or more entries, time steps `0..=n`.
    Sealed(Vec<HistoryEntry>),
}

/// Append-only sequence of [`HistoryEntry`] with a mutable staging head.
///
/// Time steps are always `0, 1, …, n` with no gaps.
#[derive(Clone, Debug)]
pub struct HistoryLog {
    state: LogState,
}

impl HistoryLog {
    /// A fresh log holding only the step-0 entry for `grid`.
    pub fn new(grid: Grid, params: SimulationParams) -> Self {
        Self {
            state: LogState::StagingHead(vec![HistoryEntry::initial(grid, params)]),
        }
    }

    /// Rebuild a log from persisted entries.
    ///
    /// Entries must be non-empty, numbered `0..n` without gaps, and share one
    /// grid size.
    pub fn from_entries(entries: Vec<HistoryEntry>) -> HistoryResult<Self> {
        let first = entries.first().ok_or(HistoryError::Empty)?;
        let (rows, cols) = (first.grid.rows(), first.grid.cols());

        for (position, entry) in entries.iter().enumerate() {
            let expected = TimeStep(position as u64);
            if entry.time_step != expected {
                return Err(HistoryError::NonContiguous {
                    position,
                    expected,
                    found: entry.time_step,
                });
            }
            if entry.grid.rows() != rows || entry.grid.cols() != cols {
                return Err(HistoryError::DimensionMismatch {
                    position,
                    rows,
                    cols,
                    found_rows: entry.grid.rows(),
                    found_cols: entry.grid.cols(),
                });
            }
        }

        let state = if entries.len() == 1 {
            LogState::StagingHead(entries)
        } else {
            LogState::Sealed(entries)
        };
        Ok(Self { state })
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        match self.state {
            LogState::StagingHead(_) => Phase::StagingHead,
            LogState::Sealed(_)      => Phase::Sealed,
        }
    }

    /// All entries, oldest first.
    #[inline]
    pub fn entries(&self) -> &[HistoryEntry] {
        match &self.state {
            LogState::StagingHead(v) | LogState::Sealed(v) => v,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Always `false`: the log holds at least entry 0.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn get(&self, step: TimeStep) -> Option<&HistoryEntry> {
        self.entries().get(step.index())
    }

    /// Entry 0.
    pub fn head(&self) -> &HistoryEntry {
        &self.entries()[0]
    }

    /// The newest entry.
    pub fn last(&self) -> &HistoryEntry {
        let entries = self.entries();
        &entries[entries.len() - 1]
    }

    /// Time step of the newest entry.
    pub fn current_step(&self) -> TimeStep {
        self.last().time_step
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries().iter()
    }

    pub fn time_steps(&self) -> impl Iterator<Item = TimeStep> + '_ {
        self.iter().map(|e| e.time_step)
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Append the next step and seal the head.
    ///
    /// # Panics
    /// Panics if `entry.time_step` is not exactly one past the newest entry.
    /// Callers always derive it from [`current_step`](Self::current_step).
    pub fn append(&mut self, entry: HistoryEntry) {
        let expected = self.current_step().next();
        assert_eq!(
            entry.time_step, expected,
            "history append out of order: got {}, expected {}",
            entry.time_step, expected,
        );
        let mut entries = self.take_entries();
        entries.push(entry);
        self.state = LogState::Sealed(entries);
    }

    /// Remove and return the newest entry.
    ///
    /// Returns [`HistoryError::AtHead`] and changes nothing if only entry 0
    /// remains.  Removing the last appended step returns the log to the
    /// staging phase.
    pub fn truncate_last(&mut self) -> HistoryResult<HistoryEntry> {
        if let LogState::StagingHead(_) = self.state {
            return Err(HistoryError::AtHead);
        }
        let mut entries = self.take_entries();
        let removed = entries.pop();
        self.state = if entries.len() == 1 {
            LogState::StagingHead(entries)
        } else {
            LogState::Sealed(entries)
        };
        removed.ok_or(HistoryError::AtHead)
    }

    /// Fold edits made at step 0 into the staging head.
    ///
    /// The head's grid and params are replaced with the post-edit values.
    /// `changes` overwrite existing keys.  Each action replaces an existing
    /// one with the same `(kind, cell, param)` key, else it is appended.
    pub fn merge_into_head(
        &mut self,
        grid:    Grid,
        params:  SimulationParams,
        changes: ParameterChanges,
        actions: Vec<UserAction>,
    ) -> HistoryResult<()> {
        let LogState::StagingHead(entries) = &mut self.state else {
            return Err(HistoryError::HeadSealed);
        };
        let head = &mut entries[0];

        head.grid = grid;
        head.params = params;
        head.parameter_changes.extend(changes);

        for action in actions {
            let key = action.dedup_key();
            match head.user_actions.iter_mut().find(|a| a.dedup_key() == key) {
                Some(existing) => *existing = action,
                None           => head.user_actions.push(action),
            }
        }
        Ok(())
    }

    fn take_entries(&mut self) -> Vec<HistoryEntry> {
        match mem::replace(&mut self.state, LogState::Sealed(Vec::new())) {
            LogState::StagingHead(v) | LogState::Sealed(v) => v,
        }
    }
}
