//! Moisture time series of the selected cell, for charting.

use soil_core::{CellIndex, TimeStep};
use soil_grid::{Cell, Grid};

/// One point of the series.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MoistureSample {
    pub time:                TimeStep,
    pub moisture:            f64,
    pub moisture_volumetric: f64,
}

impl MoistureSample {
    pub fn of(cell: &Cell, time: TimeStep) -> Self {
        Self {
            time,
            moisture:            cell.moisture(),
            moisture_volumetric: cell.moisture_volumetric(),
        }
    }
}

/// Samples of one tracked cell, ordered by time step with at most one sample
/// per step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoistureSeries {
    cell:    Option<CellIndex>,
    samples: Vec<MoistureSample>,
}

impl MoistureSeries {
    /// A series restored from a snapshot.  No cell is tracked until one is
    /// selected again.
    pub fn from_samples(samples: Vec<MoistureSample>) -> Self {
        Self { cell: None, samples }
    }

    #[inline]
    pub fn cell(&self) -> Option<CellIndex> {
        self.cell
    }

    #[inline]
    pub fn samples(&self) -> &[MoistureSample] {
        &self.samples
    }

    /// Track `cell`.  A different cell (or `None`) discards the old samples;
    /// a newly tracked cell starts with its value at `time`.
    pub fn select(&mut self, cell: Option<CellIndex>, grid: &Grid, time: TimeStep) {
        if cell == self.cell {
            return;
        }
        self.cell = cell;
        self.samples.clear();
        self.record(grid, time);
    }

    /// Record the tracked cell's value at `time`, replacing an existing
    /// sample for the same step.  No-op when nothing is tracked.
    pub fn record(&mut self, grid: &Grid, time: TimeStep) {
        let Some(sample) = self.cell.and_then(|i| grid.cell(i)).map(|c| MoistureSample::of(c, time)) else {
            return;
        };
        self.truncate_after(time);
        match self.samples.last_mut() {
            Some(last) if last.time == time => *last = sample,
            _                               => self.samples.push(sample),
        }
    }

    /// Drop samples newer than `time`.
    pub fn truncate_after(&mut self, time: TimeStep) {
        let keep = self.samples.partition_point(|s| s.time <= time);
        self.samples.truncate(keep);
    }

    /// Drop every sample and start over at `time`, keeping the selection.
    pub fn restart(&mut self, grid: &Grid, time: TimeStep) {
        self.samples.clear();
        self.record(grid, time);
    }
}
