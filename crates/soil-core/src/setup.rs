//! Run setup: the inputs a fresh simulation is generated from.
//!
//! Typically built by the host application from a form or a JSON file and
//! handed to the controller's `initialize`.

use crate::{CoreError, CoreResult, SimulationParams, StepSize};

/// Grid dimensions.  Fixed for the lifetime of a run.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSize {
    pub rows: u32,
    pub cols: u32,
}

impl GridSize {
    #[inline]
    pub fn cell_count(self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

impl Default for GridSize {
    fn default() -> Self {
        GridSize { rows: 10, cols: 10 }
    }
}

/// How the initial moisture field is filled.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoistureDistribution {
    /// Every cell starts at the given moisture fraction.
    Uniform(f64),
    /// Each cell draws an independent uniform value in `[0, 1)`.
    Random,
}

impl Default for MoistureDistribution {
    fn default() -> Self {
        MoistureDistribution::Uniform(0.5)
    }
}

/// Everything needed to generate a fresh run.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationSetup {
    pub grid_size:        GridSize,
    pub initial_moisture: MoistureDistribution,
    /// Seed for `MoistureDistribution::Random`.  The same seed always
    /// produces the same initial grid.
    pub seed:             u64,
    pub params:           SimulationParams,
    pub step_size:        StepSize,
}

impl SimulationSetup {
    /// Reject empty grids and out-of-domain values before anything is built.
    pub fn validate(&self) -> CoreResult<()> {
        if self.grid_size.rows == 0 || self.grid_size.cols == 0 {
            return Err(CoreError::Config(format!(
                "grid must have at least one cell, got {}x{}",
                self.grid_size.rows, self.grid_size.cols,
            )));
        }
        if let MoistureDistribution::Uniform(m) = self.initial_moisture {
            if !(m.is_finite() && (0.0..=1.0).contains(&m)) {
                return Err(CoreError::Config(format!(
                    "uniform initial moisture {m} is outside [0, 1]"
                )));
            }
        }
        self.params.validate()
    }
}
