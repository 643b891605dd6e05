//! Read-only projection handed to the presentation layer.

use soil_core::{SimulationId, SimulationParams, StepSize, TimeStep};
use soil_grid::Grid;

use crate::{DisplaySettings, MoistureSample};

/// Everything a front-end needs to draw the current state.
#[derive(Clone, Debug)]
pub struct SimulationView<'a> {
    pub grid:                &'a Grid,
    pub time_step:           TimeStep,
    pub params:              SimulationParams,
    pub running:             bool,
    pub step_size:           StepSize,
    /// `(row, col)` of the tracked cell.
    pub selected_cell:       Option<(u32, u32)>,
    pub series:              &'a [MoistureSample],
    pub display:             DisplaySettings,
    pub has_unsaved_changes: bool,
    pub simulation_id:       Option<SimulationId>,
}
