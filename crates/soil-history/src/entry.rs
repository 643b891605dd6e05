//! One record of the history log.

use std::collections::BTreeMap;

use soil_core::{ParamName, SimulationParams, TimeStep};
use soil_grid::Grid;

use crate::UserAction;

/// Global parameter changes applied at one step, keyed by parameter.
/// Ordered by [`ParamName`] declaration order.
pub type ParameterChanges = BTreeMap<ParamName, f64>;

/// The state of the run at one time step plus what the user did there.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct HistoryEntry {
    pub time_step:         TimeStep,
    pub grid:              Grid,
    /// Global parameters in effect at this step.
    pub params:            SimulationParams,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameter_changes: ParameterChanges,
    #[cfg_attr(feature = "serde", serde(default))]
    pub user_actions:      Vec<UserAction>,
}

impl HistoryEntry {
    /// The step-0 entry of a fresh log.
    pub fn initial(grid: Grid, params: SimulationParams) -> Self {
        Self::step(TimeStep::ZERO, grid, params)
    }

    /// A plain simulation step: no parameter changes, no actions.
    pub fn step(time_step: TimeStep, grid: Grid, params: SimulationParams) -> Self {
        Self {
            time_step,
            grid,
            params,
            parameter_changes: ParameterChanges::new(),
            user_actions:      Vec::new(),
        }
    }

    /// An event-only step carrying edits made after the run started.
    pub fn event(
        time_step: TimeStep,
        grid:      Grid,
        params:    SimulationParams,
        changes:   ParameterChanges,
        actions:   Vec<UserAction>,
    ) -> Self {
        Self {
            time_step,
            grid,
            params,
            parameter_changes: changes,
            user_actions:      actions,
        }
    }

    /// Actions in this entry that target `cell`.
    pub fn actions_for(&self, cell: soil_core::CellIndex) -> impl Iterator<Item = &UserAction> + '_ {
        self.user_actions.iter().filter(move |a| a.cell_index() == Some(cell))
    }
}
