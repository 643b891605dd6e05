//! The persisted form of a run.
//!
//! JSON field names are camelCase so documents written by earlier front-end
//! versions load unchanged.

use soil_core::{GridSize, MoistureDistribution, SimulationParams, StepSize, TimeStep};
use soil_history::HistoryEntry;

use crate::MoistureSample;

/// Initial moisture distribution as recorded in a snapshot.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitialDistribution {
    Uniform,
    Random,
}

/// How the run was originally set up.  Informational: a restore rebuilds the
/// run from `grid_history`, not from these values.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SetupParams {
    pub grid_size:                     GridSize,
    pub initial_moisture_distribution: InitialDistribution,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub initial_moisture_value:        Option<f64>,
}

impl SetupParams {
    pub fn new(grid_size: GridSize, distribution: MoistureDistribution) -> Self {
        let (initial_moisture_distribution, initial_moisture_value) = match distribution {
            MoistureDistribution::Uniform(v) => (InitialDistribution::Uniform, Some(v)),
            MoistureDistribution::Random     => (InitialDistribution::Random, None),
        };
        Self { grid_size, initial_moisture_distribution, initial_moisture_value }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorScheme {
    #[default]
    Default,
    Blue,
    Grayscale,
}

/// Presentation preferences stored alongside the run.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct DisplaySettings {
    pub color_scheme:            ColorScheme,
    pub display_values_in_cells: bool,
}

/// A complete saved run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SavedSimulation {
    pub name:              String,
    pub setup_params:      SetupParams,
    pub simulation_params: SimulationParams,
    #[cfg_attr(feature = "serde", serde(default))]
    pub display_settings:  DisplaySettings,
    pub grid_history:      Vec<HistoryEntry>,
    pub time_step:         TimeStep,
    #[cfg_attr(feature = "serde", serde(default))]
    pub time_step_size:    StepSize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub moisture_history:  Vec<MoistureSample>,
}
