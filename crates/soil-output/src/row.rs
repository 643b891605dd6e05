//! Flat row type for CSV export.

use soil_core::{CellIndex, SimulationParams};
use soil_grid::Cell;
use soil_history::HistoryEntry;

use crate::OutputResult;

/// One cell at one time step.
#[derive(Clone, Debug, PartialEq)]
pub struct CellRow {
    pub time_step:                u64,
    pub row:                      u32,
    pub col:                      u32,
    /// Moisture × 100, rounded to 2 decimals.
    pub moisture_percentage:      f64,
    /// Moisture × 0.5, rounded to 4 decimals.
    pub moisture_volumetric:      f64,
    pub diffusion_coefficient:    f64,
    pub evapotranspiration_rate:  f64,
    pub irrigation_rate:          f64,
    pub moisture_threshold:       f64,
    pub tap_status:               bool,
    pub override_tap:             bool,
    /// JSON object of the entry's global parameter changes, or empty.
    pub parameter_changes:        String,
    /// JSON array of the entry's actions that target this cell, or empty.
    pub user_actions:             String,
}

impl CellRow {
    pub const HEADERS: [&'static str; 13] = [
        "timeStep",
        "row",
        "col",
        "moisture_percentage",
        "moisture_volumetric",
        "cell_diffusionCoefficient",
        "cell_evapotranspirationRate",
        "cell_irrigationRate",
        "cell_moistureThreshold",
        "tapStatus",
        "overrideTap",
        "parameterChanges",
        "userActions",
    ];

    /// Build the row for `cell` of `entry`.  Cell overrides fall back to
    /// `global`, the document's saved global parameters.
    pub fn new(
        entry:   &HistoryEntry,
        cell:    &Cell,
        cols:    u32,
        global:  &SimulationParams,
        changes: &str,
    ) -> OutputResult<Self> {
        let effective = cell.effective(global);
        let index = CellIndex::from_coords(cell.row(), cell.col(), cols);
        let actions: Vec<_> = entry.actions_for(index).collect();
        let user_actions = if actions.is_empty() {
            String::new()
        } else {
            serde_json::to_string(&actions)?
        };

        Ok(Self {
            time_step:               entry.time_step.0,
            row:                     cell.row(),
            col:                     cell.col(),
            moisture_percentage:     round_to(cell.moisture() * 100.0, 2),
            moisture_volumetric:     round_to(cell.moisture_volumetric(), 4),
            diffusion_coefficient:   effective.diffusion_coefficient,
            evapotranspiration_rate: effective.evapotranspiration_rate,
            irrigation_rate:         effective.irrigation_rate,
            moisture_threshold:      effective.moisture_threshold,
            tap_status:              cell.tap_status(),
            override_tap:            cell.override_tap(),
            parameter_changes:       changes.to_owned(),
            user_actions,
        })
    }

    /// Field values in [`HEADERS`](Self::HEADERS) order.
    pub fn to_record(&self) -> [String; 13] {
        [
            self.time_step.to_string(),
            self.row.to_string(),
            self.col.to_string(),
            self.moisture_percentage.to_string(),
            self.moisture_volumetric.to_string(),
            self.diffusion_coefficient.to_string(),
            self.evapotranspiration_rate.to_string(),
            self.irrigation_rate.to_string(),
            self.moisture_threshold.to_string(),
            self.tap_status.to_string(),
            self.override_tap.to_string(),
            self.parameter_changes.clone(),
            self.user_actions.clone(),
        ]
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
