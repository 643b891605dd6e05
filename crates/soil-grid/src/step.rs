//! The per-step moisture update.

use soil_core::{ParamName, SimulationParams};

use crate::{Cell, Grid};

/// Advance `grid` by one step of `dt_hours` and return the new grid.
///
/// Pure: reads only `grid`, `params` and `dt_hours`.  Every cell is updated
/// from the same previous snapshot (Jacobi style), and neighbours are
/// visited in a fixed order, so the result is bit-reproducible.
///
/// Per-cell overrides are resolved here, against the `params` passed in,
/// never earlier.
pub fn apply_step(grid: &Grid, params: &SimulationParams, dt_hours: f64) -> Grid {
    let prev = grid.cells();

    let next: Vec<Cell> = prev
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let eff = cell.effective(params);
            let mut out = cell.clone();

            if !out.override_tap {
                out.tap_status = cell.moisture() < eff.moisture_threshold;
            }

            let mut delta = if out.tap_status {
                eff.irrigation_rate * dt_hours
            } else {
                -eff.evapotranspiration_rate * dt_hours
            };

            for n in grid.neighbours(i) {
                let neighbour = &prev[n];
                let d_neighbour = neighbour
                    .overrides
                    .resolve_one(ParamName::DiffusionCoefficient, params);
                let d_pair = (eff.diffusion_coefficient + d_neighbour) / 2.0;
                delta += d_pair * (neighbour.moisture() - cell.moisture()) * dt_hours;
            }

            out.store_clamped(cell.moisture() + delta);
            out
        })
        .collect();

    Grid::from_parts(grid.rows(), grid.cols(), next)
}
