//! CSV export.
//!
//! Rows are written entry by entry, cells in row-major order, under a
//! single header line (see [`CellRow::HEADERS`]).

use std::io::Write;

use csv::Writer;
use soil_sim::SavedSimulation;

use crate::{CellRow, OutputResult};

/// Write `simulation` as CSV to `out`.
pub fn write_csv<W: Write>(simulation: &SavedSimulation, out: W) -> OutputResult<()> {
    let mut writer = Writer::from_writer(out);
    writer.write_record(CellRow::HEADERS)?;

    let global = &simulation.simulation_params;
    for entry in &simulation.grid_history {
        let changes = if entry.parameter_changes.is_empty() {
            String::new()
        } else {
            serde_json::to_string(&entry.parameter_changes)?
        };
        let cols = entry.grid.cols();
        for cell in entry.grid.cells() {
            let row = CellRow::new(entry, cell, cols, global, &changes)?;
            writer.write_record(row.to_record())?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn to_csv_bytes(simulation: &SavedSimulation) -> OutputResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(simulation, &mut buf)?;
    Ok(buf)
}
