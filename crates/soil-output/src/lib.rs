//! `soil-output` — export encoders and persistence backends.
//!
//! Two export encodings, selected by [`ExportFormat`](soil_sim::ExportFormat):
//!
//! | Format | Output                                                         |
//! |--------|----------------------------------------------------------------|
//! | `json` | The saved document, pretty-printed, camelCase keys.            |
//! | `csv`  | One [`CellRow`] per (time step, cell), effective parameters resolved. |
//!
//! Two reference [`PersistenceGateway`](soil_sim::PersistenceGateway)
//! backends:
//!
//! | Feature   | Backend         | Storage                                      |
//! |-----------|-----------------|----------------------------------------------|
//! | *(none)*  | [`MemoryStore`] | `BTreeMap` in process memory                 |
//! | `sqlite`  | `SqliteStore`   | `simulations(id, name, data)` table, JSON `data` |
//!
//! # Usage
//!
//! ```rust,ignore
//! use soil_output::MemoryStore;
//! use soil_sim::ExportFormat;
//!
//! let mut store = MemoryStore::new();
//! let csv = sim.export(&mut store, ExportFormat::Csv)?;
//! std::fs::write(ExportFormat::Csv.file_name(sim.simulation_id().unwrap()), csv)?;
//! ```

pub mod csv;
pub mod error;
pub mod json;
pub mod memory;
pub mod row;

#[cfg(feature = "sqlite")]
pub mod sqlite;


use soil_sim::{ExportFormat, SavedSimulation};

pub use error::{OutputError, OutputResult};
pub use memory::MemoryStore;
pub use row::CellRow;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// Encode `simulation` in `format`.
pub fn encode(simulation: &SavedSimulation, format: ExportFormat) -> OutputResult<Vec<u8>> {
    match format {
        ExportFormat::Json => json::to_json_bytes(simulation),
        ExportFormat::Csv  => csv::to_csv_bytes(simulation),
    }
}
