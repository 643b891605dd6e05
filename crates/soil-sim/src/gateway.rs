//! The persistence contract.

use std::fmt;
use std::str::FromStr;

use soil_core::SimulationId;

use crate::{PersistenceError, PersistenceResult, SavedSimulation};

/// Export encodings understood by [`PersistenceGateway::export`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ExportFormat {
    /// The saved document, pretty-printed.
    Json,
    /// One row per (time step, cell).
    Csv,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv  => "csv",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv  => "text/csv",
        }
    }

    /// Download file name for an exported run, e.g. `simulation_7_export.csv`.
    pub fn file_name(self, id: SimulationId) -> String {
        format!("simulation_{}_export.{}", id.0, self.as_str())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = PersistenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(ExportFormat::Json),
            "csv"  => Ok(ExportFormat::Csv),
            other  => Err(PersistenceError::InvalidExportFormat(other.to_owned())),
        }
    }
}

/// Storage for saved runs.
///
/// Implementations decide where documents live.  The controller only calls
/// these methods from its save, restore and export operations and never
/// retries a failure.
pub trait PersistenceGateway {
    /// Store a new document and return its id.
    fn save(&mut self, simulation: &SavedSimulation) -> PersistenceResult<SimulationId>;

    /// Fetch a stored document.  [`PersistenceError::NotFound`] if absent.
    fn load(&self, id: SimulationId) -> PersistenceResult<SavedSimulation>;

    /// Encode a stored document in `format`.
    fn export(&self, id: SimulationId, format: ExportFormat) -> PersistenceResult<Vec<u8>>;
}
