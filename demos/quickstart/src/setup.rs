//! Demo setup: defaults, or a JSON file given as the first argument.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use soil_core::{GridSize, MoistureDistribution, SimulationSetup};

pub const DEFAULT_ROWS: u32 = 8;
pub const DEFAULT_COLS: u32 = 8;
pub const DEFAULT_SEED: u64 = 42;

/// Random 8×8 field with default parameters.
pub fn default_setup() -> SimulationSetup {
    SimulationSetup {
        grid_size:        GridSize { rows: DEFAULT_ROWS, cols: DEFAULT_COLS },
        initial_moisture: MoistureDistribution::Random,
        seed:             DEFAULT_SEED,
        ..SimulationSetup::default()
    }
}

/// Read a setup document.  Missing fields take their defaults, e.g.
/// `{"grid_size": {"rows": 4, "cols": 6}, "initial_moisture": {"Uniform": 0.3}}`.
pub fn load_setup(path: &Path) -> Result<SimulationSetup> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading setup file {}", path.display()))?;
    let setup: SimulationSetup = serde_json::from_str(&text)
        .with_context(|| format!("parsing setup file {}", path.display()))?;
    setup.validate()?;
    Ok(setup)
}
