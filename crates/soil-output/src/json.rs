//! JSON export and document encoding.

use soil_sim::SavedSimulation;

use crate::OutputResult;

/// The export form: pretty-printed with two-space indentation.
pub fn to_json_bytes(simulation: &SavedSimulation) -> OutputResult<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(simulation)?)
}

/// Compact form used for storage.
pub fn to_document(simulation: &SavedSimulation) -> OutputResult<String> {
    Ok(serde_json::to_string(simulation)?)
}

/// Parse a stored document.  Grids are re-validated on the way in.
pub fn from_document(data: &str) -> OutputResult<SavedSimulation> {
    Ok(serde_json::from_str(data)?)
}
