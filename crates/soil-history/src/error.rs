use thiserror::Error;

use soil_core::TimeStep;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("cannot remove the initial entry")]
    AtHead,

    #[error("entry 0 is sealed; edits must be appended as new steps")]
    HeadSealed,

    #[error("history must contain at least the initial entry")]
    Empty,

    #[error("entry {position} has time step {found}, expected {expected}")]
    NonContiguous {
        position: usize,
        expected: TimeStep,
        found:    TimeStep,
    },

    #[error("entry {position} has a {found_rows}x{found_cols} grid, expected {rows}x{cols}")]
    DimensionMismatch {
        position:   usize,
        rows:       u32,
        cols:       u32,
        found_rows: u32,
        found_cols: u32,
    },
}

pub type HistoryResult<T> = Result<T, HistoryError>;
