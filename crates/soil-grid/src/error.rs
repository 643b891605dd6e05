use soil_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,

    #[error("row {row} has {got} cells, expected {expected}")]
    Ragged {
        row:      usize,
        expected: usize,
        got:      usize,
    },

    #[error("cell at position ({row}, {col}) claims coordinates ({claimed_row}, {claimed_col})")]
    Coordinates {
        row:         u32,
        col:         u32,
        claimed_row: u32,
        claimed_col: u32,
    },

    #[error("moisture {value} at ({row}, {col}) is outside [0, 1]")]
    MoistureOutOfRange {
        row:   u32,
        col:   u32,
        value: f64,
    },

    #[error("moisture must be a finite number, got {0}")]
    NonFiniteMoisture(f64),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type GridResult<T> = Result<T, GridError>;
