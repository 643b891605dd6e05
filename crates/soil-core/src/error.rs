//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`, so a rejected parameter surfaces unchanged all the
//! way up to the controller.

use thiserror::Error;

use crate::ParamName;

/// The top-level error type for `soil-core` and a common base for sub-crates.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("{name} = {value} is outside its domain [{min}, {max}]")]
    InvalidParameter {
        name:  ParamName,
        value: f64,
        min:   f64,
        max:   f64,
    },

    #[error("time-step size {0} h is outside [{min}, {max}]", min = crate::StepSize::MIN_HOURS, max = crate::StepSize::MAX_HOURS)]
    InvalidStepSize(f64),

    #[error("unknown parameter name {0:?}")]
    UnknownParameter(String),

    #[error("cell ({row}, {col}) is outside a {rows}x{cols} grid")]
    CellOutOfBounds {
        row:  u32,
        col:  u32,
        rows: u32,
        cols: u32,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `soil-core`.
pub type CoreResult<T> = Result<T, CoreError>;
