use soil_core::{CoreError, SimulationId, TimeStep};
use soil_grid::GridError;
use soil_history::HistoryError;
use thiserror::Error;

/// Failures reported by a [`PersistenceGateway`](crate::PersistenceGateway).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PersistenceError {
    #[error("no saved simulation with id {0}")]
    NotFound(SimulationId),

    #[error("unsupported export format {0:?}, expected \"json\" or \"csv\"")]
    InvalidExportFormat(String),

    #[error("persistence backend error: {0}")]
    Backend(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("no simulation has been initialized or restored")]
    NotInitialized,

    /// Loading or validating a saved run failed; `source` says why.
    #[error("cannot restore simulation {id}: {source}")]
    Restore {
        id:     SimulationId,
        source: Box<SimError>,
    },

    #[error("document claims time step {claimed} but its history ends at {actual}")]
    TimeStepMismatch {
        claimed: TimeStep,
        actual:  TimeStep,
    },

    #[error("cannot step backward: already at the initial state")]
    BackwardBoundary,

    /// Rejected parameter, step size, or cell coordinates.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("history error: {0}")]
    History(#[from] HistoryError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type SimResult<T> = Result<T, SimError>;
