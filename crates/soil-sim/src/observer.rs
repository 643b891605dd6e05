//! Observer trait for headless runs.

use soil_core::TimeStep;
use soil_grid::Grid;
use soil_history::HistoryEntry;

/// Callbacks invoked by [`SimulationController::run_steps`][crate::SimulationController::run_steps].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — mean moisture printer
///
/// ```rust,ignore
/// struct MeanPrinter;
///
/// impl SimulationObserver for MeanPrinter {
///     fn on_step(&mut self, entry: &HistoryEntry) {
///         println!("{}: mean {:.3}", entry.time_step, entry.grid.mean_moisture());
///     }
/// }
/// ```
pub trait SimulationObserver {
    /// Called once before the first step, with the grid the run starts from.
    fn on_run_start(&mut self, _start: TimeStep, _grid: &Grid) {}

    /// Called after each step has been appended to the history.
    fn on_step(&mut self, _entry: &HistoryEntry) {}

    /// Called once after the last step.
    fn on_run_end(&mut self, _final_step: TimeStep) {}
}

/// A [`SimulationObserver`] that does nothing.
pub struct NoopObserver;

impl SimulationObserver for NoopObserver {}
