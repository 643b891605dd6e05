//! `soil-sim` — the simulation controller.
//!
//! [`SimulationController`] is the only thing that mutates a run.  Every
//! mutation goes through the [`HistoryLog`](soil_history::HistoryLog):
//!
//! ```text
//!   advance()              → apply_step, append entry t+1
//!   step_backward()        → truncate newest entry, restore grid + params
//!   user action / param    → t == 0: merge into the staging head
//!                            t >  0: append an event-only entry t+1
//!   reset()                → baseline grid, fresh step-0 entry
//! ```
//!
//! The host drives time by calling [`SimulationController::on_timer`] every
//! [`ControllerConfig::tick_period`]; the controller advances only while
//! running.
//!
//! Persistence is a collaborator: [`PersistenceGateway`] is implemented by the
//! backends in `soil-output` (or by the host).  Saving is split into
//! [`begin_save`](SimulationController::begin_save) and
//! [`complete_save`](SimulationController::complete_save) so the I/O can run
//! elsewhere while the run keeps stepping.
//!
//! # Cargo features
//!
//! | Feature | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Serde derives on the snapshot model and everything it holds. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use soil_core::SimulationSetup;
//! use soil_sim::{NoopObserver, SimulationController};
//!
//! let mut sim = SimulationController::default();
//! sim.initialize(&SimulationSetup::default())?;
//! sim.toggle_tap(2, 3)?;
//! sim.run_steps(24, &mut NoopObserver)?;
//! let id = sim.save(&mut store)?;
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod observer;
pub mod series;
pub mod snapshot;
pub mod view;


pub use config::ControllerConfig;
pub use controller::{SaveTicket, SimulationController};
pub use error::{PersistenceError, PersistenceResult, SimError, SimResult};
pub use gateway::{ExportFormat, PersistenceGateway};
pub use observer::{NoopObserver, SimulationObserver};
pub use series::{MoistureSample, MoistureSeries};
pub use snapshot::{ColorScheme, DisplaySettings, InitialDistribution, SavedSimulation, SetupParams};
pub use view::SimulationView;
