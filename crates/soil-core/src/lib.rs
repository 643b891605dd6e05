//! `soil-core` — foundational types for the soil moisture grid simulation.
//!
//! This crate is a dependency of every other `soil-*` crate.  It intentionally
//! has no `soil-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `CellIndex`, `SimulationId`                                |
//! | [`params`]      | `ParamName`, `SimulationParams`, `ParamOverrides`, domains |
//! | [`time`]        | `TimeStep`, `StepSize`                                     |
//! | [`setup`]       | `SimulationSetup`, `MoistureDistribution`                  |
//! | [`rng`]         | `SimRng` (seeded grid generation)                          |
//! | [`error`]       | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by `soil-output`.                                 |

pub mod error;
pub mod ids;
pub mod params;
pub mod rng;
pub mod setup;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{CellIndex, SimulationId};
pub use params::{ParamDomain, ParamName, ParamOverrides, SimulationParams};
pub use rng::SimRng;
pub use setup::{GridSize, MoistureDistribution, SimulationSetup};
pub use time::{StepSize, TimeStep};
