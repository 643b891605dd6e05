//! `soil-grid` — the moisture grid and its per-step update rule.
//!
//! # Update rule
//!
//! ```text
//! for every cell, reading only the previous grid:
//!   ① resolve     — per-cell override, else the global parameter
//!   ② tap         — unless pinned by the user: tap = moisture < threshold
//!   ③ source/sink — +irrigation·dt if tap on, else −evapotranspiration·dt
//!   ④ diffusion   — Σ over existing 4-neighbours of
//!                     mean(D_cell, D_neighbour) · (m_neighbour − m_cell) · dt
//!   ⑤ clamp       — moisture ← clamp(moisture + Σ deltas, 0, 1)
//! ```
//!
//! [`apply_step`] never mutates its input, so every cell sees the same
//! consistent snapshot and a history entry can keep sharing the old buffer.
//!
//! # Storage
//!
//! A [`Grid`] is a flat row-major `Arc<Vec<Cell>>`.  Cloning a grid is O(1);
//! mutating a cell copies the buffer only if another snapshot still holds it.

pub mod cell;
pub mod error;
pub mod grid;
pub mod step;

#[cfg(feature = "serde")]
mod serde_impl;

#[cfg(test)]
mod tests;

pub use cell::{Cell, VOLUMETRIC_SCALE};
pub use error::{GridError, GridResult};
pub use grid::Grid;
pub use step::apply_step;
