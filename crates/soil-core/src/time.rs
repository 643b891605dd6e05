//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `TimeStep` counter.  How much simulated
//! time one step covers is held separately in `StepSize` (hours), which the
//! user may change between steps:
//!
//!   moisture delta per step = rate_per_hour * step_size.hours()
//!
//! Using an integer step as the canonical history key keeps the log exactly
//! indexable (`log[step]`) no matter how the step size varies.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── TimeStep ──────────────────────────────────────────────────────────────────

/// Logical time step of a simulation run.  Step 0 is the setup state.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TimeStep(pub u64);

impl TimeStep {
    pub const ZERO: TimeStep = TimeStep(0);

    /// The step after `self`.
    #[inline]
    pub fn next(self) -> TimeStep {
        TimeStep(self.0 + 1)
    }

    /// The step before `self`, or `None` at step 0.
    #[inline]
    pub fn prev(self) -> Option<TimeStep> {
        self.0.checked_sub(1).map(TimeStep)
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::ops::Add<u64> for TimeStep {
    type Output = TimeStep;
    #[inline]
    fn add(self, rhs: u64) -> TimeStep {
        TimeStep(self.0 + rhs)
    }
}

impl fmt::Display for TimeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

// ── StepSize ──────────────────────────────────────────────────────────────────

/// Simulated hours covered by one step.  Always within
/// `[MIN_HOURS, MAX_HOURS]`.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct StepSize(f64);

impl StepSize {
    pub const MIN_HOURS: f64 = 0.1;
    pub const MAX_HOURS: f64 = 24.0;
    pub const ONE_HOUR: StepSize = StepSize(1.0);

    pub fn from_hours(hours: f64) -> CoreResult<StepSize> {
        if hours.is_finite() && (Self::MIN_HOURS..=Self::MAX_HOURS).contains(&hours) {
            Ok(StepSize(hours))
        } else {
            Err(CoreError::InvalidStepSize(hours))
        }
    }

    #[inline]
    pub fn hours(self) -> f64 {
        self.0
    }
}

impl Default for StepSize {
    fn default() -> Self {
        Self::ONE_HOUR
    }
}

impl TryFrom<f64> for StepSize {
    type Error = CoreError;
    fn try_from(hours: f64) -> CoreResult<StepSize> {
        StepSize::from_hours(hours)
    }
}

impl From<StepSize> for f64 {
    fn from(s: StepSize) -> f64 {
        s.0
    }
}

impl fmt::Display for StepSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} h", self.0)
    }
}
