//! Controller configuration.

use std::time::Duration;

/// Settings for the host's timer loop.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ControllerConfig {
    /// Wall-clock period between [`on_timer`](crate::SimulationController::on_timer)
    /// calls, in milliseconds.
    pub tick_period_ms: u64,
}

impl ControllerConfig {
    pub const DEFAULT_TICK_PERIOD_MS: u64 = 1_000;

    #[inline]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self { tick_period_ms: Self::DEFAULT_TICK_PERIOD_MS }
    }
}
