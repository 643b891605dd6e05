//! A single grid position.

use soil_core::{CoreResult, ParamName, ParamOverrides, SimulationParams};

use crate::{GridError, GridResult};

/// Volumetric water content of a fully saturated cell (m³/m³).
///
/// `moisture_volumetric = moisture * VOLUMETRIC_SCALE`, always derived on
/// read, never stored.
pub const VOLUMETRIC_SCALE: f64 = 0.5;

/// One cell of the moisture grid.
///
/// Fields are crate-private: coordinates are fixed at construction, moisture is
/// clamped on every write and overrides are checked against the parameter
/// domains.  Serialisation also emits the derived `moistureVolumetric`,
/// which is ignored on load (see `serde_impl`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Cell {
    pub(crate) row:          u32,
    pub(crate) col:          u32,
    pub(crate) moisture:     f64,
    pub(crate) tap_status:   bool,
    pub(crate) override_tap: bool,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub(crate) overrides:    ParamOverrides,
}

impl Cell {
    /// A cell with no overrides.  `tap_status` starts as
    /// `moisture < threshold`.
    pub fn new(row: u32, col: u32, moisture: f64, threshold: f64) -> Self {
        let moisture = clamp_unit(moisture);
        Self {
            row,
            col,
            moisture,
            tap_status:   moisture < threshold,
            override_tap: false,
            overrides:    ParamOverrides::default(),
        }
    }

    #[inline]
    pub fn row(&self) -> u32 {
        self.row
    }

    #[inline]
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Normalised saturation in `[0, 1]`.
    #[inline]
    pub fn moisture(&self) -> f64 {
        self.moisture
    }

    #[inline]
    pub fn moisture_volumetric(&self) -> f64 {
        self.moisture * VOLUMETRIC_SCALE
    }

    /// Irrigation on/off.
    #[inline]
    pub fn tap_status(&self) -> bool {
        self.tap_status
    }

    /// `true` while the user has pinned the tap; the step rule leaves a
    /// pinned tap alone until the pin is reset.
    #[inline]
    pub fn override_tap(&self) -> bool {
        self.override_tap
    }

    #[inline]
    pub fn overrides(&self) -> &ParamOverrides {
        &self.overrides
    }

    /// Set moisture directly, clamping into `[0, 1]`.
    ///
    /// Non-finite input is rejected and the cell is left unchanged.
    pub fn set_moisture(&mut self, value: f64) -> GridResult<()> {
        if !value.is_finite() {
            return Err(GridError::NonFiniteMoisture(value));
        }
        self.moisture = clamp_unit(value);
        Ok(())
    }

    /// Flip the tap and pin it against automatic recomputation.
    pub fn toggle_tap(&mut self) {
        self.tap_status = !self.tap_status;
        self.override_tap = true;
    }

    /// Release the pin; the next step recomputes the tap from the threshold.
    pub fn reset_tap_control(&mut self) {
        self.override_tap = false;
    }

    pub fn set_parameter(&mut self, name: ParamName, value: f64) -> CoreResult<()> {
        self.overrides.set(name, value)
    }

    pub fn reset_parameter(&mut self, name: ParamName) {
        self.overrides.clear(name);
    }

    /// Effective parameters for this cell under `global`.
    #[inline]
    pub fn effective(&self, global: &SimulationParams) -> SimulationParams {
        self.overrides.resolve(global)
    }

    /// Internal write used by the step rule, which has already produced a
    /// finite value.
    #[inline]
    pub(crate) fn store_clamped(&mut self, value: f64) {
        self.moisture = clamp_unit(value);
    }
}

#[inline]
fn clamp_unit(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}
