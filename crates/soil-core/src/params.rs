//! Global simulation parameters, their numeric domains, and per-cell
//! overrides.
//!
//! # Resolution rule
//!
//! A cell override is an `Option<f64>`.  `None` means "use whatever the
//! global value is *when the step is evaluated*" — overrides are never
//! pre-resolved and stored, so a later global change still reaches every
//! cell that has no override of its own.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult};

// ── ParamName ─────────────────────────────────────────────────────────────────

/// One of the four tunable simulation parameters.
///
/// The declaration order is the canonical column / map order used by the
/// history log and the CSV export.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ParamName {
    /// Unitless rate of moisture exchange between 4-neighbours.
    DiffusionCoefficient,
    /// Moisture fraction lost per hour while the tap is off.
    EvapotranspirationRate,
    /// Moisture fraction gained per hour while the tap is on.
    IrrigationRate,
    /// Moisture fraction below which the tap switches on.
    MoistureThreshold,
}

impl ParamName {
    pub const ALL: [ParamName; 4] = [
        ParamName::DiffusionCoefficient,
        ParamName::EvapotranspirationRate,
        ParamName::IrrigationRate,
        ParamName::MoistureThreshold,
    ];

    /// Wire name, matching the persisted JSON documents.
    pub fn as_str(self) -> &'static str {
        match self {
            ParamName::DiffusionCoefficient   => "diffusionCoefficient",
            ParamName::EvapotranspirationRate => "evapotranspirationRate",
            ParamName::IrrigationRate         => "irrigationRate",
            ParamName::MoistureThreshold      => "moistureThreshold",
        }
    }

    /// Valid range for this parameter, both globally and as a cell override.
    pub fn domain(self) -> ParamDomain {
        match self {
            ParamName::DiffusionCoefficient   => ParamDomain { min: 0.0, max: 1.0 },
            ParamName::EvapotranspirationRate => ParamDomain { min: 0.0, max: 0.5 },
            ParamName::IrrigationRate         => ParamDomain { min: 0.0, max: 0.5 },
            ParamName::MoistureThreshold      => ParamDomain { min: 0.0, max: 1.0 },
        }
    }

    /// Check `value` against [`domain`](Self::domain).
    ///
    /// NaN and infinities are always rejected.
    pub fn validate(self, value: f64) -> CoreResult<f64> {
        let domain = self.domain();
        if domain.contains(value) {
            Ok(value)
        } else {
            Err(CoreError::InvalidParameter {
                name: self,
                value,
                min:  domain.min,
                max:  domain.max,
            })
        }
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamName::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::UnknownParameter(s.to_owned()))
    }
}

// ── ParamDomain ───────────────────────────────────────────────────────────────

/// Closed interval `[min, max]` a parameter value must lie in.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ParamDomain {
    pub min: f64,
    pub max: f64,
}

impl ParamDomain {
    #[inline]
    pub fn contains(self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

// ── SimulationParams ──────────────────────────────────────────────────────────

/// The four global parameters in effect for a step.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SimulationParams {
    pub diffusion_coefficient:    f64,
    pub evapotranspiration_rate:  f64,
    pub irrigation_rate:          f64,
    pub moisture_threshold:       f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            diffusion_coefficient:   0.1,
            evapotranspiration_rate: 0.02,
            irrigation_rate:         0.05,
            moisture_threshold:      0.2,
        }
    }
}

impl SimulationParams {
    #[inline]
    pub fn get(&self, name: ParamName) -> f64 {
        match name {
            ParamName::DiffusionCoefficient   => self.diffusion_coefficient,
            ParamName::EvapotranspirationRate => self.evapotranspiration_rate,
            ParamName::IrrigationRate         => self.irrigation_rate,
            ParamName::MoistureThreshold      => self.moisture_threshold,
        }
    }

    /// Set one parameter after checking its domain.  On error `self` is
    /// left untouched.
    pub fn set(&mut self, name: ParamName, value: f64) -> CoreResult<()> {
        let value = name.validate(value)?;
        *self.slot_mut(name) = value;
        Ok(())
    }

    /// Check every parameter against its domain.
    pub fn validate(&self) -> CoreResult<()> {
        for name in ParamName::ALL {
            name.validate(self.get(name))?;
        }
        Ok(())
    }

    fn slot_mut(&mut self, name: ParamName) -> &mut f64 {
        match name {
            ParamName::DiffusionCoefficient   => &mut self.diffusion_coefficient,
            ParamName::EvapotranspirationRate => &mut self.evapotranspiration_rate,
            ParamName::IrrigationRate         => &mut self.irrigation_rate,
            ParamName::MoistureThreshold      => &mut self.moisture_threshold,
        }
    }
}

// ── ParamOverrides ────────────────────────────────────────────────────────────

/// Optional per-cell replacements for the global parameters.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ParamOverrides {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub diffusion_coefficient:   Option<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub evapotranspiration_rate: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub irrigation_rate:         Option<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub moisture_threshold:      Option<f64>,
}

impl ParamOverrides {
    #[inline]
    pub fn get(&self, name: ParamName) -> Option<f64> {
        match name {
            ParamName::DiffusionCoefficient   => self.diffusion_coefficient,
            ParamName::EvapotranspirationRate => self.evapotranspiration_rate,
            ParamName::IrrigationRate         => self.irrigation_rate,
            ParamName::MoistureThreshold      => self.moisture_threshold,
        }
    }

    /// Pin `name` to `value` for this cell.  Values are held to the same
    /// domain as the global parameter.
    pub fn set(&mut self, name: ParamName, value: f64) -> CoreResult<()> {
        let value = name.validate(value)?;
        *self.slot_mut(name) = Some(value);
        Ok(())
    }

    /// Drop the override for `name`; the cell inherits the global value again.
    pub fn clear(&mut self, name: ParamName) {
        *self.slot_mut(name) = None;
    }

    pub fn clear_all(&mut self) {
        *self = ParamOverrides::default();
    }

    pub fn is_empty(&self) -> bool {
        ParamName::ALL.into_iter().all(|p| self.get(p).is_none())
    }

    /// Effective value of `name`: the override if present, else `global`'s.
    #[inline]
    pub fn resolve_one(&self, name: ParamName, global: &SimulationParams) -> f64 {
        self.get(name).unwrap_or_else(|| global.get(name))
    }

    /// Effective parameter set for a cell with these overrides.
    pub fn resolve(&self, global: &SimulationParams) -> SimulationParams {
        SimulationParams {
            diffusion_coefficient:   self.diffusion_coefficient.unwrap_or(global.diffusion_coefficient),
            evapotranspiration_rate: self.evapotranspiration_rate.unwrap_or(global.evapotranspiration_rate),
            irrigation_rate:         self.irrigation_rate.unwrap_or(global.irrigation_rate),
            moisture_threshold:      self.moisture_threshold.unwrap_or(global.moisture_threshold),
        }
    }

    fn slot_mut(&mut self, name: ParamName) -> &mut Option<f64> {
        match name {
            ParamName::DiffusionCoefficient   => &mut self.diffusion_coefficient,
            ParamName::EvapotranspirationRate => &mut self.evapotranspiration_rate,
            ParamName::IrrigationRate         => &mut self.irrigation_rate,
            ParamName::MoistureThreshold      => &mut self.moisture_threshold,
        }
    }
}
